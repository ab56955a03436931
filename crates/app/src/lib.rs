//! # sanitrack-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports): one repository trait per aggregate, plus the [`ports::Repositories`]
//!   bundle the HTTP adapter is generic over
//! - Define **driving/inbound ports** as use-case structs:
//!   - catalog services (customers, facilities, zones, stations — including
//!     the derived station unique code)
//!   - directory services (users with the profile post-creation hook, teams,
//!     contacts)
//!   - definition-list services
//!   - the request/work-record lifecycle engine
//!   - the station-count ledger with its lock semantics
//!   - report assembly (cross-period station report, activity reports)
//! - Provide the idempotent [`bootstrap`] routine the daemon runs at startup
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `sanitrack-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod bootstrap;
pub mod ports;
pub mod services;
