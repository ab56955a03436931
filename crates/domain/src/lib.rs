//! # sanitrack-domain
//!
//! Pure domain model for the sanitrack pest-control back-office system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **catalog hierarchy** (customers, facilities, zones, stations)
//!   and the derived station unique code
//! - Define the **directory** (users, teams, contacts)
//! - Define **definition lists** (request types, applications, activities,
//!   findings, products)
//! - Define **service requests** and their status state machine
//! - Define **work records**, their line items, and the form-number derivation
//! - Define the **station-count ledger** rows and summaries
//! - Compute the cross-period station report (matrix, ratios, change stats)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod contact;
pub mod customer;
pub mod facility;
pub mod ledger;
pub mod lookup;
pub mod report;
pub mod request;
pub mod station;
pub mod station_report;
pub mod team;
pub mod user;
pub mod work_items;
pub mod work_record;
pub mod zone;
