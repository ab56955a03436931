//! # sanitrack-adapter-http-axum
//!
//! JSON REST adapter built on axum. Maps the domain error taxonomy onto
//! HTTP status codes and exposes the application services over `/api`.
//! Rendering (PDF/Excel) is not served here; report endpoints return the
//! assembled data for external renderers.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
