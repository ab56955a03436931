//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod customers;
#[allow(clippy::missing_errors_doc)]
pub mod facilities;
#[allow(clippy::missing_errors_doc)]
pub mod reports;
#[allow(clippy::missing_errors_doc)]
pub mod request_types;
#[allow(clippy::missing_errors_doc)]
pub mod requests;
#[allow(clippy::missing_errors_doc)]
pub mod station_counts;
#[allow(clippy::missing_errors_doc)]
pub mod stations;
#[allow(clippy::missing_errors_doc)]
pub mod teams;
#[allow(clippy::missing_errors_doc)]
pub mod users;
#[allow(clippy::missing_errors_doc)]
pub mod work_records;
#[allow(clippy::missing_errors_doc)]
pub mod zones;

use std::str::FromStr;

use crate::error::ApiError;

/// Parse a path/query identifier, surfacing a 400 on malformed input.
pub(crate) fn parse_id<T: FromStr>(raw: &str, entity: &'static str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(entity))
}
