//! Station — a monitoring point inside a zone.
//!
//! The user enters the short `code`; the persisted `unique_code` is derived
//! from the ancestor codes and recomputed on every save so it always reflects
//! the current customer/facility/zone codes.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{StationId, ZoneId};

/// The ancestor codes needed to derive a station's unique code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePath {
    pub customer_code: String,
    pub facility_code: String,
    pub zone_code: String,
}

impl CodePath {
    /// Compose the globally unique station code for `station_code` under
    /// this path: `{customer}-{facility}-{zone}-{station}`.
    #[must_use]
    pub fn unique_code(&self, station_code: &str) -> String {
        format!(
            "{}-{}-{}-{}",
            self.customer_code, self.facility_code, self.zone_code, station_code
        )
    }
}

/// A monitoring station. Codes are unique per zone; `unique_code` is unique
/// across the whole system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub zone_id: ZoneId,
    pub code: String,
    pub name: String,
    /// Derived `{customer}-{facility}-{zone}-{station}` code, persisted at
    /// save time rather than computed on read.
    pub unique_code: String,
}

impl Station {
    /// Create a builder for constructing a [`Station`].
    #[must_use]
    pub fn builder(zone_id: ZoneId) -> StationBuilder {
        StationBuilder {
            zone_id,
            ..StationBuilder::default()
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when `code` or `name` is empty.
    pub fn validate(&self) -> Result<(), SanitrackError> {
        if self.code.is_empty() {
            return Err(ValidationError::EmptyCode.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Recompute `unique_code` from the current ancestor codes. Called on
    /// every save so renamed ancestors propagate.
    pub fn recompute_unique_code(&mut self, path: &CodePath) {
        if !self.code.is_empty() {
            self.unique_code = path.unique_code(&self.code);
        }
    }
}

/// Step-by-step builder for [`Station`].
#[derive(Debug, Default)]
pub struct StationBuilder {
    id: Option<StationId>,
    zone_id: ZoneId,
    code: Option<String>,
    name: Option<String>,
}

impl StationBuilder {
    #[must_use]
    pub fn id(mut self, id: StationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return a [`Station`].
    ///
    /// The unique code starts empty; the station service derives it from the
    /// ancestor codes before the first persist.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `code` or `name` is missing
    /// or empty.
    pub fn build(self) -> Result<Station, SanitrackError> {
        let station = Station {
            id: self.id.unwrap_or_default(),
            zone_id: self.zone_id,
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            unique_code: String::new(),
        };
        station.validate()?;
        Ok(station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> CodePath {
        CodePath {
            customer_code: "C1".to_string(),
            facility_code: "F1".to_string(),
            zone_code: "Z1".to_string(),
        }
    }

    #[test]
    fn should_compose_unique_code_from_ancestor_codes() {
        assert_eq!(path().unique_code("S1"), "C1-F1-Z1-S1");
    }

    #[test]
    fn should_set_unique_code_on_recompute() {
        let mut station = Station::builder(ZoneId::new())
            .code("S1")
            .name("Bait box 1")
            .build()
            .unwrap();
        assert!(station.unique_code.is_empty());

        station.recompute_unique_code(&path());
        assert_eq!(station.unique_code, "C1-F1-Z1-S1");
    }

    #[test]
    fn should_refresh_unique_code_when_ancestor_code_changes() {
        let mut station = Station::builder(ZoneId::new())
            .code("S1")
            .name("Bait box 1")
            .build()
            .unwrap();
        station.recompute_unique_code(&path());

        let renamed = CodePath {
            zone_code: "Z9".to_string(),
            ..path()
        };
        station.recompute_unique_code(&renamed);
        assert_eq!(station.unique_code, "C1-F1-Z9-S1");
    }

    #[test]
    fn should_return_validation_error_when_code_is_empty() {
        let result = Station::builder(ZoneId::new()).name("Bait box 1").build();
        assert!(matches!(
            result,
            Err(SanitrackError::Validation(ValidationError::EmptyCode))
        ));
    }
}
