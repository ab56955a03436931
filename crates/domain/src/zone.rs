//! Zone — a spatial subdivision of a facility for monitoring-point tracking.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{FacilityId, ZoneId};

/// A zone inside a facility. Codes are unique per facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub facility_id: FacilityId,
    pub code: String,
    pub name: String,
    pub note: String,
}

impl Zone {
    /// Create a builder for constructing a [`Zone`].
    #[must_use]
    pub fn builder(facility_id: FacilityId) -> ZoneBuilder {
        ZoneBuilder {
            facility_id,
            ..ZoneBuilder::default()
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
}

/// Step-by-step builder for [`Zone`].
#[derive(Debug, Default)]
pub struct ZoneBuilder {
    id: Option<ZoneId>,
    facility_id: FacilityId,
    code: Option<String>,
    name: Option<String>,
    note: Option<String>,
}

impl ZoneBuilder {
    #[must_use]
    pub fn id(mut self, id: ZoneId) -> Self {
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

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Consume the builder, validate, and return a [`Zone`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `code` or `name` is missing
    /// or empty.
    pub fn build(self) -> Result<Zone, SanitrackError> {
        let zone = Zone {
            id: self.id.unwrap_or_default(),
            facility_id: self.facility_id,
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
        };
        zone.validate()?;
        Ok(zone)
    }
}
