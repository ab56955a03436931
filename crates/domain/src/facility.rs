//! Facility — a customer site. Codes are unique per customer, not globally.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{CustomerId, FacilityId};

/// A facility belonging to exactly one customer. The owning customer is
/// immutable after creation; edits keep the stored owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub customer_id: CustomerId,
    pub code: String,
    pub name: String,
    pub address: String,
    pub note: String,
}

impl Facility {
    /// Create a builder for constructing a [`Facility`].
    #[must_use]
    pub fn builder(customer_id: CustomerId) -> FacilityBuilder {
        FacilityBuilder {
            customer_id,
            ..FacilityBuilder::default()
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

/// Step-by-step builder for [`Facility`].
#[derive(Debug, Default)]
pub struct FacilityBuilder {
    id: Option<FacilityId>,
    customer_id: CustomerId,
    code: Option<String>,
    name: Option<String>,
    address: Option<String>,
    note: Option<String>,
}

impl FacilityBuilder {
    #[must_use]
    pub fn id(mut self, id: FacilityId) -> Self {
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
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Consume the builder, validate, and return a [`Facility`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `code` or `name` is missing
    /// or empty.
    pub fn build(self) -> Result<Facility, SanitrackError> {
        let facility = Facility {
            id: self.id.unwrap_or_default(),
            customer_id: self.customer_id,
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
        };
        facility.validate()?;
        Ok(facility)
    }
}
