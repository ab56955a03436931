//! Contacts — people reachable at a customer or one of its facilities.
//!
//! A contact belongs to a customer, to a facility, or to both when they are
//! consistent. A facility-level contact with no explicit customer inherits
//! the facility's owner at save time.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{ContactCategoryId, ContactId, CustomerId, FacilityId};

/// Contact grouping such as "Primary contact" or "Accounting".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactCategory {
    pub id: ContactCategoryId,
    pub name: String,
    /// List ordering position.
    pub position: u16,
}

impl ContactCategory {
    /// Create a category with the given name and position.
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            id: ContactCategoryId::new(),
            name: name.into(),
            position,
        }
    }
}

/// A person reachable at a customer or facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub category_id: ContactCategoryId,
    pub customer_id: Option<CustomerId>,
    pub facility_id: Option<FacilityId>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub note: String,
}

impl Contact {
    /// Create a builder for constructing a [`Contact`].
    #[must_use]
    pub fn builder(category_id: ContactCategoryId) -> ContactBuilder {
        ContactBuilder {
            category_id,
            ..ContactBuilder::default()
        }
    }

    /// Check domain invariants.
    ///
    /// The customer/facility consistency check needs the facility's owner
    /// and therefore lives in the contact service; this only enforces what
    /// the row itself can show.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when `full_name` is empty or
    /// neither a customer nor a facility is set.
    pub fn validate(&self) -> Result<(), SanitrackError> {
        if self.full_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.customer_id.is_none() && self.facility_id.is_none() {
            return Err(ValidationError::ContactWithoutOwner.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Contact`].
#[derive(Debug, Default)]
pub struct ContactBuilder {
    id: Option<ContactId>,
    category_id: ContactCategoryId,
    customer_id: Option<CustomerId>,
    facility_id: Option<FacilityId>,
    full_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    note: Option<String>,
}

impl ContactBuilder {
    #[must_use]
    pub fn id(mut self, id: ContactId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn facility_id(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Consume the builder, validate, and return a [`Contact`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `full_name` is missing or
    /// no owner is set.
    pub fn build(self) -> Result<Contact, SanitrackError> {
        let contact = Contact {
            id: self.id.unwrap_or_default(),
            category_id: self.category_id,
            customer_id: self.customer_id,
            facility_id: self.facility_id,
            full_name: self.full_name.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
        };
        contact.validate()?;
        Ok(contact)
    }
}
