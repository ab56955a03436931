//! Customer — the company being served. Root of the catalog hierarchy.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::CustomerId;

/// A customer company. Owns facilities; the customer `code` is the first
/// segment of every derived station code and form number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub code: String,
    pub name: String,
    pub address: String,
    pub note: String,
}

impl Customer {
    /// Create a builder for constructing a [`Customer`].
    #[must_use]
    pub fn builder() -> CustomerBuilder {
        CustomerBuilder::default()
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

/// Step-by-step builder for [`Customer`].
#[derive(Debug, Default)]
pub struct CustomerBuilder {
    id: Option<CustomerId>,
    code: Option<String>,
    name: Option<String>,
    address: Option<String>,
    note: Option<String>,
}

impl CustomerBuilder {
    #[must_use]
    pub fn id(mut self, id: CustomerId) -> Self {
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

    /// Consume the builder, validate, and return a [`Customer`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `code` or `name` is missing
    /// or empty.
    pub fn build(self) -> Result<Customer, SanitrackError> {
        let customer = Customer {
            id: self.id.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
        };
        customer.validate()?;
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_customer_when_code_and_name_provided() {
        let customer = Customer::builder()
            .code("C1")
            .name("Acme Foods")
            .build()
            .unwrap();
        assert_eq!(customer.code, "C1");
        assert_eq!(customer.name, "Acme Foods");
        assert!(customer.address.is_empty());
    }

    #[test]
    fn should_return_validation_error_when_code_is_empty() {
        let result = Customer::builder().name("Acme Foods").build();
        assert!(matches!(
            result,
            Err(SanitrackError::Validation(ValidationError::EmptyCode))
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Customer::builder().code("C1").build();
        assert!(matches!(
            result,
            Err(SanitrackError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let customer = Customer::builder()
            .code("C1")
            .name("Acme Foods")
            .address("Dock 4")
            .build()
            .unwrap();
        let json = serde_json::to_string(&customer).unwrap();
        let parsed: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, customer.id);
        assert_eq!(parsed.address, "Dock 4");
    }
}
