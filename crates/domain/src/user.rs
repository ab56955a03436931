//! User — a back-office or field account, plus its profile row.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{CustomerId, UserId};

/// An account that can lead teams and own work records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub active: bool,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when `username` is empty.
    pub fn validate(&self) -> Result<(), SanitrackError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// One-to-one profile row created alongside every user. Holds the optional
/// customer the account is tied to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub customer_id: Option<CustomerId>,
}

impl UserProfile {
    /// An empty profile for a freshly created user.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            customer_id: None,
        }
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    username: Option<String>,
    display_name: Option<String>,
    active: Option<bool>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `username` is missing or
    /// empty.
    pub fn build(self) -> Result<User, SanitrackError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            display_name: self.display_name.unwrap_or_default(),
            active: self.active.unwrap_or(true),
        };
        user.validate()?;
        Ok(user)
    }
}
