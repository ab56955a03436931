//! Team — a field crew with a leader and a free-text member list.

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{TeamId, UserId};

/// A field crew. The leader is a [`User`](crate::user::User) and cannot be
/// deleted while teams reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub code: String,
    pub leader_id: UserId,
    pub member_count: u16,
    /// Member names or notes, free text.
    pub members: String,
}

impl Team {
    /// Create a builder for constructing a [`Team`].
    #[must_use]
    pub fn builder(leader_id: UserId) -> TeamBuilder {
        TeamBuilder {
            leader_id,
            ..TeamBuilder::default()
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when `code` is empty.
    pub fn validate(&self) -> Result<(), SanitrackError> {
        if self.code.is_empty() {
            return Err(ValidationError::EmptyCode.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Team`].
#[derive(Debug, Default)]
pub struct TeamBuilder {
    id: Option<TeamId>,
    code: Option<String>,
    leader_id: UserId,
    member_count: Option<u16>,
    members: Option<String>,
}

impl TeamBuilder {
    #[must_use]
    pub fn id(mut self, id: TeamId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn member_count(mut self, member_count: u16) -> Self {
        self.member_count = Some(member_count);
        self
    }

    #[must_use]
    pub fn members(mut self, members: impl Into<String>) -> Self {
        self.members = Some(members.into());
        self
    }

    /// Consume the builder, validate, and return a [`Team`].
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `code` is missing or empty.
    pub fn build(self) -> Result<Team, SanitrackError> {
        let team = Team {
            id: self.id.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            leader_id: self.leader_id,
            member_count: self.member_count.unwrap_or(0),
            members: self.members.unwrap_or_default(),
        };
        team.validate()?;
        Ok(team)
    }
}
