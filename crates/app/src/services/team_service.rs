//! Team service — use-cases for managing field crews.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::TeamId;
use sanitrack_domain::team::Team;

use crate::ports::{TeamRepository, UserRepository};

/// Application service for team CRUD operations.
pub struct TeamService<R, UR> {
    repo: R,
    users: UR,
}

impl<R, UR> TeamService<R, UR>
where
    R: TeamRepository,
    UR: UserRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, users: UR) -> Self {
        Self { repo, users }
    }

    /// Create a new team led by an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the leader does not exist, or
    /// [`SanitrackError::Uniqueness`] when the code is taken.
    pub async fn create_team(&self, team: Team) -> Result<Team, SanitrackError> {
        team.validate()?;
        if self.users.get_by_id(team.leader_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "User",
                id: team.leader_id.to_string(),
            }
            .into());
        }
        self.repo.create(team).await
    }

    /// Look up a team by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no team with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_team(&self, id: TeamId) -> Result<Team, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Team",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all teams ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_teams(&self) -> Result<Vec<Team>, SanitrackError> {
        self.repo.get_all().await
    }

    /// Update an existing team.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    pub async fn update_team(&self, team: Team) -> Result<Team, SanitrackError> {
        team.validate()?;
        self.repo.update(team).await
    }

    /// Delete a team. Planned requests pointing at it fall back to no team.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_team(&self, id: TeamId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}
