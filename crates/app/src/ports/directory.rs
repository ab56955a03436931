//! Directory ports — persistence for users, teams, and contacts.

use std::future::Future;

use sanitrack_domain::contact::{Contact, ContactCategory};
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{ContactCategoryId, ContactId, CustomerId, FacilityId, TeamId, UserId};
use sanitrack_domain::team::Team;
use sanitrack_domain::user::{User, UserProfile};

/// Repository for persisting and querying [`User`]s and their profiles.
pub trait UserRepository {
    /// Create a new user. Fails with a uniqueness conflict when the
    /// username is taken.
    fn create(&self, user: User) -> impl Future<Output = Result<User, SanitrackError>> + Send;

    /// Get a user by its unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, SanitrackError>> + Send;

    /// Get a user by username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, SanitrackError>> + Send;

    /// Get all users ordered by username.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SanitrackError>> + Send;

    /// Update an existing user.
    fn update(&self, user: User) -> impl Future<Output = Result<User, SanitrackError>> + Send;

    /// Create the one-to-one profile row for a user.
    fn create_profile(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SanitrackError>> + Send;

    /// Get the profile row of a user.
    fn get_profile(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<UserProfile>, SanitrackError>> + Send;

    /// Update an existing profile row.
    fn update_profile(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, SanitrackError>> + Send;
}

/// Repository for persisting and querying [`Team`]s.
pub trait TeamRepository {
    /// Create a new team. Fails with a uniqueness conflict when the code is
    /// taken.
    fn create(&self, team: Team) -> impl Future<Output = Result<Team, SanitrackError>> + Send;

    /// Get a team by its unique identifier.
    fn get_by_id(
        &self,
        id: TeamId,
    ) -> impl Future<Output = Result<Option<Team>, SanitrackError>> + Send;

    /// Get all teams ordered by code.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Team>, SanitrackError>> + Send;

    /// Update an existing team.
    fn update(&self, team: Team) -> impl Future<Output = Result<Team, SanitrackError>> + Send;

    /// Delete a team.
    fn delete(&self, id: TeamId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`ContactCategory`]s.
pub trait ContactCategoryRepository {
    /// Create a new category.
    fn create(
        &self,
        category: ContactCategory,
    ) -> impl Future<Output = Result<ContactCategory, SanitrackError>> + Send;

    /// Get a category by its unique identifier.
    fn get_by_id(
        &self,
        id: ContactCategoryId,
    ) -> impl Future<Output = Result<Option<ContactCategory>, SanitrackError>> + Send;

    /// Get a category by name. Used by the bootstrap routine to stay
    /// idempotent.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ContactCategory>, SanitrackError>> + Send;

    /// Get all categories ordered by position then name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ContactCategory>, SanitrackError>> + Send;
}

/// Repository for persisting and querying [`Contact`]s.
pub trait ContactRepository {
    /// Create a new contact.
    fn create(
        &self,
        contact: Contact,
    ) -> impl Future<Output = Result<Contact, SanitrackError>> + Send;

    /// Get a contact by its unique identifier.
    fn get_by_id(
        &self,
        id: ContactId,
    ) -> impl Future<Output = Result<Option<Contact>, SanitrackError>> + Send;

    /// Find the contacts attached to a customer.
    fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Contact>, SanitrackError>> + Send;

    /// Find the contacts attached to a facility.
    fn find_by_facility(
        &self,
        facility_id: FacilityId,
    ) -> impl Future<Output = Result<Vec<Contact>, SanitrackError>> + Send;

    /// Update an existing contact.
    fn update(
        &self,
        contact: Contact,
    ) -> impl Future<Output = Result<Contact, SanitrackError>> + Send;

    /// Delete a contact.
    fn delete(&self, id: ContactId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}
