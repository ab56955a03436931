//! User service — account management with the profile post-creation hook.
//!
//! Whatever creates a user must also create its profile row; that hook is
//! explicit here rather than hidden behind an event subscription.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::UserId;
use sanitrack_domain::user::{User, UserProfile};

use crate::ports::UserRepository;

/// Application service for user and profile management.
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new user and, as the post-creation hook, its empty profile
    /// row.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::Uniqueness`] when the username is taken, or a
    /// storage error from the repository.
    pub async fn create_user(&self, user: User) -> Result<User, SanitrackError> {
        user.validate()?;
        let created = self.repo.create(user).await?;
        self.repo
            .create_profile(UserProfile::for_user(created.id))
            .await?;
        Ok(created)
    }

    /// Look up a user by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_user(&self, id: UserId) -> Result<User, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all users ordered by username.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, SanitrackError> {
        self.repo.get_all().await
    }

    /// Update an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    pub async fn update_user(&self, user: User) -> Result<User, SanitrackError> {
        user.validate()?;
        self.repo.update(user).await
    }

    /// Get a user's profile row.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the profile does not exist,
    /// or a storage error from the repository.
    pub async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, SanitrackError> {
        self.repo.get_profile(user_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "UserProfile",
                id: user_id.to_string(),
            }
            .into()
        })
    }

    /// Update a user's profile row (e.g. to tie the account to a customer).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, SanitrackError> {
        self.repo.update_profile(profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryUserRepo {
        users: Mutex<HashMap<UserId, User>>,
        profiles: Mutex<HashMap<UserId, UserProfile>>,
    }

    impl UserRepository for InMemoryUserRepo {
        fn create(&self, user: User) -> impl Future<Output = Result<User, SanitrackError>> + Send {
            let mut users = self.users.lock().unwrap();
            users.insert(user.id, user.clone());
            async { Ok(user) }
        }

        fn get_by_id(
            &self,
            id: UserId,
        ) -> impl Future<Output = Result<Option<User>, SanitrackError>> + Send {
            let users = self.users.lock().unwrap();
            let result = users.get(&id).cloned();
            async { Ok(result) }
        }

        fn find_by_username(
            &self,
            username: &str,
        ) -> impl Future<Output = Result<Option<User>, SanitrackError>> + Send {
            let users = self.users.lock().unwrap();
            let result = users.values().find(|u| u.username == username).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<User>, SanitrackError>> + Send {
            let users = self.users.lock().unwrap();
            let result: Vec<User> = users.values().cloned().collect();
            async { Ok(result) }
        }

        fn update(&self, user: User) -> impl Future<Output = Result<User, SanitrackError>> + Send {
            let mut users = self.users.lock().unwrap();
            users.insert(user.id, user.clone());
            async { Ok(user) }
        }

        fn create_profile(
            &self,
            profile: UserProfile,
        ) -> impl Future<Output = Result<UserProfile, SanitrackError>> + Send {
            let mut profiles = self.profiles.lock().unwrap();
            profiles.insert(profile.user_id, profile.clone());
            async { Ok(profile) }
        }

        fn get_profile(
            &self,
            user_id: UserId,
        ) -> impl Future<Output = Result<Option<UserProfile>, SanitrackError>> + Send {
            let profiles = self.profiles.lock().unwrap();
            let result = profiles.get(&user_id).cloned();
            async { Ok(result) }
        }

        fn update_profile(
            &self,
            profile: UserProfile,
        ) -> impl Future<Output = Result<UserProfile, SanitrackError>> + Send {
            let mut profiles = self.profiles.lock().unwrap();
            profiles.insert(profile.user_id, profile.clone());
            async { Ok(profile) }
        }
    }

    fn make_service() -> UserService<InMemoryUserRepo> {
        UserService::new(InMemoryUserRepo::default())
    }

    #[tokio::test]
    async fn should_create_profile_alongside_user() {
        let svc = make_service();
        let user = User::builder().username("tech1").build().unwrap();
        let id = user.id;

        svc.create_user(user).await.unwrap();

        let profile = svc.get_profile(id).await.unwrap();
        assert_eq!(profile.user_id, id);
        assert!(profile.customer_id.is_none());
    }

    #[tokio::test]
    async fn should_return_not_found_for_missing_profile() {
        let svc = make_service();
        let result = svc.get_profile(UserId::new()).await;
        assert!(matches!(result, Err(SanitrackError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_update_profile_customer_link() {
        let svc = make_service();
        let user = User::builder().username("tech1").build().unwrap();
        let id = user.id;
        svc.create_user(user).await.unwrap();

        let mut profile = svc.get_profile(id).await.unwrap();
        profile.customer_id = Some(sanitrack_domain::id::CustomerId::new());
        svc.update_profile(profile.clone()).await.unwrap();

        let fetched = svc.get_profile(id).await.unwrap();
        assert_eq!(fetched.customer_id, profile.customer_id);
    }
}
