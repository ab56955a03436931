//! Idempotent bootstrap — default data the system expects at first start.
//!
//! Invoked once by the daemon at startup. Every step is a get-or-create, so
//! running it again changes nothing.

use sanitrack_domain::contact::ContactCategory;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::lookup::RequestType;
use sanitrack_domain::user::{User, UserProfile};

use crate::ports::{ContactCategoryRepository, RequestTypeRepository, UserRepository};

/// Default contact groupings.
const DEFAULT_CONTACT_CATEGORIES: [&str; 3] = ["Primary contact", "Accounting", "Facility manager"];

/// Default request categories.
const DEFAULT_REQUEST_TYPES: [&str; 2] = ["Complaint", "Planned visit"];

/// Username of the seeded administrator account.
pub const ADMIN_USERNAME: &str = "admin";

/// Seed the default contact categories, request types, and the admin
/// account. Safe to run on every startup.
///
/// # Errors
///
/// Returns a storage error propagated from the repositories.
pub async fn seed_defaults(
    categories: &impl ContactCategoryRepository,
    request_types: &impl RequestTypeRepository,
    users: &impl UserRepository,
) -> Result<(), SanitrackError> {
    for (position, name) in (1..).zip(DEFAULT_CONTACT_CATEGORIES) {
        if categories.find_by_name(name).await?.is_none() {
            categories.create(ContactCategory::new(name, position)).await?;
            tracing::info!(name, "seeded contact category");
        }
    }

    for (position, name) in (1..).zip(DEFAULT_REQUEST_TYPES) {
        if request_types.find_by_name(name).await?.is_none() {
            request_types.create(RequestType::new(name, position)).await?;
            tracing::info!(name, "seeded request type");
        }
    }

    if users.find_by_username(ADMIN_USERNAME).await?.is_none() {
        let admin = User::builder()
            .username(ADMIN_USERNAME)
            .display_name("Administrator")
            .build()?;
        let admin = users.create(admin).await?;
        users.create_profile(UserProfile::for_user(admin.id)).await?;
        tracing::info!(username = ADMIN_USERNAME, "seeded admin user");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanitrack_domain::id::{ContactCategoryId, RequestTypeId, UserId};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryCategoryRepo {
        store: Mutex<HashMap<ContactCategoryId, ContactCategory>>,
    }

    impl ContactCategoryRepository for InMemoryCategoryRepo {
        fn create(
            &self,
            category: ContactCategory,
        ) -> impl Future<Output = Result<ContactCategory, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(category.id, category.clone());
            async { Ok(category) }
        }

        fn get_by_id(
            &self,
            id: ContactCategoryId,
        ) -> impl Future<Output = Result<Option<ContactCategory>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn find_by_name(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<Option<ContactCategory>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.values().find(|c| c.name == name).cloned();
            async { Ok(result) }
        }

        fn get_all(
            &self,
        ) -> impl Future<Output = Result<Vec<ContactCategory>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<ContactCategory> = store.values().cloned().collect();
            async { Ok(result) }
        }
    }

    #[derive(Default)]
    struct InMemoryRequestTypeRepo {
        store: Mutex<HashMap<RequestTypeId, RequestType>>,
    }

    impl RequestTypeRepository for InMemoryRequestTypeRepo {
        fn create(
            &self,
            request_type: RequestType,
        ) -> impl Future<Output = Result<RequestType, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(request_type.id, request_type.clone());
            async { Ok(request_type) }
        }

        fn get_by_id(
            &self,
            id: RequestTypeId,
        ) -> impl Future<Output = Result<Option<RequestType>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn find_by_name(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<Option<RequestType>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.values().find(|t| t.name == name).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<RequestType>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<RequestType> = store.values().cloned().collect();
            async { Ok(result) }
        }

        fn update(
            &self,
            request_type: RequestType,
        ) -> impl Future<Output = Result<RequestType, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(request_type.id, request_type.clone());
            async { Ok(request_type) }
        }

        fn delete(
            &self,
            id: RequestTypeId,
        ) -> impl Future<Output = Result<(), SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&id);
            async { Ok(()) }
        }
    }

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

    #[tokio::test]
    async fn should_seed_defaults_on_empty_store() {
        let categories = InMemoryCategoryRepo::default();
        let request_types = InMemoryRequestTypeRepo::default();
        let users = InMemoryUserRepo::default();

        seed_defaults(&categories, &request_types, &users)
            .await
            .unwrap();

        assert_eq!(categories.get_all().await.unwrap().len(), 3);
        assert_eq!(request_types.get_all().await.unwrap().len(), 2);
        let admin = users.find_by_username(ADMIN_USERNAME).await.unwrap();
        assert!(admin.is_some());
    }

    #[tokio::test]
    async fn should_be_idempotent_when_run_twice() {
        let categories = InMemoryCategoryRepo::default();
        let request_types = InMemoryRequestTypeRepo::default();
        let users = InMemoryUserRepo::default();

        seed_defaults(&categories, &request_types, &users)
            .await
            .unwrap();
        seed_defaults(&categories, &request_types, &users)
            .await
            .unwrap();

        assert_eq!(categories.get_all().await.unwrap().len(), 3);
        assert_eq!(request_types.get_all().await.unwrap().len(), 2);
        assert_eq!(users.get_all().await.unwrap().len(), 1);
    }
}
