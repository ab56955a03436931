//! `SQLite` implementation of [`UserRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::UserRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{CustomerId, UserId};
use sanitrack_domain::user::{User, UserProfile};

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = UserId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(User {
            id,
            username: row.try_get("username")?,
            display_name: row.try_get("display_name")?,
            active: row.try_get("active")?,
        }))
    }
}

struct ProfileWrapper(UserProfile);

impl<'r> FromRow<'r, SqliteRow> for ProfileWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let user_id: String = row.try_get("user_id")?;
        let customer_id: Option<String> = row.try_get("customer_id")?;

        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let customer_id = customer_id
            .map(|s| CustomerId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(UserProfile {
            user_id,
            customer_id,
        }))
    }
}

const INSERT: &str = "INSERT INTO users (id, username, display_name, active) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY username";
const UPDATE: &str = "UPDATE users SET username = ?, display_name = ?, active = ? WHERE id = ?";
const INSERT_PROFILE: &str = "INSERT INTO user_profiles (user_id, customer_id) VALUES (?, ?)";
const SELECT_PROFILE: &str = "SELECT * FROM user_profiles WHERE user_id = ?";
const UPDATE_PROFILE: &str = "UPDATE user_profiles SET customer_id = ? WHERE user_id = ?";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User) -> Result<User, SanitrackError> {
        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.display_name)
            .bind(user.active)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "User", user.username.clone()))?;

        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<User>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, user: User) -> Result<User, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(&user.username)
            .bind(&user.display_name)
            .bind(user.active)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "User", user.username.clone()))?;

        Ok(user)
    }

    async fn create_profile(&self, profile: UserProfile) -> Result<UserProfile, SanitrackError> {
        sqlx::query(INSERT_PROFILE)
            .bind(profile.user_id.to_string())
            .bind(profile.customer_id.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "UserProfile", profile.user_id.to_string()))?;

        Ok(profile)
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, SanitrackError> {
        let row: Option<ProfileWrapper> = sqlx::query_as(SELECT_PROFILE)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, SanitrackError> {
        sqlx::query(UPDATE_PROFILE)
            .bind(profile.customer_id.map(|id| id.to_string()))
            .bind(profile.user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteUserRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteUserRepository::new(db.pool().clone())
    }

    fn test_user() -> User {
        User::builder().username("tech1").display_name("Field Tech").build().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_user() {
        let repo = setup().await;
        let user = test_user();
        let id = user.id;

        repo.create(user).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "tech1");
        assert!(fetched.active);
    }

    #[tokio::test]
    async fn should_report_conflict_on_duplicate_username() {
        let repo = setup().await;
        repo.create(test_user()).await.unwrap();

        let result = repo.create(test_user()).await;
        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn should_store_and_update_profile() {
        let repo = setup().await;
        let user = test_user();
        let id = user.id;
        repo.create(user).await.unwrap();
        repo.create_profile(UserProfile::for_user(id)).await.unwrap();

        let profile = repo.get_profile(id).await.unwrap().unwrap();
        assert!(profile.customer_id.is_none());
    }

    #[tokio::test]
    async fn should_reject_second_profile_for_same_user() {
        let repo = setup().await;
        let user = test_user();
        let id = user.id;
        repo.create(user).await.unwrap();
        repo.create_profile(UserProfile::for_user(id)).await.unwrap();

        let result = repo.create_profile(UserProfile::for_user(id)).await;
        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }
}
