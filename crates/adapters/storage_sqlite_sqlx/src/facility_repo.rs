//! `SQLite` implementation of [`FacilityRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::FacilityRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::facility::Facility;
use sanitrack_domain::id::{CustomerId, FacilityId};

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`Facility`].
struct Wrapper(Facility);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Facility> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let customer_id: String = row.try_get("customer_id")?;

        let id = FacilityId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let customer_id = CustomerId::from_str(&customer_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Facility {
            id,
            customer_id,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            note: row.try_get("note")?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO facilities (id, customer_id, code, name, address, note) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM facilities WHERE id = ?";
const SELECT_ALL: &str = "
    SELECT f.* FROM facilities f
    JOIN customers c ON c.id = f.customer_id
    ORDER BY c.code, f.code
";
const SELECT_BY_CUSTOMER: &str =
    "SELECT * FROM facilities WHERE customer_id = ? ORDER BY code";
const UPDATE: &str = "UPDATE facilities SET code = ?, name = ?, address = ?, note = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM facilities WHERE id = ?";

/// `SQLite`-backed facility repository.
pub struct SqliteFacilityRepository {
    pool: SqlitePool,
}

impl SqliteFacilityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FacilityRepository for SqliteFacilityRepository {
    async fn create(&self, facility: Facility) -> Result<Facility, SanitrackError> {
        sqlx::query(INSERT)
            .bind(facility.id.to_string())
            .bind(facility.customer_id.to_string())
            .bind(&facility.code)
            .bind(&facility.name)
            .bind(&facility.address)
            .bind(&facility.note)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Facility", facility.code.clone()))?;

        Ok(facility)
    }

    async fn get_by_id(&self, id: FacilityId) -> Result<Option<Facility>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Facility>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Facility>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_CUSTOMER)
            .bind(customer_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, facility: Facility) -> Result<Facility, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(&facility.code)
            .bind(&facility.name)
            .bind(&facility.address)
            .bind(&facility.note)
            .bind(facility.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Facility", facility.code.clone()))?;

        Ok(facility)
    }

    async fn delete(&self, id: FacilityId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_repo::SqliteCustomerRepository;
    use crate::pool::Config;
    use sanitrack_app::ports::CustomerRepository;
    use sanitrack_domain::customer::Customer;

    async fn setup() -> (SqliteFacilityRepository, CustomerId) {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();
        let customers = SqliteCustomerRepository::new(pool.clone());
        let customer = Customer::builder().code("C1").name("Acme Foods").build().unwrap();
        let customer_id = customer.id;
        customers.create(customer).await.unwrap();
        (SqliteFacilityRepository::new(pool), customer_id)
    }

    fn test_facility(customer_id: CustomerId) -> Facility {
        Facility::builder(customer_id)
            .code("F1")
            .name("Main plant")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_facility() {
        let (repo, customer_id) = setup().await;
        let facility = test_facility(customer_id);
        let id = facility.id;

        repo.create(facility).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.code, "F1");
        assert_eq!(fetched.customer_id, customer_id);
    }

    #[tokio::test]
    async fn should_report_conflict_on_duplicate_code_within_customer() {
        let (repo, customer_id) = setup().await;
        repo.create(test_facility(customer_id)).await.unwrap();

        let duplicate = Facility::builder(customer_id)
            .code("F1")
            .name("Other plant")
            .build()
            .unwrap();
        let result = repo.create(duplicate).await;
        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn should_list_facilities_of_customer() {
        let (repo, customer_id) = setup().await;
        repo.create(test_facility(customer_id)).await.unwrap();
        repo.create(
            Facility::builder(customer_id)
                .code("F2")
                .name("Warehouse")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

        let facilities = repo.find_by_customer(customer_id).await.unwrap();
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].code, "F1");
    }

    #[tokio::test]
    async fn should_delete_facility() {
        let (repo, customer_id) = setup().await;
        let facility = test_facility(customer_id);
        let id = facility.id;
        repo.create(facility).await.unwrap();

        repo.delete(id).await.unwrap();

        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }
}
