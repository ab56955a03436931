//! `SQLite` implementation of [`CustomerRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::CustomerRepository;
use sanitrack_domain::customer::Customer;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::CustomerId;

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`Customer`].
struct Wrapper(Customer);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Customer> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = CustomerId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Customer {
            id,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            note: row.try_get("note")?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO customers (id, code, name, address, note) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM customers WHERE id = ?";
const SELECT_BY_CODE: &str = "SELECT * FROM customers WHERE code = ?";
const SELECT_ALL: &str = "SELECT * FROM customers ORDER BY code";
const UPDATE: &str = "UPDATE customers SET code = ?, name = ?, address = ?, note = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM customers WHERE id = ?";

/// `SQLite`-backed customer repository.
pub struct SqliteCustomerRepository {
    pool: SqlitePool,
}

impl SqliteCustomerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for SqliteCustomerRepository {
    async fn create(&self, customer: Customer) -> Result<Customer, SanitrackError> {
        sqlx::query(INSERT)
            .bind(customer.id.to_string())
            .bind(&customer.code)
            .bind(&customer.name)
            .bind(&customer.address)
            .bind(&customer.note)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Customer", customer.code.clone()))?;

        Ok(customer)
    }

    async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Customer>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_CODE)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Customer>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, customer: Customer) -> Result<Customer, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(&customer.code)
            .bind(&customer.name)
            .bind(&customer.address)
            .bind(&customer.note)
            .bind(customer.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Customer", customer.code.clone()))?;

        Ok(customer)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
