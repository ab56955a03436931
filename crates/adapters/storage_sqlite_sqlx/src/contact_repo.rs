//! `SQLite` implementations of [`ContactCategoryRepository`] and
//! [`ContactRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::{ContactCategoryRepository, ContactRepository};
use sanitrack_domain::contact::{Contact, ContactCategory};
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{ContactCategoryId, ContactId, CustomerId, FacilityId};

use crate::error::StorageError;

struct CategoryWrapper(ContactCategory);

impl<'r> FromRow<'r, SqliteRow> for CategoryWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let position: i64 = row.try_get("position")?;
        let id = ContactCategoryId::from_str(&id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(ContactCategory {
            id,
            name: row.try_get("name")?,
            position: u16::try_from(position).unwrap_or(0),
        }))
    }
}

struct ContactWrapper(Contact);

impl ContactWrapper {
    fn maybe(value: Option<Self>) -> Option<Contact> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for ContactWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let category_id: String = row.try_get("category_id")?;
        let customer_id: Option<String> = row.try_get("customer_id")?;
        let facility_id: Option<String> = row.try_get("facility_id")?;

        let id = ContactId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let category_id = ContactCategoryId::from_str(&category_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let customer_id = customer_id
            .map(|s| CustomerId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let facility_id = facility_id
            .map(|s| FacilityId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Contact {
            id,
            category_id,
            customer_id,
            facility_id,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            note: row.try_get("note")?,
        }))
    }
}

const INSERT_CATEGORY: &str =
    "INSERT INTO contact_categories (id, name, position) VALUES (?, ?, ?)";
const SELECT_CATEGORY_BY_ID: &str = "SELECT * FROM contact_categories WHERE id = ?";
const SELECT_CATEGORY_BY_NAME: &str = "SELECT * FROM contact_categories WHERE name = ?";
const SELECT_ALL_CATEGORIES: &str = "SELECT * FROM contact_categories ORDER BY position, name";

const INSERT_CONTACT: &str = "
    INSERT INTO contacts (id, category_id, customer_id, facility_id, full_name, phone, email, note)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_CONTACT_BY_ID: &str = "SELECT * FROM contacts WHERE id = ?";
const SELECT_BY_CUSTOMER: &str = "SELECT * FROM contacts WHERE customer_id = ? ORDER BY full_name";
const SELECT_BY_FACILITY: &str = "SELECT * FROM contacts WHERE facility_id = ? ORDER BY full_name";
const UPDATE_CONTACT: &str = "
    UPDATE contacts
    SET category_id = ?, customer_id = ?, facility_id = ?, full_name = ?, phone = ?, email = ?, note = ?
    WHERE id = ?
";
const DELETE_CONTACT: &str = "DELETE FROM contacts WHERE id = ?";

/// `SQLite`-backed contact-category repository.
pub struct SqliteContactCategoryRepository {
    pool: SqlitePool,
}

impl SqliteContactCategoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ContactCategoryRepository for SqliteContactCategoryRepository {
    async fn create(&self, category: ContactCategory) -> Result<ContactCategory, SanitrackError> {
        sqlx::query(INSERT_CATEGORY)
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(i64::from(category.position))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(category)
    }

    async fn get_by_id(
        &self,
        id: ContactCategoryId,
    ) -> Result<Option<ContactCategory>, SanitrackError> {
        let row: Option<CategoryWrapper> = sqlx::query_as(SELECT_CATEGORY_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ContactCategory>, SanitrackError> {
        let row: Option<CategoryWrapper> = sqlx::query_as(SELECT_CATEGORY_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<ContactCategory>, SanitrackError> {
        let rows: Vec<CategoryWrapper> = sqlx::query_as(SELECT_ALL_CATEGORIES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

/// `SQLite`-backed contact repository.
pub struct SqliteContactRepository {
    pool: SqlitePool,
}

impl SqliteContactRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ContactRepository for SqliteContactRepository {
    async fn create(&self, contact: Contact) -> Result<Contact, SanitrackError> {
        sqlx::query(INSERT_CONTACT)
            .bind(contact.id.to_string())
            .bind(contact.category_id.to_string())
            .bind(contact.customer_id.map(|id| id.to_string()))
            .bind(contact.facility_id.map(|id| id.to_string()))
            .bind(&contact.full_name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(&contact.note)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(contact)
    }

    async fn get_by_id(&self, id: ContactId) -> Result<Option<Contact>, SanitrackError> {
        let row: Option<ContactWrapper> = sqlx::query_as(SELECT_CONTACT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(ContactWrapper::maybe(row))
    }

    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Contact>, SanitrackError> {
        let rows: Vec<ContactWrapper> = sqlx::query_as(SELECT_BY_CUSTOMER)
            .bind(customer_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_facility(
        &self,
        facility_id: FacilityId,
    ) -> Result<Vec<Contact>, SanitrackError> {
        let rows: Vec<ContactWrapper> = sqlx::query_as(SELECT_BY_FACILITY)
            .bind(facility_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, contact: Contact) -> Result<Contact, SanitrackError> {
        sqlx::query(UPDATE_CONTACT)
            .bind(contact.category_id.to_string())
            .bind(contact.customer_id.map(|id| id.to_string()))
            .bind(contact.facility_id.map(|id| id.to_string()))
            .bind(&contact.full_name)
            .bind(&contact.phone)
            .bind(&contact.email)
            .bind(&contact.note)
            .bind(contact.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(contact)
    }

    async fn delete(&self, id: ContactId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_CONTACT)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
