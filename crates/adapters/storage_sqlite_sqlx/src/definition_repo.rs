//! `SQLite` implementations of the definition-list repositories.
//!
//! The application, activity, and finding tables share the same shape, so
//! their repositories come out of one macro. Request types (bootstrap lookup
//! by name, restricted delete) and products (extra columns) are written out.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::{
    ActivityDefRepository, ApplicationDefRepository, FindingDefRepository, ProductDefRepository,
    RequestTypeRepository,
};
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{
    ActivityDefId, ApplicationDefId, FindingDefId, ProductDefId, RequestTypeId,
};
use sanitrack_domain::lookup::{ActivityDef, ApplicationDef, FindingDef, ProductDef, RequestType};

use crate::error::{StorageError, map_restrict};

macro_rules! ordered_lookup_repository {
    ($repo:ident, $port:ident, $domain:ident, $id:ident, $table:literal) => {
        #[doc = concat!("`SQLite`-backed repository for the `", $table, "` table.")]
        pub struct $repo {
            pool: SqlitePool,
        }

        impl $repo {
            /// Create a new repository using the given connection pool.
            #[must_use]
            pub fn new(pool: SqlitePool) -> Self {
                Self { pool }
            }
        }

        impl $port for $repo {
            async fn create(&self, def: $domain) -> Result<$domain, SanitrackError> {
                sqlx::query(concat!(
                    "INSERT INTO ",
                    $table,
                    " (id, name, position) VALUES (?, ?, ?)"
                ))
                .bind(def.id.to_string())
                .bind(&def.name)
                .bind(i64::from(def.position))
                .execute(&self.pool)
                .await
                .map_err(StorageError::from)?;

                Ok(def)
            }

            async fn get_by_id(&self, id: $id) -> Result<Option<$domain>, SanitrackError> {
                let row = sqlx::query(concat!("SELECT * FROM ", $table, " WHERE id = ?"))
                    .bind(id.to_string())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(StorageError::from)?;

                row.map(|row| decode_lookup_row(&row).map(|(id, name, position)| $domain {
                    id: $id::from_uuid(id),
                    name,
                    position,
                }))
                .transpose()
            }

            async fn get_all(&self) -> Result<Vec<$domain>, SanitrackError> {
                let rows = sqlx::query(concat!(
                    "SELECT * FROM ",
                    $table,
                    " ORDER BY position, name"
                ))
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;

                rows.iter()
                    .map(|row| {
                        decode_lookup_row(row).map(|(id, name, position)| $domain {
                            id: $id::from_uuid(id),
                            name,
                            position,
                        })
                    })
                    .collect()
            }

            async fn update(&self, def: $domain) -> Result<$domain, SanitrackError> {
                sqlx::query(concat!(
                    "UPDATE ",
                    $table,
                    " SET name = ?, position = ? WHERE id = ?"
                ))
                .bind(&def.name)
                .bind(i64::from(def.position))
                .bind(def.id.to_string())
                .execute(&self.pool)
                .await
                .map_err(StorageError::from)?;

                Ok(def)
            }

            async fn delete(&self, id: $id) -> Result<(), SanitrackError> {
                sqlx::query(concat!("DELETE FROM ", $table, " WHERE id = ?"))
                    .bind(id.to_string())
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from)?;

                Ok(())
            }
        }
    };
}

fn decode_lookup_row(row: &SqliteRow) -> Result<(uuid::Uuid, String, u16), SanitrackError> {
    let id: String = row.try_get("id").map_err(StorageError::from)?;
    let name: String = row.try_get("name").map_err(StorageError::from)?;
    let position: i64 = row.try_get("position").map_err(StorageError::from)?;
    let id = uuid::Uuid::from_str(&id)
        .map_err(|err| StorageError::Database(sqlx::Error::Decode(Box::new(err))))?;
    Ok((id, name, u16::try_from(position).unwrap_or(0)))
}

ordered_lookup_repository!(
    SqliteApplicationDefRepository,
    ApplicationDefRepository,
    ApplicationDef,
    ApplicationDefId,
    "application_defs"
);

ordered_lookup_repository!(
    SqliteActivityDefRepository,
    ActivityDefRepository,
    ActivityDef,
    ActivityDefId,
    "activity_defs"
);

ordered_lookup_repository!(
    SqliteFindingDefRepository,
    FindingDefRepository,
    FindingDef,
    FindingDefId,
    "finding_defs"
);

/// `SQLite`-backed repository for the `request_types` table.
pub struct SqliteRequestTypeRepository {
    pool: SqlitePool,
}

impl SqliteRequestTypeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RequestTypeRepository for SqliteRequestTypeRepository {
    async fn create(&self, request_type: RequestType) -> Result<RequestType, SanitrackError> {
        sqlx::query("INSERT INTO request_types (id, name, position) VALUES (?, ?, ?)")
            .bind(request_type.id.to_string())
            .bind(&request_type.name)
            .bind(i64::from(request_type.position))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(request_type)
    }

    async fn get_by_id(&self, id: RequestTypeId) -> Result<Option<RequestType>, SanitrackError> {
        let row = sqlx::query("SELECT * FROM request_types WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|row| {
            decode_lookup_row(&row).map(|(id, name, position)| RequestType {
                id: RequestTypeId::from_uuid(id),
                name,
                position,
            })
        })
        .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<RequestType>, SanitrackError> {
        let row = sqlx::query("SELECT * FROM request_types WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|row| {
            decode_lookup_row(&row).map(|(id, name, position)| RequestType {
                id: RequestTypeId::from_uuid(id),
                name,
                position,
            })
        })
        .transpose()
    }

    async fn get_all(&self) -> Result<Vec<RequestType>, SanitrackError> {
        let rows = sqlx::query("SELECT * FROM request_types ORDER BY position, name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        rows.iter()
            .map(|row| {
                decode_lookup_row(row).map(|(id, name, position)| RequestType {
                    id: RequestTypeId::from_uuid(id),
                    name,
                    position,
                })
            })
            .collect()
    }

    async fn update(&self, request_type: RequestType) -> Result<RequestType, SanitrackError> {
        sqlx::query("UPDATE request_types SET name = ?, position = ? WHERE id = ?")
            .bind(&request_type.name)
            .bind(i64::from(request_type.position))
            .bind(request_type.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(request_type)
    }

    async fn delete(&self, id: RequestTypeId) -> Result<(), SanitrackError> {
        sqlx::query("DELETE FROM request_types WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_restrict(err, "RequestType"))?;

        Ok(())
    }
}

/// Wrapper for converting database rows into domain [`ProductDef`].
struct ProductWrapper(ProductDef);

impl<'r> FromRow<'r, SqliteRow> for ProductWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = ProductDefId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(ProductDef {
            id,
            supplier: row.try_get("supplier")?,
            trade_name: row.try_get("trade_name")?,
            active_ingredient: row.try_get("active_ingredient")?,
            packaging: row.try_get("packaging")?,
            antidote: row.try_get("antidote")?,
            active: row.try_get("active")?,
        }))
    }
}

const INSERT_PRODUCT: &str = "
    INSERT INTO product_defs (id, supplier, trade_name, active_ingredient, packaging, antidote, active)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_PRODUCT_BY_ID: &str = "SELECT * FROM product_defs WHERE id = ?";
const SELECT_ALL_PRODUCTS: &str = "SELECT * FROM product_defs ORDER BY trade_name";
const UPDATE_PRODUCT: &str = "
    UPDATE product_defs
    SET supplier = ?, trade_name = ?, active_ingredient = ?, packaging = ?, antidote = ?, active = ?
    WHERE id = ?
";
const DELETE_PRODUCT: &str = "DELETE FROM product_defs WHERE id = ?";

/// `SQLite`-backed repository for the `product_defs` table.
pub struct SqliteProductDefRepository {
    pool: SqlitePool,
}

impl SqliteProductDefRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProductDefRepository for SqliteProductDefRepository {
    async fn create(&self, product: ProductDef) -> Result<ProductDef, SanitrackError> {
        sqlx::query(INSERT_PRODUCT)
            .bind(product.id.to_string())
            .bind(&product.supplier)
            .bind(&product.trade_name)
            .bind(&product.active_ingredient)
            .bind(&product.packaging)
            .bind(&product.antidote)
            .bind(product.active)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(product)
    }

    async fn get_by_id(&self, id: ProductDefId) -> Result<Option<ProductDef>, SanitrackError> {
        let row: Option<ProductWrapper> = sqlx::query_as(SELECT_PRODUCT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<ProductDef>, SanitrackError> {
        let rows: Vec<ProductWrapper> = sqlx::query_as(SELECT_ALL_PRODUCTS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, product: ProductDef) -> Result<ProductDef, SanitrackError> {
        sqlx::query(UPDATE_PRODUCT)
            .bind(&product.supplier)
            .bind(&product.trade_name)
            .bind(&product.active_ingredient)
            .bind(&product.packaging)
            .bind(&product.antidote)
            .bind(product.active)
            .bind(product.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(product)
    }

    async fn delete(&self, id: ProductDefId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_PRODUCT)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_restrict(err, "ProductDef"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn pool() -> SqlitePool {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
        .pool()
        .clone()
    }

    #[tokio::test]
    async fn should_list_request_types_in_position_order() {
        let repo = SqliteRequestTypeRepository::new(pool().await);
        repo.create(RequestType::new("Planned visit", 2)).await.unwrap();
        repo.create(RequestType::new("Complaint", 1)).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[0].name, "Complaint");
        assert_eq!(all[1].name, "Planned visit");
    }

    #[tokio::test]
    async fn should_find_request_type_by_name() {
        let repo = SqliteRequestTypeRepository::new(pool().await);
        repo.create(RequestType::new("Complaint", 1)).await.unwrap();

        let fetched = repo.find_by_name("Complaint").await.unwrap();
        assert!(fetched.is_some());
        assert!(repo.find_by_name("Unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_roundtrip_application_defs() {
        let repo = SqliteApplicationDefRepository::new(pool().await);
        let def = ApplicationDef::new("Gel treatment", 1);
        let id = def.id;
        repo.create(def).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Gel treatment");
    }

    #[tokio::test]
    async fn should_roundtrip_product_with_flags() {
        let repo = SqliteProductDefRepository::new(pool().await);
        let product = ProductDef::builder()
            .trade_name("RatStop 25")
            .supplier("VectorChem")
            .active_ingredient("Brodifacoum")
            .active(false)
            .build();
        let id = product.id;
        repo.create(product).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.trade_name, "RatStop 25");
        assert!(!fetched.active);
    }
}
