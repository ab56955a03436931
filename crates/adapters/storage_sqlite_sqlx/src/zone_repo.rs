//! `SQLite` implementation of [`ZoneRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::ZoneRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{FacilityId, ZoneId};
use sanitrack_domain::station::CodePath;
use sanitrack_domain::zone::Zone;

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`Zone`].
struct Wrapper(Zone);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Zone> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let facility_id: String = row.try_get("facility_id")?;

        let id = ZoneId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let facility_id = FacilityId::from_str(&facility_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Zone {
            id,
            facility_id,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            note: row.try_get("note")?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO zones (id, facility_id, code, name, note) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM zones WHERE id = ?";
const SELECT_BY_FACILITY: &str = "SELECT * FROM zones WHERE facility_id = ? ORDER BY code";
const UPDATE: &str = "UPDATE zones SET code = ?, name = ?, note = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM zones WHERE id = ?";
const CODE_PATH: &str = "
    SELECT c.code AS customer_code, f.code AS facility_code, z.code AS zone_code
    FROM zones z
    JOIN facilities f ON f.id = z.facility_id
    JOIN customers c ON c.id = f.customer_id
    WHERE z.id = ?
";

/// `SQLite`-backed zone repository.
pub struct SqliteZoneRepository {
    pool: SqlitePool,
}

impl SqliteZoneRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ZoneRepository for SqliteZoneRepository {
    async fn create(&self, zone: Zone) -> Result<Zone, SanitrackError> {
        sqlx::query(INSERT)
            .bind(zone.id.to_string())
            .bind(zone.facility_id.to_string())
            .bind(&zone.code)
            .bind(&zone.name)
            .bind(&zone.note)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Zone", zone.code.clone()))?;

        Ok(zone)
    }

    async fn get_by_id(&self, id: ZoneId) -> Result<Option<Zone>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_facility(&self, facility_id: FacilityId) -> Result<Vec<Zone>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_FACILITY)
            .bind(facility_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, zone: Zone) -> Result<Zone, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(&zone.code)
            .bind(&zone.name)
            .bind(&zone.note)
            .bind(zone.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Zone", zone.code.clone()))?;

        Ok(zone)
    }

    async fn delete(&self, id: ZoneId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn code_path(&self, id: ZoneId) -> Result<Option<CodePath>, SanitrackError> {
        let row = sqlx::query(CODE_PATH)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|row| {
            Ok(CodePath {
                customer_code: row.try_get("customer_code").map_err(StorageError::from)?,
                facility_code: row.try_get("facility_code").map_err(StorageError::from)?,
                zone_code: row.try_get("zone_code").map_err(StorageError::from)?,
            })
        })
        .transpose()
    }
}
