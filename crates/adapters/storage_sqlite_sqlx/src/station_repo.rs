//! `SQLite` implementation of [`StationRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::StationRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{FacilityId, StationId, ZoneId};
use sanitrack_domain::station::Station;

use crate::error::{StorageError, map_restrict, map_unique};

/// Wrapper for converting database rows into domain [`Station`].
struct Wrapper(Station);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Station> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let zone_id: String = row.try_get("zone_id")?;

        let id = StationId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let zone_id =
            ZoneId::from_str(&zone_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Station {
            id,
            zone_id,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            unique_code: row.try_get("unique_code")?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO stations (id, zone_id, code, name, unique_code) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM stations WHERE id = ?";
const SELECT_BY_ZONE: &str = "SELECT * FROM stations WHERE zone_id = ? ORDER BY code";
const SELECT_BY_FACILITY: &str = "
    SELECT s.* FROM stations s
    JOIN zones z ON z.id = s.zone_id
    WHERE z.facility_id = ?
    ORDER BY z.code, s.code
";
const SELECT_BY_FACILITY_AND_ZONE: &str = "
    SELECT s.* FROM stations s
    JOIN zones z ON z.id = s.zone_id
    WHERE z.facility_id = ? AND s.zone_id = ?
    ORDER BY z.code, s.code
";
const SELECT_BY_UNIQUE_CODE: &str = "SELECT * FROM stations WHERE unique_code = ?";
const COUNT_BY_FACILITY: &str = "
    SELECT COUNT(*) AS n FROM stations s
    JOIN zones z ON z.id = s.zone_id
    WHERE z.facility_id = ?
";
const COUNT_BY_FACILITY_AND_ZONE: &str = "
    SELECT COUNT(*) AS n FROM stations s
    JOIN zones z ON z.id = s.zone_id
    WHERE z.facility_id = ? AND s.zone_id = ?
";
const UPDATE: &str =
    "UPDATE stations SET zone_id = ?, code = ?, name = ?, unique_code = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM stations WHERE id = ?";

/// `SQLite`-backed station repository.
pub struct SqliteStationRepository {
    pool: SqlitePool,
}

impl SqliteStationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StationRepository for SqliteStationRepository {
    async fn create(&self, station: Station) -> Result<Station, SanitrackError> {
        sqlx::query(INSERT)
            .bind(station.id.to_string())
            .bind(station.zone_id.to_string())
            .bind(&station.code)
            .bind(&station.name)
            .bind(&station.unique_code)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Station", station.unique_code.clone()))?;

        Ok(station)
    }

    async fn get_by_id(&self, id: StationId) -> Result<Option<Station>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_zone(&self, zone_id: ZoneId) -> Result<Vec<Station>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ZONE)
            .bind(zone_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_facility(
        &self,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<Vec<Station>, SanitrackError> {
        let rows: Vec<Wrapper> = match zone_id {
            Some(zone_id) => sqlx::query_as(SELECT_BY_FACILITY_AND_ZONE)
                .bind(facility_id.to_string())
                .bind(zone_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?,
            None => sqlx::query_as(SELECT_BY_FACILITY)
                .bind(facility_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?,
        };

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> Result<Option<Station>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_UNIQUE_CODE)
            .bind(unique_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn count_for_facility(
        &self,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<u64, SanitrackError> {
        let count: (i64,) = match zone_id {
            Some(zone_id) => sqlx::query_as(COUNT_BY_FACILITY_AND_ZONE)
                .bind(facility_id.to_string())
                .bind(zone_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?,
            None => sqlx::query_as(COUNT_BY_FACILITY)
                .bind(facility_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?,
        };

        Ok(u64::try_from(count.0).unwrap_or(0))
    }

    async fn update(&self, station: Station) -> Result<Station, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(station.zone_id.to_string())
            .bind(&station.code)
            .bind(&station.name)
            .bind(&station.unique_code)
            .bind(station.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Station", station.unique_code.clone()))?;

        Ok(station)
    }

    async fn delete(&self, id: StationId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_restrict(err, "Station"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_repo::SqliteCustomerRepository;
    use crate::facility_repo::SqliteFacilityRepository;
    use crate::pool::Config;
    use crate::zone_repo::SqliteZoneRepository;
    use sanitrack_app::ports::{CustomerRepository, FacilityRepository, ZoneRepository};
    use sanitrack_domain::customer::Customer;
    use sanitrack_domain::facility::Facility;
    use sanitrack_domain::zone::Zone;

    struct Fixture {
        repo: SqliteStationRepository,
        facility_id: FacilityId,
        zone_a: ZoneId,
        zone_b: ZoneId,
    }

    async fn setup() -> Fixture {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        let customer = Customer::builder().code("C1").name("Acme Foods").build().unwrap();
        let customer_id = customer.id;
        SqliteCustomerRepository::new(pool.clone())
            .create(customer)
            .await
            .unwrap();

        let facility = Facility::builder(customer_id)
            .code("F1")
            .name("Main plant")
            .build()
            .unwrap();
        let facility_id = facility.id;
        SqliteFacilityRepository::new(pool.clone())
            .create(facility)
            .await
            .unwrap();

        let zones = SqliteZoneRepository::new(pool.clone());
        let zone_a = Zone::builder(facility_id).code("Z1").name("Warehouse").build().unwrap();
        let zone_b = Zone::builder(facility_id).code("Z2").name("Dock").build().unwrap();
        let (zone_a_id, zone_b_id) = (zone_a.id, zone_b.id);
        zones.create(zone_a).await.unwrap();
        zones.create(zone_b).await.unwrap();

        Fixture {
            repo: SqliteStationRepository::new(pool),
            facility_id,
            zone_a: zone_a_id,
            zone_b: zone_b_id,
        }
    }

    fn station(zone_id: ZoneId, code: &str, unique_code: &str) -> Station {
        let mut station = Station::builder(zone_id)
            .code(code)
            .name(format!("Bait box {code}"))
            .build()
            .unwrap();
        station.unique_code = unique_code.to_string();
        station
    }

    #[tokio::test]
    async fn should_create_and_find_station_by_unique_code() {
        let fixture = setup().await;
        fixture
            .repo
            .create(station(fixture.zone_a, "S1", "C1-F1-Z1-S1"))
            .await
            .unwrap();

        let fetched = fixture
            .repo
            .find_by_unique_code("C1-F1-Z1-S1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.code, "S1");
    }

    #[tokio::test]
    async fn should_report_conflict_on_duplicate_unique_code() {
        let fixture = setup().await;
        fixture
            .repo
            .create(station(fixture.zone_a, "S1", "C1-F1-Z1-S1"))
            .await
            .unwrap();

        let result = fixture
            .repo
            .create(station(fixture.zone_b, "S9", "C1-F1-Z1-S1"))
            .await;
        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn should_list_facility_stations_in_zone_then_code_order() {
        let fixture = setup().await;
        fixture
            .repo
            .create(station(fixture.zone_b, "S1", "C1-F1-Z2-S1"))
            .await
            .unwrap();
        fixture
            .repo
            .create(station(fixture.zone_a, "S2", "C1-F1-Z1-S2"))
            .await
            .unwrap();
        fixture
            .repo
            .create(station(fixture.zone_a, "S1", "C1-F1-Z1-S1"))
            .await
            .unwrap();

        let all = fixture
            .repo
            .find_by_facility(fixture.facility_id, None)
            .await
            .unwrap();
        let codes: Vec<&str> = all.iter().map(|s| s.unique_code.as_str()).collect();
        assert_eq!(codes, vec!["C1-F1-Z1-S1", "C1-F1-Z1-S2", "C1-F1-Z2-S1"]);
    }

    #[tokio::test]
    async fn should_narrow_listing_to_zone() {
        let fixture = setup().await;
        fixture
            .repo
            .create(station(fixture.zone_a, "S1", "C1-F1-Z1-S1"))
            .await
            .unwrap();
        fixture
            .repo
            .create(station(fixture.zone_b, "S1", "C1-F1-Z2-S1"))
            .await
            .unwrap();

        let zone_only = fixture
            .repo
            .find_by_facility(fixture.facility_id, Some(fixture.zone_a))
            .await
            .unwrap();
        assert_eq!(zone_only.len(), 1);
        assert_eq!(zone_only[0].unique_code, "C1-F1-Z1-S1");
    }

    #[tokio::test]
    async fn should_count_stations_per_facility_and_zone() {
        let fixture = setup().await;
        fixture
            .repo
            .create(station(fixture.zone_a, "S1", "C1-F1-Z1-S1"))
            .await
            .unwrap();
        fixture
            .repo
            .create(station(fixture.zone_a, "S2", "C1-F1-Z1-S2"))
            .await
            .unwrap();
        fixture
            .repo
            .create(station(fixture.zone_b, "S1", "C1-F1-Z2-S1"))
            .await
            .unwrap();

        assert_eq!(
            fixture
                .repo
                .count_for_facility(fixture.facility_id, None)
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            fixture
                .repo
                .count_for_facility(fixture.facility_id, Some(fixture.zone_b))
                .await
                .unwrap(),
            1
        );
    }
}
