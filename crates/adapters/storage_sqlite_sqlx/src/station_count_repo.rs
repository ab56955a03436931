//! `SQLite` implementation of [`StationCountRepository`].
//!
//! The upsert is a single `INSERT … ON CONFLICT DO UPDATE` statement, so two
//! concurrent writers on the same (work record, station) pair cannot race a
//! check-then-insert; the composite primary key is the safety net.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::StationCountRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{FacilityId, StationId, WorkRecordId, ZoneId};
use sanitrack_domain::ledger::StationCount;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`StationCount`].
struct Wrapper(StationCount);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let work_record_id: String = row.try_get("work_record_id")?;
        let station_id: String = row.try_get("station_id")?;

        let work_record_id = WorkRecordId::from_str(&work_record_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let station_id =
            StationId::from_str(&station_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(StationCount {
            work_record_id,
            station_id,
            consumption_present: row.try_get("consumption_present")?,
            note: row.try_get("note")?,
        }))
    }
}

const UPSERT: &str = "
    INSERT INTO station_counts (work_record_id, station_id, consumption_present, note)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (work_record_id, station_id)
    DO UPDATE SET consumption_present = excluded.consumption_present, note = excluded.note
";
const SELECT_PAIR: &str =
    "SELECT * FROM station_counts WHERE work_record_id = ? AND station_id = ?";
const SELECT_BY_WORK_RECORD: &str = "SELECT * FROM station_counts WHERE work_record_id = ?";
const COUNT_FOR_FACILITY: &str = "
    SELECT COUNT(*) AS n FROM station_counts sc
    JOIN stations s ON s.id = sc.station_id
    JOIN zones z ON z.id = s.zone_id
    WHERE sc.work_record_id = ? AND z.facility_id = ?
";
const COUNT_FOR_FACILITY_AND_ZONE: &str = "
    SELECT COUNT(*) AS n FROM station_counts sc
    JOIN stations s ON s.id = sc.station_id
    JOIN zones z ON z.id = s.zone_id
    WHERE sc.work_record_id = ? AND z.facility_id = ? AND s.zone_id = ?
";

/// `SQLite`-backed station-count repository.
pub struct SqliteStationCountRepository {
    pool: SqlitePool,
}

impl SqliteStationCountRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StationCountRepository for SqliteStationCountRepository {
    async fn upsert(&self, entry: StationCount) -> Result<StationCount, SanitrackError> {
        sqlx::query(UPSERT)
            .bind(entry.work_record_id.to_string())
            .bind(entry.station_id.to_string())
            .bind(entry.consumption_present)
            .bind(&entry.note)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(entry)
    }

    async fn get(
        &self,
        work_record_id: WorkRecordId,
        station_id: StationId,
    ) -> Result<Option<StationCount>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_PAIR)
            .bind(work_record_id.to_string())
            .bind(station_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn list_for_work_record(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<StationCount>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_WORK_RECORD)
            .bind(work_record_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn count_for_facility(
        &self,
        work_record_id: WorkRecordId,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<u64, SanitrackError> {
        let count: (i64,) = match zone_id {
            Some(zone_id) => sqlx::query_as(COUNT_FOR_FACILITY_AND_ZONE)
                .bind(work_record_id.to_string())
                .bind(facility_id.to_string())
                .bind(zone_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?,
            None => sqlx::query_as(COUNT_FOR_FACILITY)
                .bind(work_record_id.to_string())
                .bind(facility_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?,
        };

        Ok(u64::try_from(count.0).unwrap_or(0))
    }

    async fn entries_for_records(
        &self,
        work_record_ids: &[WorkRecordId],
    ) -> Result<Vec<StationCount>, SanitrackError> {
        if work_record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; work_record_ids.len()].join(", ");
        let sql = format!("SELECT * FROM station_counts WHERE work_record_id IN ({placeholders})");
        let mut query = sqlx::query_as::<_, Wrapper>(&sql);
        for id in work_record_ids {
            query = query.bind(id.to_string());
        }

        let rows: Vec<Wrapper> = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_repo::SqliteCustomerRepository;
    use crate::facility_repo::SqliteFacilityRepository;
    use crate::pool::Config;
    use crate::station_repo::SqliteStationRepository;
    use crate::user_repo::SqliteUserRepository;
    use crate::work_record_repo::SqliteWorkRecordRepository;
    use crate::zone_repo::SqliteZoneRepository;
    use sanitrack_app::ports::{
        CustomerRepository, FacilityRepository, StationRepository, UserRepository,
        WorkRecordRepository, ZoneRepository,
    };
    use sanitrack_domain::customer::Customer;
    use sanitrack_domain::facility::Facility;
    use sanitrack_domain::station::Station;
    use sanitrack_domain::user::User;
    use sanitrack_domain::work_record::WorkRecord;
    use sanitrack_domain::zone::Zone;

    struct Fixture {
        repo: SqliteStationCountRepository,
        stations_repo: SqliteStationRepository,
        facility_id: FacilityId,
        zone_id: ZoneId,
        work_record_id: WorkRecordId,
        station_ids: Vec<StationId>,
    }

    async fn setup(station_count: usize) -> Fixture {
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

        let zone = Zone::builder(facility_id).code("Z1").name("Warehouse").build().unwrap();
        let zone_id = zone.id;
        SqliteZoneRepository::new(pool.clone()).create(zone).await.unwrap();

        let stations_repo = SqliteStationRepository::new(pool.clone());
        let mut station_ids = Vec::new();
        for i in 1..=station_count {
            let mut station = Station::builder(zone_id)
                .code(format!("S{i}"))
                .name(format!("Bait box {i}"))
                .build()
                .unwrap();
            station.unique_code = format!("C1-F1-Z1-S{i}");
            station_ids.push(station.id);
            stations_repo.create(station).await.unwrap();
        }

        let user = User::builder().username("tech1").build().unwrap();
        let technician_id = user.id;
        SqliteUserRepository::new(pool.clone()).create(user).await.unwrap();

        let record = WorkRecord::builder(technician_id).build();
        let work_record_id = record.id;
        SqliteWorkRecordRepository::new(pool.clone())
            .create(record)
            .await
            .unwrap();

        Fixture {
            repo: SqliteStationCountRepository::new(pool),
            stations_repo,
            facility_id,
            zone_id,
            work_record_id,
            station_ids,
        }
    }

    #[tokio::test]
    async fn should_insert_then_update_in_place_on_conflict() {
        let fixture = setup(1).await;
        let station_id = fixture.station_ids[0];

        fixture
            .repo
            .upsert(StationCount::new(
                fixture.work_record_id,
                station_id,
                true,
                "droppings",
            ))
            .await
            .unwrap();
        fixture
            .repo
            .upsert(StationCount::new(
                fixture.work_record_id,
                station_id,
                false,
                "clean",
            ))
            .await
            .unwrap();

        let entries = fixture
            .repo
            .list_for_work_record(fixture.work_record_id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].consumption_present);
        assert_eq!(entries[0].note, "clean");
    }

    #[tokio::test]
    async fn should_count_entries_scoped_to_facility_and_zone() {
        let fixture = setup(3).await;
        for station_id in &fixture.station_ids[..2] {
            fixture
                .repo
                .upsert(StationCount::new(
                    fixture.work_record_id,
                    *station_id,
                    true,
                    "",
                ))
                .await
                .unwrap();
        }

        let facility_count = fixture
            .repo
            .count_for_facility(fixture.work_record_id, fixture.facility_id, None)
            .await
            .unwrap();
        assert_eq!(facility_count, 2);

        let zone_count = fixture
            .repo
            .count_for_facility(
                fixture.work_record_id,
                fixture.facility_id,
                Some(fixture.zone_id),
            )
            .await
            .unwrap();
        assert_eq!(zone_count, 2);
    }

    #[tokio::test]
    async fn should_collect_entries_for_multiple_records() {
        let fixture = setup(2).await;
        fixture
            .repo
            .upsert(StationCount::new(
                fixture.work_record_id,
                fixture.station_ids[0],
                true,
                "",
            ))
            .await
            .unwrap();

        let entries = fixture
            .repo
            .entries_for_records(&[fixture.work_record_id, WorkRecordId::new()])
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);

        let none = fixture.repo.entries_for_records(&[]).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn should_block_station_delete_while_counts_reference_it() {
        let fixture = setup(1).await;
        let station_id = fixture.station_ids[0];
        fixture
            .repo
            .upsert(StationCount::new(fixture.work_record_id, station_id, true, ""))
            .await
            .unwrap();

        let result = fixture.stations_repo.delete(station_id).await;
        assert!(matches!(
            result,
            Err(SanitrackError::ReferentialIntegrity(_))
        ));
    }
}
