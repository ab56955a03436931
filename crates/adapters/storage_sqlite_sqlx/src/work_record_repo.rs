//! `SQLite` implementation of [`WorkRecordRepository`].
//!
//! The `closing_request_id` column carries a unique index: it is the safety
//! net that keeps the closes-edge one-to-one under concurrent rebinds.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::WorkRecordRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{CustomerId, FacilityId, RequestId, TeamId, UserId, WorkRecordId};
use sanitrack_domain::time::{Date, TimeOfDay};
use sanitrack_domain::work_record::{
    EquipmentFlags, WorkProgress, WorkRecord, WorkRecordVisit,
};

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`WorkRecord`].
struct Wrapper(WorkRecord);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<WorkRecord> {
        value.map(|w| w.0)
    }
}

fn decode<T: FromStr>(value: &str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let work_date: String = row.try_get("work_date")?;
        let technician_id: String = row.try_get("technician_id")?;
        let team_id: Option<String> = row.try_get("team_id")?;
        let customer_id: Option<String> = row.try_get("customer_id")?;
        let facility_id: Option<String> = row.try_get("facility_id")?;
        let started_at: Option<String> = row.try_get("started_at")?;
        let ended_at: Option<String> = row.try_get("ended_at")?;
        let progress: String = row.try_get("progress")?;
        let closing_request_id: Option<String> = row.try_get("closing_request_id")?;

        Ok(Self(WorkRecord {
            id: decode::<WorkRecordId>(&id)?,
            date: decode::<Date>(&work_date)?,
            technician_id: decode::<UserId>(&technician_id)?,
            team_id: team_id.as_deref().map(decode::<TeamId>).transpose()?,
            customer_id: customer_id.as_deref().map(decode::<CustomerId>).transpose()?,
            facility_id: facility_id.as_deref().map(decode::<FacilityId>).transpose()?,
            started_at: started_at.as_deref().map(decode::<TimeOfDay>).transpose()?,
            ended_at: ended_at.as_deref().map(decode::<TimeOfDay>).transpose()?,
            progress: WorkProgress::from_str(&progress)
                .map_err(|err| sqlx::Error::Decode(err.into()))?,
            observation_visit_required: row.try_get("observation_visit_required")?,
            out_of_contract_work: row.try_get("out_of_contract_work")?,
            equipment: EquipmentFlags {
                knapsack_sprayer: row.try_get("knapsack_sprayer")?,
                atomizer: row.try_get("atomizer")?,
                sprayer: row.try_get("sprayer")?,
                thermal_fogger: row.try_get("thermal_fogger")?,
                vehicle_ulv: row.try_get("vehicle_ulv")?,
                electric_ulv: row.try_get("electric_ulv")?,
                nail_gun: row.try_get("nail_gun")?,
            },
            recommendations: row.try_get("recommendations")?,
            note: row.try_get("note")?,
            closing_request_id: closing_request_id
                .as_deref()
                .map(decode::<RequestId>)
                .transpose()?,
            form_number: row.try_get("form_number")?,
        }))
    }
}

const INSERT: &str = "
    INSERT INTO work_records
        (id, work_date, technician_id, team_id, customer_id, facility_id, started_at, ended_at,
         progress, observation_visit_required, out_of_contract_work, knapsack_sprayer, atomizer,
         sprayer, thermal_fogger, vehicle_ulv, electric_ulv, nail_gun, recommendations, note,
         closing_request_id, form_number)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM work_records WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM work_records ORDER BY work_date DESC";
const UPDATE: &str = "
    UPDATE work_records
    SET work_date = ?, technician_id = ?, team_id = ?, customer_id = ?, facility_id = ?,
        started_at = ?, ended_at = ?, progress = ?, observation_visit_required = ?,
        out_of_contract_work = ?, knapsack_sprayer = ?, atomizer = ?, sprayer = ?,
        thermal_fogger = ?, vehicle_ulv = ?, electric_ulv = ?, nail_gun = ?, recommendations = ?,
        note = ?, closing_request_id = ?, form_number = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM work_records WHERE id = ?";
const SELECT_BY_CLOSING_REQUEST: &str = "SELECT * FROM work_records WHERE closing_request_id = ?";
const SELECT_VISITS: &str = "
    SELECT wr.id, wr.work_date FROM work_records wr
    LEFT JOIN service_requests sr ON sr.id = wr.closing_request_id
    WHERE (wr.facility_id = ? OR sr.facility_id = ?)
      AND wr.work_date >= ? AND wr.work_date <= ?
    ORDER BY wr.work_date ASC
";

/// `SQLite`-backed work-record repository.
pub struct SqliteWorkRecordRepository {
    pool: SqlitePool,
}

impl SqliteWorkRecordRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn closing_key(record: &WorkRecord) -> String {
        record
            .closing_request_id
            .map(|id| format!("closing_request={id}"))
            .unwrap_or_default()
    }
}

impl WorkRecordRepository for SqliteWorkRecordRepository {
    async fn create(&self, record: WorkRecord) -> Result<WorkRecord, SanitrackError> {
        sqlx::query(INSERT)
            .bind(record.id.to_string())
            .bind(record.date.to_string())
            .bind(record.technician_id.to_string())
            .bind(record.team_id.map(|id| id.to_string()))
            .bind(record.customer_id.map(|id| id.to_string()))
            .bind(record.facility_id.map(|id| id.to_string()))
            .bind(record.started_at.map(|t| t.format("%H:%M:%S").to_string()))
            .bind(record.ended_at.map(|t| t.format("%H:%M:%S").to_string()))
            .bind(record.progress.to_string())
            .bind(record.observation_visit_required)
            .bind(record.out_of_contract_work)
            .bind(record.equipment.knapsack_sprayer)
            .bind(record.equipment.atomizer)
            .bind(record.equipment.sprayer)
            .bind(record.equipment.thermal_fogger)
            .bind(record.equipment.vehicle_ulv)
            .bind(record.equipment.electric_ulv)
            .bind(record.equipment.nail_gun)
            .bind(&record.recommendations)
            .bind(&record.note)
            .bind(record.closing_request_id.map(|id| id.to_string()))
            .bind(&record.form_number)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "WorkRecord", Self::closing_key(&record)))?;

        Ok(record)
    }

    async fn get_by_id(&self, id: WorkRecordId) -> Result<Option<WorkRecord>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<WorkRecord>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, record: WorkRecord) -> Result<WorkRecord, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(record.date.to_string())
            .bind(record.technician_id.to_string())
            .bind(record.team_id.map(|id| id.to_string()))
            .bind(record.customer_id.map(|id| id.to_string()))
            .bind(record.facility_id.map(|id| id.to_string()))
            .bind(record.started_at.map(|t| t.format("%H:%M:%S").to_string()))
            .bind(record.ended_at.map(|t| t.format("%H:%M:%S").to_string()))
            .bind(record.progress.to_string())
            .bind(record.observation_visit_required)
            .bind(record.out_of_contract_work)
            .bind(record.equipment.knapsack_sprayer)
            .bind(record.equipment.atomizer)
            .bind(record.equipment.sprayer)
            .bind(record.equipment.thermal_fogger)
            .bind(record.equipment.vehicle_ulv)
            .bind(record.equipment.electric_ulv)
            .bind(record.equipment.nail_gun)
            .bind(&record.recommendations)
            .bind(&record.note)
            .bind(record.closing_request_id.map(|id| id.to_string()))
            .bind(&record.form_number)
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "WorkRecord", Self::closing_key(&record)))?;

        Ok(record)
    }

    async fn delete(&self, id: WorkRecordId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn find_by_closing_request(
        &self,
        request_id: RequestId,
    ) -> Result<Option<WorkRecord>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_CLOSING_REQUEST)
            .bind(request_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn visits_for_facility(
        &self,
        facility_id: FacilityId,
        start: Date,
        end: Date,
    ) -> Result<Vec<WorkRecordVisit>, SanitrackError> {
        let rows = sqlx::query(SELECT_VISITS)
            .bind(facility_id.to_string())
            .bind(facility_id.to_string())
            .bind(start.to_string())
            .bind(end.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(StorageError::from)?;
                let work_date: String = row.try_get("work_date").map_err(StorageError::from)?;
                let id = WorkRecordId::from_str(&id).map_err(|err| {
                    StorageError::Database(sqlx::Error::Decode(Box::new(err)))
                })?;
                let date = Date::from_str(&work_date).map_err(|err| {
                    StorageError::Database(sqlx::Error::Decode(Box::new(err)))
                })?;
                Ok(WorkRecordVisit { id, date })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_repo::SqliteCustomerRepository;
    use crate::definition_repo::SqliteRequestTypeRepository;
    use crate::facility_repo::SqliteFacilityRepository;
    use crate::pool::Config;
    use crate::request_repo::SqliteRequestRepository;
    use crate::user_repo::SqliteUserRepository;
    use sanitrack_app::ports::{
        CustomerRepository, FacilityRepository, RequestRepository, RequestTypeRepository,
        UserRepository,
    };
    use sanitrack_domain::customer::Customer;
    use sanitrack_domain::facility::Facility;
    use sanitrack_domain::lookup::RequestType;
    use sanitrack_domain::request::ServiceRequest;
    use sanitrack_domain::user::User;

    struct Fixture {
        pool: SqlitePool,
        repo: SqliteWorkRecordRepository,
        technician_id: UserId,
        facility_id: FacilityId,
        customer_id: CustomerId,
        type_id: sanitrack_domain::id::RequestTypeId,
    }

    async fn setup() -> Fixture {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        let pool = db.pool().clone();

        let user = User::builder().username("tech1").build().unwrap();
        let technician_id = user.id;
        SqliteUserRepository::new(pool.clone()).create(user).await.unwrap();

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

        let request_type = RequestType::new("Complaint", 1);
        let type_id = request_type.id;
        SqliteRequestTypeRepository::new(pool.clone())
            .create(request_type)
            .await
            .unwrap();

        Fixture {
            repo: SqliteWorkRecordRepository::new(pool.clone()),
            pool,
            technician_id,
            facility_id,
            customer_id,
            type_id,
        }
    }

    async fn insert_request(fixture: &Fixture) -> RequestId {
        let request = ServiceRequest::builder(fixture.customer_id, fixture.type_id)
            .facility_id(fixture.facility_id)
            .description("Rodent sighting near dock")
            .build()
            .unwrap();
        let id = request.id;
        SqliteRequestRepository::new(fixture.pool.clone())
            .create(request)
            .await
            .unwrap();
        id
    }

    fn record(fixture: &Fixture, day: u32) -> WorkRecord {
        WorkRecord::builder(fixture.technician_id)
            .date(Date::from_ymd_opt(2024, 1, day).unwrap())
            .build()
    }

    #[tokio::test]
    async fn should_roundtrip_work_record_with_equipment_flags() {
        let fixture = setup().await;
        let mut wr = record(&fixture, 15);
        wr.equipment.atomizer = true;
        wr.equipment.nail_gun = true;
        wr.recommendations = "Seal dock door gap".to_string();
        let id = wr.id;

        fixture.repo.create(wr).await.unwrap();

        let fetched = fixture.repo.get_by_id(id).await.unwrap().unwrap();
        assert!(fetched.equipment.atomizer);
        assert!(fetched.equipment.nail_gun);
        assert!(!fetched.equipment.sprayer);
        assert_eq!(fetched.progress, WorkProgress::NotStarted);
        assert_eq!(fetched.recommendations, "Seal dock door gap");
    }

    #[tokio::test]
    async fn should_roundtrip_start_and_end_times() {
        let fixture = setup().await;
        let mut wr = record(&fixture, 15);
        wr.start(TimeOfDay::from_hms_opt(9, 15, 0).unwrap());
        wr.finish(TimeOfDay::from_hms_opt(16, 30, 0).unwrap());
        let id = wr.id;

        fixture.repo.create(wr).await.unwrap();

        let fetched = fixture.repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.started_at, TimeOfDay::from_hms_opt(9, 15, 0));
        assert_eq!(fetched.ended_at, TimeOfDay::from_hms_opt(16, 30, 0));
        assert!(fetched.is_locked());
    }

    #[tokio::test]
    async fn should_enforce_closing_edge_uniqueness() {
        let fixture = setup().await;
        let request_id = insert_request(&fixture).await;

        let mut first = record(&fixture, 15);
        first.closing_request_id = Some(request_id);
        fixture.repo.create(first).await.unwrap();

        let mut second = record(&fixture, 16);
        second.closing_request_id = Some(request_id);
        let result = fixture.repo.create(second).await;

        assert!(matches!(result, Err(SanitrackError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn should_find_record_by_closing_request() {
        let fixture = setup().await;
        let request_id = insert_request(&fixture).await;
        let mut wr = record(&fixture, 15);
        wr.closing_request_id = Some(request_id);
        let id = wr.id;
        fixture.repo.create(wr).await.unwrap();

        let found = fixture
            .repo
            .find_by_closing_request(request_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn should_list_visits_by_direct_facility_or_closing_request() {
        let fixture = setup().await;
        let request_id = insert_request(&fixture).await;

        // Visit tied to the facility through its closing request.
        let mut via_request = record(&fixture, 10);
        via_request.closing_request_id = Some(request_id);
        fixture.repo.create(via_request).await.unwrap();

        // Visit tied to the facility directly.
        let mut direct = record(&fixture, 20);
        direct.facility_id = Some(fixture.facility_id);
        fixture.repo.create(direct).await.unwrap();

        // Out of range.
        let mut early = record(&fixture, 1);
        early.facility_id = Some(fixture.facility_id);
        fixture.repo.create(early).await.unwrap();

        let visits = fixture
            .repo
            .visits_for_facility(
                fixture.facility_id,
                Date::from_ymd_opt(2024, 1, 5).unwrap(),
                Date::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].date, Date::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(visits[1].date, Date::from_ymd_opt(2024, 1, 20).unwrap());
    }
}
