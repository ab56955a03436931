//! `SQLite` implementation of [`RequestRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::RequestRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{CustomerId, FacilityId, RequestId, RequestTypeId, TeamId};
use sanitrack_domain::request::{RequestCodes, RequestStatus, ServiceRequest};
use sanitrack_domain::time::Date;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`ServiceRequest`].
struct Wrapper(ServiceRequest);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ServiceRequest> {
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
        let customer_id: String = row.try_get("customer_id")?;
        let facility_id: Option<String> = row.try_get("facility_id")?;
        let request_date: String = row.try_get("request_date")?;
        let request_type_id: String = row.try_get("request_type_id")?;
        let status: String = row.try_get("status")?;
        let planned_date: Option<String> = row.try_get("planned_date")?;
        let planned_team_id: Option<String> = row.try_get("planned_team_id")?;
        let related_request_id: Option<String> = row.try_get("related_request_id")?;

        Ok(Self(ServiceRequest {
            id: decode::<RequestId>(&id)?,
            customer_id: decode::<CustomerId>(&customer_id)?,
            facility_id: facility_id.as_deref().map(decode::<FacilityId>).transpose()?,
            date: decode::<Date>(&request_date)?,
            request_type_id: decode::<RequestTypeId>(&request_type_id)?,
            description: row.try_get("description")?,
            status: RequestStatus::from_str(&status)
                .map_err(|err| sqlx::Error::Decode(err.into()))?,
            planned_date: planned_date.as_deref().map(decode::<Date>).transpose()?,
            planned_team_id: planned_team_id
                .as_deref()
                .map(decode::<TeamId>)
                .transpose()?,
            related_request_id: related_request_id
                .as_deref()
                .map(decode::<RequestId>)
                .transpose()?,
        }))
    }
}

const INSERT: &str = "
    INSERT INTO service_requests
        (id, customer_id, facility_id, request_date, request_type_id, description, status,
         planned_date, planned_team_id, related_request_id)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM service_requests WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM service_requests ORDER BY request_date DESC";
const SELECT_OPEN: &str =
    "SELECT * FROM service_requests WHERE status != 'done' ORDER BY request_date DESC";
const UPDATE: &str = "
    UPDATE service_requests
    SET customer_id = ?, facility_id = ?, request_date = ?, request_type_id = ?, description = ?,
        status = ?, planned_date = ?, planned_team_id = ?, related_request_id = ?
    WHERE id = ?
";
const SET_STATUS: &str = "UPDATE service_requests SET status = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM service_requests WHERE id = ?";
const CODES: &str = "
    SELECT c.code AS customer_code, f.code AS facility_code
    FROM service_requests r
    JOIN customers c ON c.id = r.customer_id
    LEFT JOIN facilities f ON f.id = r.facility_id
    WHERE r.id = ?
";

/// `SQLite`-backed service-request repository.
pub struct SqliteRequestRepository {
    pool: SqlitePool,
}

impl SqliteRequestRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RequestRepository for SqliteRequestRepository {
    async fn create(&self, request: ServiceRequest) -> Result<ServiceRequest, SanitrackError> {
        sqlx::query(INSERT)
            .bind(request.id.to_string())
            .bind(request.customer_id.to_string())
            .bind(request.facility_id.map(|id| id.to_string()))
            .bind(request.date.to_string())
            .bind(request.request_type_id.to_string())
            .bind(&request.description)
            .bind(request.status.to_string())
            .bind(request.planned_date.map(|d| d.to_string()))
            .bind(request.planned_team_id.map(|id| id.to_string()))
            .bind(request.related_request_id.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(request)
    }

    async fn get_by_id(&self, id: RequestId) -> Result<Option<ServiceRequest>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<ServiceRequest>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn list_open(&self) -> Result<Vec<ServiceRequest>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_OPEN)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, request: ServiceRequest) -> Result<ServiceRequest, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(request.customer_id.to_string())
            .bind(request.facility_id.map(|id| id.to_string()))
            .bind(request.date.to_string())
            .bind(request.request_type_id.to_string())
            .bind(&request.description)
            .bind(request.status.to_string())
            .bind(request.planned_date.map(|d| d.to_string()))
            .bind(request.planned_team_id.map(|id| id.to_string()))
            .bind(request.related_request_id.map(|id| id.to_string()))
            .bind(request.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(request)
    }

    async fn set_status(&self, id: RequestId, status: RequestStatus) -> Result<(), SanitrackError> {
        sqlx::query(SET_STATUS)
            .bind(status.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn delete(&self, id: RequestId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn codes(&self, id: RequestId) -> Result<Option<RequestCodes>, SanitrackError> {
        let row = sqlx::query(CODES)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|row| {
            Ok(RequestCodes {
                customer_code: row.try_get("customer_code").map_err(StorageError::from)?,
                facility_code: row.try_get("facility_code").map_err(StorageError::from)?,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_repo::SqliteCustomerRepository;
    use crate::definition_repo::SqliteRequestTypeRepository;
    use crate::facility_repo::SqliteFacilityRepository;
    use crate::pool::Config;
    use sanitrack_app::ports::{CustomerRepository, FacilityRepository, RequestTypeRepository};
    use sanitrack_domain::customer::Customer;
    use sanitrack_domain::facility::Facility;
    use sanitrack_domain::lookup::RequestType;

    struct Fixture {
        repo: SqliteRequestRepository,
        customer_id: CustomerId,
        facility_id: FacilityId,
        type_id: RequestTypeId,
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

        let request_type = RequestType::new("Complaint", 1);
        let type_id = request_type.id;
        SqliteRequestTypeRepository::new(pool.clone())
            .create(request_type)
            .await
            .unwrap();

        Fixture {
            repo: SqliteRequestRepository::new(pool),
            customer_id,
            facility_id,
            type_id,
        }
    }

    fn request(fixture: &Fixture) -> ServiceRequest {
        ServiceRequest::builder(fixture.customer_id, fixture.type_id)
            .facility_id(fixture.facility_id)
            .date(Date::from_ymd_opt(2024, 1, 5).unwrap())
            .description("Rodent sighting near dock")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_request() {
        let fixture = setup().await;
        let req = request(&fixture);
        let id = req.id;

        fixture.repo.create(req).await.unwrap();

        let fetched = fixture.repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, RequestStatus::Pending);
        assert_eq!(fetched.date, Date::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(fetched.facility_id, Some(fixture.facility_id));
    }

    #[tokio::test]
    async fn should_resolve_codes_with_facility() {
        let fixture = setup().await;
        let req = request(&fixture);
        let id = req.id;
        fixture.repo.create(req).await.unwrap();

        let codes = fixture.repo.codes(id).await.unwrap().unwrap();
        assert_eq!(codes.customer_code, "C1");
        assert_eq!(codes.facility_code.as_deref(), Some("F1"));
    }

    #[tokio::test]
    async fn should_resolve_codes_without_facility() {
        let fixture = setup().await;
        let req = ServiceRequest::builder(fixture.customer_id, fixture.type_id)
            .description("Customer-wide inspection")
            .build()
            .unwrap();
        let id = req.id;
        fixture.repo.create(req).await.unwrap();

        let codes = fixture.repo.codes(id).await.unwrap().unwrap();
        assert_eq!(codes.customer_code, "C1");
        assert!(codes.facility_code.is_none());
    }

    #[tokio::test]
    async fn should_update_only_status_with_set_status() {
        let fixture = setup().await;
        let req = request(&fixture);
        let id = req.id;
        fixture.repo.create(req).await.unwrap();

        fixture
            .repo
            .set_status(id, RequestStatus::Done)
            .await
            .unwrap();

        let fetched = fixture.repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, RequestStatus::Done);
        assert_eq!(fetched.description, "Rodent sighting near dock");
    }

    #[tokio::test]
    async fn should_exclude_done_requests_from_open_list() {
        let fixture = setup().await;
        let req = request(&fixture);
        let id = req.id;
        fixture.repo.create(req).await.unwrap();
        fixture
            .repo
            .set_status(id, RequestStatus::Done)
            .await
            .unwrap();

        let open = fixture.repo.list_open().await.unwrap();
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn should_block_request_type_delete_while_referenced() {
        let fixture = setup().await;
        fixture.repo.create(request(&fixture)).await.unwrap();

        let types = SqliteRequestTypeRepository::new(fixture.repo.pool.clone());
        let result = types.delete(fixture.type_id).await;
        assert!(matches!(
            result,
            Err(SanitrackError::ReferentialIntegrity(_))
        ));
    }
}
