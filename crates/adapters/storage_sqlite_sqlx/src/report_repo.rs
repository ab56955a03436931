//! `SQLite` implementation of [`ActivityReportRepository`].
//!
//! One row per work record; regenerating a report overwrites the stored
//! snapshot in place and keeps the original row id.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::ActivityReportRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{ReportId, WorkRecordId};
use sanitrack_domain::report::ActivityReport;
use sanitrack_domain::time::Date;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`ActivityReport`].
struct Wrapper(ActivityReport);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ActivityReport> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let work_record_id: String = row.try_get("work_record_id")?;
        let report_date: String = row.try_get("report_date")?;

        let id = ReportId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let work_record_id = WorkRecordId::from_str(&work_record_id)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let report_date =
            Date::from_str(&report_date).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(ActivityReport {
            id,
            work_record_id,
            customer_code: row.try_get("customer_code")?,
            form_code: row.try_get("form_code")?,
            report_date,
            generated: row.try_get("generated")?,
            artifact_path: row.try_get("artifact_path")?,
        }))
    }
}

const UPSERT: &str = "
    INSERT INTO activity_reports
        (id, work_record_id, customer_code, form_code, report_date, generated, artifact_path)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (work_record_id)
    DO UPDATE SET customer_code = excluded.customer_code, form_code = excluded.form_code,
                  report_date = excluded.report_date, generated = excluded.generated,
                  artifact_path = excluded.artifact_path
";
const SELECT_BY_WORK_RECORD: &str = "SELECT * FROM activity_reports WHERE work_record_id = ?";
const SELECT_ALL: &str = "SELECT * FROM activity_reports ORDER BY report_date DESC";

/// `SQLite`-backed activity-report repository.
pub struct SqliteActivityReportRepository {
    pool: SqlitePool,
}

impl SqliteActivityReportRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActivityReportRepository for SqliteActivityReportRepository {
    async fn upsert(&self, report: ActivityReport) -> Result<ActivityReport, SanitrackError> {
        sqlx::query(UPSERT)
            .bind(report.id.to_string())
            .bind(report.work_record_id.to_string())
            .bind(&report.customer_code)
            .bind(&report.form_code)
            .bind(report.report_date.to_string())
            .bind(report.generated)
            .bind(report.artifact_path.as_deref())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        // The conflict clause keeps the original row id, so read the stored
        // row back instead of echoing the input.
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_WORK_RECORD)
            .bind(report.work_record_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row).unwrap_or(report))
    }

    async fn find_by_work_record(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Option<ActivityReport>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_WORK_RECORD)
            .bind(work_record_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<ActivityReport>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::user_repo::SqliteUserRepository;
    use crate::work_record_repo::SqliteWorkRecordRepository;
    use sanitrack_app::ports::{UserRepository, WorkRecordRepository};
    use sanitrack_domain::user::User;
    use sanitrack_domain::work_record::WorkRecord;

    async fn setup() -> (SqliteActivityReportRepository, WorkRecord) {
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

        let record = WorkRecord::builder(technician_id)
            .date(Date::from_ymd_opt(2024, 1, 15).unwrap())
            .build();
        SqliteWorkRecordRepository::new(pool.clone())
            .create(record.clone())
            .await
            .unwrap();

        (SqliteActivityReportRepository::new(pool), record)
    }

    #[tokio::test]
    async fn should_store_and_fetch_report_row() {
        let (repo, record) = setup().await;
        let report = ActivityReport::for_work_record(&record, "C1");

        repo.upsert(report).await.unwrap();

        let fetched = repo.find_by_work_record(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.customer_code, "C1");
        assert!(fetched.generated);
    }

    #[tokio::test]
    async fn should_keep_one_row_when_regenerated() {
        let (repo, record) = setup().await;
        let first = repo
            .upsert(ActivityReport::for_work_record(&record, "C1"))
            .await
            .unwrap();
        let second = repo
            .upsert(ActivityReport::for_work_record(&record, "C1-updated"))
            .await
            .unwrap();

        // Same stored row, refreshed snapshot.
        assert_eq!(first.id, second.id);
        assert_eq!(second.customer_code, "C1-updated");
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }
}
