//! `SQLite` implementation of [`WorkItemRepository`].
//!
//! Pair-unique line items use `ON CONFLICT DO UPDATE`; findings are plain
//! inserts keyed by their own id.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::WorkItemRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{
    ActivityDefId, ApplicationDefId, FindingDefId, FindingId, ProductDefId, WorkRecordId,
};
use sanitrack_domain::work_items::{
    ActivityFlags, ActivityLine, DetectedBy, Finding, PerformedApplication, ProductUsage, Severity,
};

use crate::error::{StorageError, map_restrict};

fn decode<T: FromStr>(value: &str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

struct ApplicationWrapper(PerformedApplication);

impl<'r> FromRow<'r, SqliteRow> for ApplicationWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let work_record_id: String = row.try_get("work_record_id")?;
        let application_id: String = row.try_get("application_id")?;

        Ok(Self(PerformedApplication {
            work_record_id: decode::<WorkRecordId>(&work_record_id)?,
            application_id: decode::<ApplicationDefId>(&application_id)?,
        }))
    }
}

struct ActivityWrapper(ActivityLine);

impl<'r> FromRow<'r, SqliteRow> for ActivityWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let work_record_id: String = row.try_get("work_record_id")?;
        let activity_id: String = row.try_get("activity_id")?;

        Ok(Self(ActivityLine {
            work_record_id: decode::<WorkRecordId>(&work_record_id)?,
            activity_id: decode::<ActivityDefId>(&activity_id)?,
            flags: ActivityFlags {
                checked: row.try_get("checked")?,
                installed: row.try_get("installed")?,
                added: row.try_get("added")?,
                secured: row.try_get("secured")?,
                relocated: row.try_get("relocated")?,
                renewed: row.try_get("renewed")?,
            },
        }))
    }
}

struct FindingWrapper(Finding);

impl<'r> FromRow<'r, SqliteRow> for FindingWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let work_record_id: String = row.try_get("work_record_id")?;
        let finding_id: String = row.try_get("finding_id")?;
        let severity: String = row.try_get("severity")?;
        let detected_by: String = row.try_get("detected_by")?;

        Ok(Self(Finding {
            id: decode::<FindingId>(&id)?,
            work_record_id: decode::<WorkRecordId>(&work_record_id)?,
            finding_id: decode::<FindingDefId>(&finding_id)?,
            severity: Severity::from_str(&severity)
                .map_err(|err| sqlx::Error::Decode(err.into()))?,
            detected_by: DetectedBy::from_str(&detected_by)
                .map_err(|err| sqlx::Error::Decode(err.into()))?,
        }))
    }
}

struct UsageWrapper(ProductUsage);

impl<'r> FromRow<'r, SqliteRow> for UsageWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let work_record_id: String = row.try_get("work_record_id")?;
        let product_id: String = row.try_get("product_id")?;

        Ok(Self(ProductUsage {
            work_record_id: decode::<WorkRecordId>(&work_record_id)?,
            product_id: decode::<ProductDefId>(&product_id)?,
            quantity: row.try_get("quantity")?,
        }))
    }
}

const UPSERT_APPLICATION: &str = "
    INSERT INTO work_record_applications (work_record_id, application_id)
    VALUES (?, ?)
    ON CONFLICT (work_record_id, application_id) DO NOTHING
";
const DELETE_APPLICATION: &str =
    "DELETE FROM work_record_applications WHERE work_record_id = ? AND application_id = ?";
const SELECT_APPLICATIONS: &str =
    "SELECT * FROM work_record_applications WHERE work_record_id = ?";

const UPSERT_ACTIVITY: &str = "
    INSERT INTO work_record_activities
        (work_record_id, activity_id, checked, installed, added, secured, relocated, renewed)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (work_record_id, activity_id)
    DO UPDATE SET checked = excluded.checked, installed = excluded.installed,
                  added = excluded.added, secured = excluded.secured,
                  relocated = excluded.relocated, renewed = excluded.renewed
";
const DELETE_ACTIVITY: &str =
    "DELETE FROM work_record_activities WHERE work_record_id = ? AND activity_id = ?";
const SELECT_ACTIVITIES: &str = "SELECT * FROM work_record_activities WHERE work_record_id = ?";

const INSERT_FINDING: &str = "
    INSERT INTO work_record_findings (id, work_record_id, finding_id, severity, detected_by)
    VALUES (?, ?, ?, ?, ?)
";
const DELETE_FINDING: &str = "DELETE FROM work_record_findings WHERE id = ?";
const SELECT_FINDINGS: &str = "SELECT * FROM work_record_findings WHERE work_record_id = ?";

const UPSERT_USAGE: &str = "
    INSERT INTO work_record_product_usages (work_record_id, product_id, quantity)
    VALUES (?, ?, ?)
    ON CONFLICT (work_record_id, product_id) DO UPDATE SET quantity = excluded.quantity
";
const DELETE_USAGE: &str =
    "DELETE FROM work_record_product_usages WHERE work_record_id = ? AND product_id = ?";
const SELECT_USAGES: &str = "SELECT * FROM work_record_product_usages WHERE work_record_id = ?";

/// `SQLite`-backed work-item repository.
pub struct SqliteWorkItemRepository {
    pool: SqlitePool,
}

impl SqliteWorkItemRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl WorkItemRepository for SqliteWorkItemRepository {
    async fn upsert_application(
        &self,
        row: PerformedApplication,
    ) -> Result<PerformedApplication, SanitrackError> {
        sqlx::query(UPSERT_APPLICATION)
            .bind(row.work_record_id.to_string())
            .bind(row.application_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row)
    }

    async fn remove_application(
        &self,
        work_record_id: WorkRecordId,
        application_id: ApplicationDefId,
    ) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_APPLICATION)
            .bind(work_record_id.to_string())
            .bind(application_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn list_applications(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<PerformedApplication>, SanitrackError> {
        let rows: Vec<ApplicationWrapper> = sqlx::query_as(SELECT_APPLICATIONS)
            .bind(work_record_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn upsert_activity(&self, row: ActivityLine) -> Result<ActivityLine, SanitrackError> {
        sqlx::query(UPSERT_ACTIVITY)
            .bind(row.work_record_id.to_string())
            .bind(row.activity_id.to_string())
            .bind(row.flags.checked)
            .bind(row.flags.installed)
            .bind(row.flags.added)
            .bind(row.flags.secured)
            .bind(row.flags.relocated)
            .bind(row.flags.renewed)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row)
    }

    async fn remove_activity(
        &self,
        work_record_id: WorkRecordId,
        activity_id: ActivityDefId,
    ) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_ACTIVITY)
            .bind(work_record_id.to_string())
            .bind(activity_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn list_activities(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<ActivityLine>, SanitrackError> {
        let rows: Vec<ActivityWrapper> = sqlx::query_as(SELECT_ACTIVITIES)
            .bind(work_record_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn add_finding(&self, finding: Finding) -> Result<Finding, SanitrackError> {
        sqlx::query(INSERT_FINDING)
            .bind(finding.id.to_string())
            .bind(finding.work_record_id.to_string())
            .bind(finding.finding_id.to_string())
            .bind(finding.severity.to_string())
            .bind(finding.detected_by.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(finding)
    }

    async fn remove_finding(&self, id: FindingId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_FINDING)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn list_findings(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<Finding>, SanitrackError> {
        let rows: Vec<FindingWrapper> = sqlx::query_as(SELECT_FINDINGS)
            .bind(work_record_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn upsert_product_usage(&self, row: ProductUsage) -> Result<ProductUsage, SanitrackError> {
        sqlx::query(UPSERT_USAGE)
            .bind(row.work_record_id.to_string())
            .bind(row.product_id.to_string())
            .bind(row.quantity)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row)
    }

    async fn remove_product_usage(
        &self,
        work_record_id: WorkRecordId,
        product_id: ProductDefId,
    ) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_USAGE)
            .bind(work_record_id.to_string())
            .bind(product_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_restrict(err, "ProductUsage"))?;

        Ok(())
    }

    async fn list_product_usages(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<ProductUsage>, SanitrackError> {
        let rows: Vec<UsageWrapper> = sqlx::query_as(SELECT_USAGES)
            .bind(work_record_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition_repo::{
        SqliteActivityDefRepository, SqliteApplicationDefRepository, SqliteFindingDefRepository,
        SqliteProductDefRepository,
    };
    use crate::pool::Config;
    use crate::user_repo::SqliteUserRepository;
    use crate::work_record_repo::SqliteWorkRecordRepository;
    use sanitrack_app::ports::{
        ActivityDefRepository, ApplicationDefRepository, FindingDefRepository,
        ProductDefRepository, UserRepository, WorkRecordRepository,
    };
    use sanitrack_domain::lookup::{ActivityDef, ApplicationDef, FindingDef, ProductDef};
    use sanitrack_domain::user::User;
    use sanitrack_domain::work_record::WorkRecord;

    struct Fixture {
        repo: SqliteWorkItemRepository,
        work_record_id: WorkRecordId,
        application_id: ApplicationDefId,
        activity_id: ActivityDefId,
        finding_def_id: FindingDefId,
        product_id: ProductDefId,
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

        let record = WorkRecord::builder(technician_id).build();
        let work_record_id = record.id;
        SqliteWorkRecordRepository::new(pool.clone())
            .create(record)
            .await
            .unwrap();

        let application = ApplicationDef::new("Gel treatment", 1);
        let application_id = application.id;
        SqliteApplicationDefRepository::new(pool.clone())
            .create(application)
            .await
            .unwrap();

        let activity = ActivityDef::new("Bait station maintenance", 1);
        let activity_id = activity.id;
        SqliteActivityDefRepository::new(pool.clone())
            .create(activity)
            .await
            .unwrap();

        let finding_def = FindingDef::new("Rodent droppings", 1);
        let finding_def_id = finding_def.id;
        SqliteFindingDefRepository::new(pool.clone())
            .create(finding_def)
            .await
            .unwrap();

        let product = ProductDef::builder().trade_name("RatStop 25").build();
        let product_id = product.id;
        SqliteProductDefRepository::new(pool.clone())
            .create(product)
            .await
            .unwrap();

        Fixture {
            repo: SqliteWorkItemRepository::new(pool),
            work_record_id,
            application_id,
            activity_id,
            finding_def_id,
            product_id,
        }
    }

    #[tokio::test]
    async fn should_keep_single_application_row_per_pair() {
        let fixture = setup().await;
        let row = PerformedApplication {
            work_record_id: fixture.work_record_id,
            application_id: fixture.application_id,
        };

        fixture.repo.upsert_application(row).await.unwrap();
        fixture.repo.upsert_application(row).await.unwrap();

        let rows = fixture
            .repo
            .list_applications(fixture.work_record_id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn should_update_activity_flags_in_place() {
        let fixture = setup().await;
        let mut row = ActivityLine {
            work_record_id: fixture.work_record_id,
            activity_id: fixture.activity_id,
            flags: ActivityFlags {
                checked: true,
                ..ActivityFlags::default()
            },
        };
        fixture.repo.upsert_activity(row).await.unwrap();

        row.flags.relocated = true;
        fixture.repo.upsert_activity(row).await.unwrap();

        let rows = fixture
            .repo
            .list_activities(fixture.work_record_id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].flags.checked);
        assert!(rows[0].flags.relocated);
    }

    #[tokio::test]
    async fn should_allow_repeated_findings_for_same_definition() {
        let fixture = setup().await;
        fixture
            .repo
            .add_finding(Finding::new(
                fixture.work_record_id,
                fixture.finding_def_id,
                Severity::Low,
                DetectedBy::Company,
            ))
            .await
            .unwrap();
        fixture
            .repo
            .add_finding(Finding::new(
                fixture.work_record_id,
                fixture.finding_def_id,
                Severity::Infestation,
                DetectedBy::Customer,
            ))
            .await
            .unwrap();

        let rows = fixture
            .repo
            .list_findings(fixture.work_record_id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn should_update_usage_quantity_in_place() {
        let fixture = setup().await;
        let mut row = ProductUsage {
            work_record_id: fixture.work_record_id,
            product_id: fixture.product_id,
            quantity: 1.0,
        };
        fixture.repo.upsert_product_usage(row).await.unwrap();

        row.quantity = 2.5;
        fixture.repo.upsert_product_usage(row).await.unwrap();

        let rows = fixture
            .repo
            .list_product_usages(fixture.work_record_id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].quantity - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_block_product_delete_while_usages_reference_it() {
        let fixture = setup().await;
        fixture
            .repo
            .upsert_product_usage(ProductUsage {
                work_record_id: fixture.work_record_id,
                product_id: fixture.product_id,
                quantity: 1.0,
            })
            .await
            .unwrap();

        let products = SqliteProductDefRepository::new(fixture.repo.pool.clone());
        let result = products.delete(fixture.product_id).await;
        assert!(matches!(
            result,
            Err(SanitrackError::ReferentialIntegrity(_))
        ));
    }
}
