//! Reporting port — persistence for generated activity-report records.

use std::future::Future;

use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::WorkRecordId;
use sanitrack_domain::report::ActivityReport;

/// Repository for [`ActivityReport`] snapshot rows.
pub trait ActivityReportRepository {
    /// Insert the report row, or overwrite the existing row of the same work
    /// record (regeneration is idempotent). Returns the stored row.
    fn upsert(
        &self,
        report: ActivityReport,
    ) -> impl Future<Output = Result<ActivityReport, SanitrackError>> + Send;

    /// Get the report row of a work record.
    fn find_by_work_record(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Option<ActivityReport>, SanitrackError>> + Send;

    /// Get all report rows ordered by report date descending.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ActivityReport>, SanitrackError>> + Send;
}
