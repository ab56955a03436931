//! Activity report — the stored record of a generated per-visit report.
//!
//! One row per work record, holding a denormalized snapshot of the codes the
//! artifact was generated with. Regenerating overwrites the same row.

use serde::{Deserialize, Serialize};

use crate::id::{ReportId, WorkRecordId};
use crate::time::Date;
use crate::work_record::WorkRecord;

/// Snapshot row for a generated activity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityReport {
    pub id: ReportId,
    pub work_record_id: WorkRecordId,
    pub customer_code: String,
    /// The work record's form number, or `WR-{id}` when it has none.
    pub form_code: String,
    pub report_date: Date,
    pub generated: bool,
    /// Reference to the rendered artifact; rendering and storage are
    /// external.
    pub artifact_path: Option<String>,
}

impl ActivityReport {
    /// Build the snapshot for `record`. `customer_code` is the record's own
    /// customer code, falling back to the closing request's customer.
    #[must_use]
    pub fn for_work_record(record: &WorkRecord, customer_code: impl Into<String>) -> Self {
        let form_code = if record.form_number.is_empty() {
            format!("WR-{}", record.id)
        } else {
            record.form_number.clone()
        };
        Self {
            id: ReportId::new(),
            work_record_id: record.id,
            customer_code: customer_code.into(),
            form_code,
            report_date: record.date,
            generated: true,
            artifact_path: None,
        }
    }
}
