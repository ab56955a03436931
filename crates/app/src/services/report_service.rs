//! Report service — assembles report data and records generated reports.
//!
//! The cross-period station report is fetched here and computed in the
//! domain (`station_report::build`); rendering to Excel/PDF is an external
//! concern. Activity-report generation snapshots the work record's codes
//! into a one-row-per-record table, idempotently.

use std::collections::HashMap;

use sanitrack_domain::error::{NotFoundError, SanitrackError, ValidationError};
use sanitrack_domain::id::{FacilityId, WorkRecordId, ZoneId};
use sanitrack_domain::report::ActivityReport;
use sanitrack_domain::station_report::{self, ReportHeader, ReportStation, StationReport};
use sanitrack_domain::time::Date;

use crate::ports::{
    ActivityReportRepository, CustomerRepository, FacilityRepository, RequestRepository,
    StationCountRepository, StationRepository, WorkRecordRepository, ZoneRepository,
};

/// Application service for report assembly.
pub struct ReportService<WR, SR, ZR, SC, AR, FR, CR, RR> {
    work_records: WR,
    stations: SR,
    zones: ZR,
    counts: SC,
    reports: AR,
    facilities: FR,
    customers: CR,
    requests: RR,
}

impl<WR, SR, ZR, SC, AR, FR, CR, RR> ReportService<WR, SR, ZR, SC, AR, FR, CR, RR>
where
    WR: WorkRecordRepository,
    SR: StationRepository,
    ZR: ZoneRepository,
    SC: StationCountRepository,
    AR: ActivityReportRepository,
    FR: FacilityRepository,
    CR: CustomerRepository,
    RR: RequestRepository,
{
    /// Create a new service backed by the given repositories.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        work_records: WR,
        stations: SR,
        zones: ZR,
        counts: SC,
        reports: AR,
        facilities: FR,
        customers: CR,
        requests: RR,
    ) -> Self {
        Self {
            work_records,
            stations,
            zones,
            counts,
            reports,
            facilities,
            customers,
            requests,
        }
    }

    /// Assemble the cross-period station report for a facility and date
    /// range: one column per relevant visit, one row per station, plus the
    /// derived ratios and zone change statistics.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when the range is inverted,
    /// [`SanitrackError::NotFound`] when the facility is missing, or a
    /// storage error from the repositories.
    pub async fn station_report(
        &self,
        facility_id: FacilityId,
        start: Date,
        end: Date,
    ) -> Result<StationReport, SanitrackError> {
        if end < start {
            return Err(ValidationError::InvertedDateRange.into());
        }
        let facility = self
            .facilities
            .get_by_id(facility_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Facility",
                id: facility_id.to_string(),
            })?;
        let customer = self
            .customers
            .get_by_id(facility.customer_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Customer",
                id: facility.customer_id.to_string(),
            })?;

        let header = ReportHeader {
            customer_facility: format!("{} - {}", customer.name, facility.name),
            address: pick_address(&facility.address, &customer.address),
        };

        let visits = self
            .work_records
            .visits_for_facility(facility_id, start, end)
            .await?;

        let zone_labels: HashMap<ZoneId, String> = self
            .zones
            .find_by_facility(facility_id)
            .await?
            .into_iter()
            .map(|zone| {
                let label = format!(
                    "{}-{}-{} {}",
                    customer.code, facility.code, zone.code, zone.name
                );
                (zone.id, label)
            })
            .collect();

        let stations: Vec<ReportStation> = self
            .stations
            .find_by_facility(facility_id, None)
            .await?
            .into_iter()
            .map(|station| ReportStation {
                station_id: station.id,
                zone_id: station.zone_id,
                zone_label: zone_labels
                    .get(&station.zone_id)
                    .cloned()
                    .unwrap_or_else(|| "—".to_string()),
                station_code: station.code,
                station_name: station.name,
            })
            .collect();

        let visit_ids: Vec<WorkRecordId> = visits.iter().map(|v| v.id).collect();
        let entries = self.counts.entries_for_records(&visit_ids).await?;

        Ok(station_report::build(header, &visits, &stations, &entries))
    }

    /// Generate (or regenerate) the activity-report row for a work record.
    /// Running this twice overwrites the same row.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the work record is missing,
    /// or a storage error from the repositories.
    pub async fn generate_activity_report(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<ActivityReport, SanitrackError> {
        let record = self
            .work_records
            .get_by_id(work_record_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "WorkRecord",
                id: work_record_id.to_string(),
            })?;

        let customer_code = match record.customer_id {
            Some(customer_id) => self
                .customers
                .get_by_id(customer_id)
                .await?
                .map(|c| c.code)
                .unwrap_or_default(),
            None => match record.closing_request_id {
                Some(request_id) => self
                    .requests
                    .codes(request_id)
                    .await?
                    .map(|codes| codes.customer_code)
                    .unwrap_or_default(),
                None => String::new(),
            },
        };

        self.reports
            .upsert(ActivityReport::for_work_record(&record, customer_code))
            .await
    }

    /// Attach the rendered artifact's reference to an existing report row.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no report row exists for
    /// the work record, or a storage error from the repositories.
    pub async fn attach_artifact(
        &self,
        work_record_id: WorkRecordId,
        artifact_path: impl Into<String> + Send,
    ) -> Result<ActivityReport, SanitrackError> {
        let mut report = self
            .reports
            .find_by_work_record(work_record_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "ActivityReport",
                id: work_record_id.to_string(),
            })?;
        report.artifact_path = Some(artifact_path.into());
        self.reports.upsert(report).await
    }

    /// The report row of a work record, if one was generated.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn find_activity_report(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Option<ActivityReport>, SanitrackError> {
        self.reports.find_by_work_record(work_record_id).await
    }
}

/// Facility address, falling back to the customer address, else a dash.
fn pick_address(facility_address: &str, customer_address: &str) -> String {
    let facility_address = facility_address.trim();
    if !facility_address.is_empty() {
        return facility_address.to_string();
    }
    let customer_address = customer_address.trim();
    if !customer_address.is_empty() {
        return customer_address.to_string();
    }
    "—".to_string()
}
