//! JSON REST handlers for report assembly.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{FacilityId, WorkRecordId};
use sanitrack_domain::report::ActivityReport;
use sanitrack_domain::station_report::StationReport;
use sanitrack_domain::time::Date;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query for the cross-period station report.
#[derive(Deserialize)]
pub struct StationReportQuery {
    pub facility_id: String,
    pub start: Date,
    pub end: Date,
}

/// `GET /api/reports/station-report?facility_id=…&start=…&end=…`
pub async fn station_report<R: Repositories>(
    State(state): State<AppState<R>>,
    Query(query): Query<StationReportQuery>,
) -> Result<Json<StationReport>, ApiError> {
    let facility_id: FacilityId = parse_id(&query.facility_id, "Facility")?;
    let report = state
        .report_service
        .station_report(facility_id, query.start, query.end)
        .await?;
    Ok(Json(report))
}

/// `POST /api/work-records/{id}/activity-report` — idempotent regeneration.
pub async fn generate_activity_report<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityReport>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let report = state
        .report_service
        .generate_activity_report(work_record_id)
        .await?;
    Ok(Json(report))
}

/// `GET /api/work-records/{id}/activity-report`
pub async fn get_activity_report<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Option<ActivityReport>>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let report = state
        .report_service
        .find_activity_report(work_record_id)
        .await?;
    Ok(Json(report))
}

/// Request body for attaching a rendered artifact.
#[derive(Deserialize)]
pub struct AttachArtifactRequest {
    pub artifact_path: String,
}

/// `PUT /api/work-records/{id}/activity-report/artifact` — called by the
/// external renderer once the PDF exists.
pub async fn attach_artifact<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<AttachArtifactRequest>,
) -> Result<Json<ActivityReport>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let report = state
        .report_service
        .attach_artifact(work_record_id, body.artifact_path)
        .await?;
    Ok(Json(report))
}
