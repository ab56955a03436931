//! JSON REST handlers for the station-count ledger.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use sanitrack_app::ports::Repositories;
use sanitrack_app::services::station_count_service::BulkCountEntry;
use sanitrack_domain::id::{FacilityId, StationId, WorkRecordId, ZoneId};
use sanitrack_domain::ledger::{LedgerSummary, StationCount};
use sanitrack_domain::station::Station;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Facility/zone scope for summaries and listings.
#[derive(Deserialize)]
pub struct ScopeQuery {
    pub facility_id: String,
    pub zone_id: Option<String>,
}

/// Request body for recording one count.
#[derive(Deserialize)]
pub struct RecordCountRequest {
    pub consumption_present: bool,
    #[serde(default)]
    pub note: String,
}

/// One entry of a bulk write.
#[derive(Deserialize)]
pub struct BulkEntryBody {
    pub station_id: String,
    pub consumption_present: bool,
    #[serde(default)]
    pub note: String,
}

/// Request body for the bulk write.
#[derive(Deserialize)]
pub struct BulkRecordRequest {
    pub entries: Vec<BulkEntryBody>,
}

/// Result of a bulk write: rows actually applied.
#[derive(Serialize)]
pub struct BulkRecordResponse {
    pub applied: usize,
}

/// Coverage summary plus the entered/pending partition.
#[derive(Serialize)]
pub struct LedgerView {
    pub summary: LedgerSummary,
    pub entered: Vec<EnteredStation>,
    pub pending: Vec<Station>,
}

/// A station together with its recorded count.
#[derive(Serialize)]
pub struct EnteredStation {
    pub station: Station,
    pub count: StationCount,
    /// Binary label for report consumers: "Var" or "Yok".
    pub consumption: &'static str,
}

fn parse_scope(query: &ScopeQuery) -> Result<(FacilityId, Option<ZoneId>), ApiError> {
    let facility_id: FacilityId = parse_id(&query.facility_id, "Facility")?;
    let zone_id = query
        .zone_id
        .as_deref()
        .map(|raw| parse_id::<ZoneId>(raw, "Zone"))
        .transpose()?;
    Ok((facility_id, zone_id))
}

/// `GET /api/work-records/{id}/station-counts?facility_id=…[&zone_id=…]`
pub async fn view<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<LedgerView>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let (facility_id, zone_id) = parse_scope(&query)?;

    let summary = state
        .station_count_service
        .summary(work_record_id, facility_id, zone_id)
        .await?;
    let breakdown = state
        .station_count_service
        .breakdown(work_record_id, facility_id, zone_id)
        .await?;

    Ok(Json(LedgerView {
        summary,
        entered: breakdown
            .entered
            .into_iter()
            .map(|(station, count)| EnteredStation {
                consumption: count.consumption_label(),
                station,
                count,
            })
            .collect(),
        pending: breakdown.pending,
    }))
}

/// `PUT /api/work-records/{id}/station-counts/{station_id}`
pub async fn record<R: Repositories>(
    State(state): State<AppState<R>>,
    Path((id, station_id)): Path<(String, String)>,
    Json(body): Json<RecordCountRequest>,
) -> Result<Json<StationCount>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let station_id: StationId = parse_id(&station_id, "Station")?;

    let entry = state
        .station_count_service
        .record_count(
            work_record_id,
            station_id,
            body.consumption_present,
            body.note,
        )
        .await?;
    Ok(Json(entry))
}

/// `POST /api/work-records/{id}/station-counts/bulk`
pub async fn record_bulk<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<BulkRecordRequest>,
) -> Result<Json<BulkRecordResponse>, ApiError> {
    let work_record_id: WorkRecordId = parse_id(&id, "WorkRecord")?;

    let mut entries = Vec::with_capacity(body.entries.len());
    for entry in body.entries {
        entries.push(BulkCountEntry {
            station_id: parse_id(&entry.station_id, "Station")?,
            consumption_present: entry.consumption_present,
            note: entry.note,
        });
    }

    let applied = state
        .station_count_service
        .bulk_record_count(work_record_id, entries)
        .await?;
    Ok(Json(BulkRecordResponse { applied }))
}
