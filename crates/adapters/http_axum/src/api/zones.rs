//! JSON REST handlers for zones.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{FacilityId, ZoneId};
use sanitrack_domain::zone::Zone;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or updating a zone.
#[derive(Deserialize)]
pub struct ZoneRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

/// `GET /api/facilities/{id}/zones`
pub async fn list_for_facility<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(facility_id): Path<String>,
) -> Result<Json<Vec<Zone>>, ApiError> {
    let facility_id: FacilityId = parse_id(&facility_id, "Facility")?;
    Ok(Json(state.zone_service.list_for_facility(facility_id).await?))
}

/// `POST /api/facilities/{id}/zones`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(facility_id): Path<String>,
    Json(body): Json<ZoneRequest>,
) -> Result<(StatusCode, Json<Zone>), ApiError> {
    let facility_id: FacilityId = parse_id(&facility_id, "Facility")?;
    let zone = Zone {
        id: ZoneId::new(),
        facility_id,
        code: body.code,
        name: body.name,
        note: body.note,
    };
    let created = state.zone_service.create_zone(zone).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/zones/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<ZoneRequest>,
) -> Result<Json<Zone>, ApiError> {
    let id: ZoneId = parse_id(&id, "Zone")?;
    let mut zone = state.zone_service.get_zone(id).await?;
    zone.code = body.code;
    zone.name = body.name;
    zone.note = body.note;
    Ok(Json(state.zone_service.update_zone(zone).await?))
}

/// `DELETE /api/zones/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ZoneId = parse_id(&id, "Zone")?;
    state.zone_service.delete_zone(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
