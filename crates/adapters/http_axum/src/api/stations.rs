//! JSON REST handlers for stations.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{FacilityId, StationId, ZoneId};
use sanitrack_domain::station::Station;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or updating a station.
#[derive(Deserialize)]
pub struct StationRequest {
    pub code: String,
    pub name: String,
}

/// Lookup by derived unique code.
#[derive(Deserialize)]
pub struct StationLookupQuery {
    pub unique_code: Option<String>,
}

/// Optional zone narrowing for facility listings.
#[derive(Deserialize)]
pub struct FacilityStationsQuery {
    pub zone_id: Option<String>,
}

/// `GET /api/stations?unique_code=…`
pub async fn lookup<R: Repositories>(
    State(state): State<AppState<R>>,
    Query(query): Query<StationLookupQuery>,
) -> Result<Json<Station>, ApiError> {
    let Some(unique_code) = query.unique_code else {
        return Err(ApiError::InvalidId("Station"));
    };
    Ok(Json(
        state.station_service.get_by_unique_code(&unique_code).await?,
    ))
}

/// `GET /api/facilities/{id}/stations[?zone_id=…]`
pub async fn list_for_facility<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(facility_id): Path<String>,
    Query(query): Query<FacilityStationsQuery>,
) -> Result<Json<Vec<Station>>, ApiError> {
    let facility_id: FacilityId = parse_id(&facility_id, "Facility")?;
    let zone_id = query
        .zone_id
        .as_deref()
        .map(|raw| parse_id::<ZoneId>(raw, "Zone"))
        .transpose()?;
    Ok(Json(
        state
            .station_service
            .list_for_facility(facility_id, zone_id)
            .await?,
    ))
}

/// `POST /api/zones/{id}/stations`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(zone_id): Path<String>,
    Json(body): Json<StationRequest>,
) -> Result<(StatusCode, Json<Station>), ApiError> {
    let zone_id: ZoneId = parse_id(&zone_id, "Zone")?;
    let station = Station {
        id: StationId::new(),
        zone_id,
        code: body.code,
        name: body.name,
        unique_code: String::new(),
    };
    let created = state.station_service.create_station(station).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/stations/{id}`
pub async fn get<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Station>, ApiError> {
    let id: StationId = parse_id(&id, "Station")?;
    Ok(Json(state.station_service.get_station(id).await?))
}

/// `PUT /api/stations/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<StationRequest>,
) -> Result<Json<Station>, ApiError> {
    let id: StationId = parse_id(&id, "Station")?;
    let mut station = state.station_service.get_station(id).await?;
    station.code = body.code;
    station.name = body.name;
    Ok(Json(state.station_service.update_station(station).await?))
}

/// `DELETE /api/stations/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: StationId = parse_id(&id, "Station")?;
    state.station_service.delete_station(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
