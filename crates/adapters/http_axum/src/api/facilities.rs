//! JSON REST handlers for facilities.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::facility::Facility;
use sanitrack_domain::id::{CustomerId, FacilityId};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a facility.
#[derive(Deserialize)]
pub struct CreateFacilityRequest {
    pub customer_id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: String,
}

/// Request body for updating a facility. The owning customer is immutable
/// and therefore absent here.
#[derive(Deserialize)]
pub struct UpdateFacilityRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: String,
}

/// Optional list filter.
#[derive(Deserialize)]
pub struct ListFacilitiesQuery {
    pub customer_id: Option<String>,
}

/// `GET /api/facilities[?customer_id=…]`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListFacilitiesQuery>,
) -> Result<Json<Vec<Facility>>, ApiError> {
    let facilities = match query.customer_id {
        Some(raw) => {
            let customer_id: CustomerId = parse_id(&raw, "Customer")?;
            state.facility_service.list_for_customer(customer_id).await?
        }
        None => state.facility_service.list_facilities().await?,
    };
    Ok(Json(facilities))
}

/// `POST /api/facilities`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<Facility>), ApiError> {
    let customer_id: CustomerId = parse_id(&body.customer_id, "Customer")?;
    let facility = Facility {
        id: FacilityId::new(),
        customer_id,
        code: body.code,
        name: body.name,
        address: body.address,
        note: body.note,
    };
    let created = state.facility_service.create_facility(facility).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/facilities/{id}`
pub async fn get<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Facility>, ApiError> {
    let id: FacilityId = parse_id(&id, "Facility")?;
    Ok(Json(state.facility_service.get_facility(id).await?))
}

/// `PUT /api/facilities/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateFacilityRequest>,
) -> Result<Json<Facility>, ApiError> {
    let id: FacilityId = parse_id(&id, "Facility")?;
    let mut facility = state.facility_service.get_facility(id).await?;
    facility.code = body.code;
    facility.name = body.name;
    facility.address = body.address;
    facility.note = body.note;
    Ok(Json(state.facility_service.update_facility(facility).await?))
}

/// `DELETE /api/facilities/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: FacilityId = parse_id(&id, "Facility")?;
    state.facility_service.delete_facility(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
