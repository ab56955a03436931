//! JSON REST handlers for service requests.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{CustomerId, FacilityId, RequestId, RequestTypeId, TeamId};
use sanitrack_domain::request::ServiceRequest;
use sanitrack_domain::time::Date;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or updating a service request.
#[derive(Deserialize)]
pub struct ServiceRequestBody {
    pub customer_id: String,
    pub facility_id: Option<String>,
    pub date: Option<Date>,
    pub request_type_id: String,
    pub description: String,
    pub planned_date: Option<Date>,
    pub planned_team_id: Option<String>,
    pub related_request_id: Option<String>,
}

/// Optional list filter.
#[derive(Deserialize)]
pub struct ListRequestsQuery {
    /// When true, only requests a work record may still close.
    #[serde(default)]
    pub open: bool,
}

fn decode_body(
    body: ServiceRequestBody,
) -> Result<
    (
        CustomerId,
        Option<FacilityId>,
        Option<Date>,
        RequestTypeId,
        String,
        Option<Date>,
        Option<TeamId>,
        Option<RequestId>,
    ),
    ApiError,
> {
    Ok((
        parse_id(&body.customer_id, "Customer")?,
        body.facility_id
            .as_deref()
            .map(|raw| parse_id::<FacilityId>(raw, "Facility"))
            .transpose()?,
        body.date,
        parse_id(&body.request_type_id, "RequestType")?,
        body.description,
        body.planned_date,
        body.planned_team_id
            .as_deref()
            .map(|raw| parse_id::<TeamId>(raw, "Team"))
            .transpose()?,
        body.related_request_id
            .as_deref()
            .map(|raw| parse_id::<RequestId>(raw, "ServiceRequest"))
            .transpose()?,
    ))
}

/// `GET /api/requests[?open=true]`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    let requests = if query.open {
        state.request_service.list_open_requests().await?
    } else {
        state.request_service.list_requests().await?
    };
    Ok(Json(requests))
}

/// `POST /api/requests`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<ServiceRequestBody>,
) -> Result<(StatusCode, Json<ServiceRequest>), ApiError> {
    let (customer_id, facility_id, date, request_type_id, description, planned_date, planned_team_id, related_request_id) =
        decode_body(body)?;

    let mut builder = ServiceRequest::builder(customer_id, request_type_id).description(description);
    if let Some(facility_id) = facility_id {
        builder = builder.facility_id(facility_id);
    }
    if let Some(date) = date {
        builder = builder.date(date);
    }
    if let Some(planned_date) = planned_date {
        builder = builder.planned_date(planned_date);
    }
    if let Some(planned_team_id) = planned_team_id {
        builder = builder.planned_team_id(planned_team_id);
    }
    if let Some(related_request_id) = related_request_id {
        builder = builder.related_request_id(related_request_id);
    }

    let request = builder.build()?;
    let created = state.request_service.create_request(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/requests/{id}`
pub async fn get<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let id: RequestId = parse_id(&id, "ServiceRequest")?;
    Ok(Json(state.request_service.get_request(id).await?))
}

/// `PUT /api/requests/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<ServiceRequestBody>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let id: RequestId = parse_id(&id, "ServiceRequest")?;
    let (customer_id, facility_id, date, request_type_id, description, planned_date, planned_team_id, related_request_id) =
        decode_body(body)?;

    let mut request = state.request_service.get_request(id).await?;
    request.customer_id = customer_id;
    request.facility_id = facility_id;
    if let Some(date) = date {
        request.date = date;
    }
    request.request_type_id = request_type_id;
    request.description = description;
    request.planned_date = planned_date;
    request.planned_team_id = planned_team_id;
    request.related_request_id = related_request_id;

    Ok(Json(state.request_service.update_request(request).await?))
}

/// `DELETE /api/requests/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: RequestId = parse_id(&id, "ServiceRequest")?;
    state.request_service.delete_request(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
