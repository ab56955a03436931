//! JSON REST handlers for request types.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::RequestTypeId;
use sanitrack_domain::lookup::RequestType;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a request type.
#[derive(Deserialize)]
pub struct CreateRequestTypeRequest {
    pub name: String,
    #[serde(default)]
    pub position: u16,
}

/// `GET /api/request-types`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<RequestType>>, ApiError> {
    Ok(Json(state.request_type_service.list().await?))
}

/// `POST /api/request-types`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateRequestTypeRequest>,
) -> Result<(StatusCode, Json<RequestType>), ApiError> {
    let created = state
        .request_type_service
        .create(RequestType::new(body.name, body.position))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/request-types/{id}` — blocked while requests reference it.
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: RequestTypeId = parse_id(&id, "RequestType")?;
    state.request_type_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
