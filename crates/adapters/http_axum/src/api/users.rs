//! JSON REST handlers for users.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::UserId;
use sanitrack_domain::user::{User, UserProfile};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
}

/// `GET /api/users`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.user_service.list_users().await?))
}

/// `POST /api/users`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = User {
        id: UserId::new(),
        username: body.username,
        display_name: body.display_name,
        active: true,
    };
    let created = state.user_service.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/users/{id}/profile`
pub async fn get_profile<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let id: UserId = parse_id(&id, "User")?;
    Ok(Json(state.user_service.get_profile(id).await?))
}
