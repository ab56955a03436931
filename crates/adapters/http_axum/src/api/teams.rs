//! JSON REST handlers for teams.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{TeamId, UserId};
use sanitrack_domain::team::Team;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a team.
#[derive(Deserialize)]
pub struct CreateTeamRequest {
    pub code: String,
    pub leader_id: String,
    #[serde(default)]
    pub member_count: u16,
    #[serde(default)]
    pub members: String,
}

/// `GET /api/teams`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Team>>, ApiError> {
    Ok(Json(state.team_service.list_teams().await?))
}

/// `POST /api/teams`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let leader_id: UserId = parse_id(&body.leader_id, "User")?;
    let team = Team {
        id: TeamId::new(),
        code: body.code,
        leader_id,
        member_count: body.member_count,
        members: body.members,
    };
    let created = state.team_service.create_team(team).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
