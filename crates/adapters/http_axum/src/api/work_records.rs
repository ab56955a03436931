//! JSON REST handlers for work records, including the start/finish
//! operations that drive the ledger lock.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::id::{CustomerId, FacilityId, RequestId, TeamId, UserId, WorkRecordId};
use sanitrack_domain::time::Date;
use sanitrack_domain::work_record::{EquipmentFlags, WorkRecord};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or updating a work record.
#[derive(Deserialize)]
pub struct WorkRecordBody {
    pub date: Option<Date>,
    pub technician_id: String,
    pub team_id: Option<String>,
    pub customer_id: Option<String>,
    pub facility_id: Option<String>,
    #[serde(default)]
    pub observation_visit_required: bool,
    #[serde(default)]
    pub out_of_contract_work: bool,
    #[serde(default)]
    pub equipment: EquipmentFlags,
    #[serde(default)]
    pub recommendations: String,
    #[serde(default)]
    pub note: String,
    pub closing_request_id: Option<String>,
}

struct DecodedBody {
    technician_id: UserId,
    team_id: Option<TeamId>,
    customer_id: Option<CustomerId>,
    facility_id: Option<FacilityId>,
    closing_request_id: Option<RequestId>,
}

fn decode_ids(body: &WorkRecordBody) -> Result<DecodedBody, ApiError> {
    Ok(DecodedBody {
        technician_id: parse_id(&body.technician_id, "User")?,
        team_id: body
            .team_id
            .as_deref()
            .map(|raw| parse_id::<TeamId>(raw, "Team"))
            .transpose()?,
        customer_id: body
            .customer_id
            .as_deref()
            .map(|raw| parse_id::<CustomerId>(raw, "Customer"))
            .transpose()?,
        facility_id: body
            .facility_id
            .as_deref()
            .map(|raw| parse_id::<FacilityId>(raw, "Facility"))
            .transpose()?,
        closing_request_id: body
            .closing_request_id
            .as_deref()
            .map(|raw| parse_id::<RequestId>(raw, "ServiceRequest"))
            .transpose()?,
    })
}

/// `GET /api/work-records`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<WorkRecord>>, ApiError> {
    Ok(Json(state.work_record_service.list_work_records().await?))
}

/// `POST /api/work-records`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<WorkRecordBody>,
) -> Result<(StatusCode, Json<WorkRecord>), ApiError> {
    let ids = decode_ids(&body)?;

    let mut builder = WorkRecord::builder(ids.technician_id)
        .observation_visit_required(body.observation_visit_required)
        .out_of_contract_work(body.out_of_contract_work)
        .equipment(body.equipment)
        .recommendations(body.recommendations)
        .note(body.note);
    if let Some(date) = body.date {
        builder = builder.date(date);
    }
    if let Some(team_id) = ids.team_id {
        builder = builder.team_id(team_id);
    }
    if let Some(customer_id) = ids.customer_id {
        builder = builder.customer_id(customer_id);
    }
    if let Some(facility_id) = ids.facility_id {
        builder = builder.facility_id(facility_id);
    }
    if let Some(closing_request_id) = ids.closing_request_id {
        builder = builder.closing_request_id(closing_request_id);
    }

    let created = state
        .work_record_service
        .create_work_record(builder.build())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/work-records/{id}`
pub async fn get<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<WorkRecord>, ApiError> {
    let id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    Ok(Json(state.work_record_service.get_work_record(id).await?))
}

/// `PUT /api/work-records/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<WorkRecordBody>,
) -> Result<Json<WorkRecord>, ApiError> {
    let id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let ids = decode_ids(&body)?;

    let mut record = state.work_record_service.get_work_record(id).await?;
    if let Some(date) = body.date {
        record.date = date;
    }
    record.technician_id = ids.technician_id;
    record.team_id = ids.team_id;
    record.customer_id = ids.customer_id;
    record.facility_id = ids.facility_id;
    record.observation_visit_required = body.observation_visit_required;
    record.out_of_contract_work = body.out_of_contract_work;
    record.equipment = body.equipment;
    record.recommendations = body.recommendations;
    record.note = body.note;
    record.closing_request_id = ids.closing_request_id;

    Ok(Json(
        state.work_record_service.update_work_record(record).await?,
    ))
}

/// `DELETE /api/work-records/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    state.work_record_service.delete_work_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/work-records/{id}/start`
pub async fn start<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<WorkRecord>, ApiError> {
    let id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let record = state
        .work_record_service
        .start_work_record(id, Utc::now().time())
        .await?;
    Ok(Json(record))
}

/// `POST /api/work-records/{id}/finish` — locks the station-count ledger.
pub async fn finish<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<WorkRecord>, ApiError> {
    let id: WorkRecordId = parse_id(&id, "WorkRecord")?;
    let record = state
        .work_record_service
        .finish_work_record(id, Utc::now().time())
        .await?;
    Ok(Json(record))
}
