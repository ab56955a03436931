//! JSON REST handlers for customers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sanitrack_app::ports::Repositories;
use sanitrack_domain::customer::Customer;
use sanitrack_domain::id::CustomerId;

use crate::api::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a customer.
#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: String,
}

/// Request body for updating a customer.
#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: String,
}

/// `GET /api/customers`
pub async fn list<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customer_service.list_customers().await?))
}

/// `POST /api/customers`
pub async fn create<R: Repositories>(
    State(state): State<AppState<R>>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = Customer {
        id: CustomerId::new(),
        code: body.code,
        name: body.name,
        address: body.address,
        note: body.note,
    };
    let created = state.customer_service.create_customer(customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/customers/{id}`
pub async fn get<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let id: CustomerId = parse_id(&id, "Customer")?;
    Ok(Json(state.customer_service.get_customer(id).await?))
}

/// `PUT /api/customers/{id}`
pub async fn update<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    let id: CustomerId = parse_id(&id, "Customer")?;
    let mut customer = state.customer_service.get_customer(id).await?;
    customer.code = body.code;
    customer.name = body.name;
    customer.address = body.address;
    customer.note = body.note;
    Ok(Json(state.customer_service.update_customer(customer).await?))
}

/// `DELETE /api/customers/{id}`
pub async fn delete<R: Repositories>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: CustomerId = parse_id(&id, "Customer")?;
    state.customer_service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
