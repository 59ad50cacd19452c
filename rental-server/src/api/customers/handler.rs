//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use crate::db::repository::CustomerRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/customers - list all customers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customers = repo.find_all().await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - fetch one customer
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id}")))?;
    Ok(Json(customer))
}

/// POST /api/customers - create a customer
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.whatsapp, "whatsapp", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.create(payload).await?;
    Ok(Json(customer))
}

/// PUT /api/customers/:id - update a customer
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.mobile, "mobile", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.whatsapp, "whatsapp", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.update(&id, payload).await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/:id - delete a customer
///
/// Historical invoices keep their reference; nothing cascades.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CustomerRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Customer {id}")));
    }
    Ok(Json(true))
}
