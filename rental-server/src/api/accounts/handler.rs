//! Account API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Account, AccountCreate, AccountUpdate};
use crate::db::repository::AccountRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/accounts - list all accounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Account>>> {
    let repo = AccountRepository::new(state.db.clone());
    let accounts = repo.find_all().await?;
    Ok(Json(accounts))
}

/// GET /api/accounts/:id - fetch one account
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Account>> {
    let repo = AccountRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Account {id}")))?;
    Ok(Json(account))
}

/// POST /api/accounts - create an account
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountCreate>,
) -> AppResult<Json<Account>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(balance) = payload.balance
        && !balance.is_finite()
    {
        return Err(AppError::validation("balance must be a finite number"));
    }

    let repo = AccountRepository::new(state.db.clone());
    let account = repo.create(payload).await?;
    Ok(Json(account))
}

/// PUT /api/accounts/:id - update an account
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AccountUpdate>,
) -> AppResult<Json<Account>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if let Some(balance) = payload.balance
        && !balance.is_finite()
    {
        return Err(AppError::validation("balance must be a finite number"));
    }

    let repo = AccountRepository::new(state.db.clone());
    let account = repo.update(&id, payload).await?;
    Ok(Json(account))
}

/// DELETE /api/accounts/:id - delete an account
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AccountRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Account {id}")));
    }
    Ok(Json(true))
}
