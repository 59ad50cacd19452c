//! Master Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{MasterItem, MasterItemCreate, MasterItemUpdate};
use crate::db::repository::MasterItemRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/master-items - list all master items
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MasterItem>>> {
    let repo = MasterItemRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// GET /api/master-items/:id - fetch one master item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MasterItem>> {
    let repo = MasterItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Master item {id}")))?;
    Ok(Json(item))
}

/// POST /api/master-items - create a master item
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MasterItemCreate>,
) -> AppResult<Json<MasterItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = MasterItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    Ok(Json(item))
}

/// PUT /api/master-items/:id - update a master item
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MasterItemUpdate>,
) -> AppResult<Json<MasterItem>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = MasterItemRepository::new(state.db.clone());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/master-items/:id - delete a master item
///
/// Rejected while sub-items still reference it.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MasterItemRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Master item {id}")));
    }
    Ok(Json(true))
}
