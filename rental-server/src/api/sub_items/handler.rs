//! Sub Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{SubItem, SubItemCreate, SubItemUpdate};
use crate::db::repository::SubItemRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/sub-items - list all sub items
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SubItem>>> {
    let repo = SubItemRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// GET /api/sub-items/by-master/:id - list sub items of one master
pub async fn list_by_master(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SubItem>>> {
    let repo = SubItemRepository::new(state.db.clone());
    let items = repo.find_by_master(&id).await?;
    Ok(Json(items))
}

/// GET /api/sub-items/:id - fetch one sub item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SubItem>> {
    let repo = SubItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sub item {id}")))?;
    Ok(Json(item))
}

/// POST /api/sub-items - create a sub item (code is derived)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SubItemCreate>,
) -> AppResult<Json<SubItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_amount(payload.rent_rate, "rent_rate")?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = SubItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    Ok(Json(item))
}

/// PUT /api/sub-items/:id - update a sub item
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SubItemUpdate>,
) -> AppResult<Json<SubItem>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(rate) = payload.rent_rate {
        validate_amount(rate, "rent_rate")?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;

    let repo = SubItemRepository::new(state.db.clone());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/sub-items/:id - delete a sub item
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SubItemRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Sub item {id}")));
    }
    Ok(Json(true))
}
