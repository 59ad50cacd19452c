//! Invoice API Handlers
//!
//! The create endpoint runs the full save-and-reconcile flow; a batch
//! of proposed receipts rides along with the draft. Partial receipt
//! success surfaces as 207 Multi-Status with the per-entry errors next
//! to the saved invoice.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use surrealdb::RecordId;

use shared::{DeliveryStatus, ItemStatus};

use crate::core::ServerState;
use crate::db::models::Invoice;
use crate::db::repository::{InvoiceRepository, to_record_id};
use crate::services::{Direction, StatusSync, invoice_flow::neighbor_number};
use crate::utils::{AppError, AppResult};

const SUB_ITEM_TABLE: &str = "sub_item";

/// GET /api/invoices - list all invoices, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Invoice>>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoices = repo.find_all().await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/latest - the invoice with the highest number
pub async fn latest(State(state): State<ServerState>) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo
        .find_latest()
        .await?
        .ok_or_else(|| AppError::not_found("No invoices yet"))?;
    Ok(Json(invoice))
}

/// GET /api/invoices/next-number - serial for the next draft
pub async fn next_number(State(state): State<ServerState>) -> AppResult<Json<String>> {
    let number = state.serials.next_invoice_number().await?;
    Ok(Json(number))
}

/// GET /api/invoices/:key - fetch by number (`INV...`) or id
pub async fn get_by_key(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo
        .find_by_id_or_number(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {key}")))?;
    Ok(Json(invoice))
}

#[derive(Debug, Deserialize)]
pub struct NeighborQuery {
    pub direction: Direction,
}

/// GET /api/invoices/:key/neighbor?direction=prev|next
///
/// Loads the numeric neighbor of an invoice number; refuses to step
/// below invoice 1.
pub async fn neighbor(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Query(query): Query<NeighborQuery>,
) -> AppResult<Json<Invoice>> {
    let number = neighbor_number(&key, query.direction)?;
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo
        .find_by_number(&number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {number}")))?;
    Ok(Json(invoice))
}

/// POST /api/invoices - save a draft invoice with its receipts
///
/// 200 on full success, 207 when some receipt entries failed while the
/// invoice and the rest committed.
pub async fn create(
    State(state): State<ServerState>,
    Json(draft): Json<crate::db::models::InvoiceDraft>,
) -> AppResult<Response> {
    let created = state.invoice_flow.create_invoice(draft).await?;
    let status = if created.receipt_errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(created)).into_response())
}

/// PUT /api/invoices/:key - edit an invoice (items, dates, amounts)
pub async fn update(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(payload): Json<crate::db::models::InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    let invoice = state.invoice_flow.update_invoice(&key, payload).await?;
    Ok(Json(invoice))
}

/// DELETE /api/invoices/:key - delete an invoice, releasing its items
pub async fn delete(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = state.invoice_flow.delete_invoice(&key).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Invoice {key}")));
    }
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct ItemStatusUpdate {
    pub sub_item_ids: Vec<String>,
    pub status: ItemStatus,
}

/// PUT /api/invoices/update-item-status - bulk status flip
///
/// Updates the sub-item documents and the embedded copy on every
/// invoice referencing them (rentals going out, returns coming back).
pub async fn update_item_status(
    State(state): State<ServerState>,
    Json(payload): Json<ItemStatusUpdate>,
) -> AppResult<Json<usize>> {
    let ids: Vec<RecordId> = payload
        .sub_item_ids
        .iter()
        .map(|id| to_record_id(SUB_ITEM_TABLE, id))
        .collect();
    let touched = state.status_sync.set_item_status(&ids, payload.status).await?;
    Ok(Json(touched))
}

#[derive(Debug, Deserialize)]
pub struct DeliveryStatusUpdate {
    /// Invoice number or id
    pub invoice: String,
    pub sub_item_ids: Vec<String>,
    pub delivery_status: DeliveryStatus,
}

/// PUT /api/invoices/update-delivery-status - embedded lines only
pub async fn update_delivery_status(
    State(state): State<ServerState>,
    Json(payload): Json<DeliveryStatusUpdate>,
) -> AppResult<Json<usize>> {
    let ids: Vec<RecordId> = payload
        .sub_item_ids
        .iter()
        .map(|id| to_record_id(SUB_ITEM_TABLE, id))
        .collect();
    let touched = state
        .invoice_flow
        .set_delivery_status(&payload.invoice, &ids, payload.delivery_status)
        .await?;
    Ok(Json(touched))
}
