//! Financial API Handlers
//!
//! Batch creates attempt each entry independently: successes commit,
//! failures land in an `errors` array, and a mixed outcome responds
//! with 207 Multi-Status instead of 200.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::core::ServerState;
use crate::db::models::{FinancialCreate, FinancialKind, FinancialRecord};
use crate::db::repository::FinancialRepository;
use crate::services::BatchOutcome;
use crate::utils::AppResult;

fn batch_response(outcome: BatchOutcome) -> Response {
    let status = if outcome.has_errors() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };
    (status, Json(outcome)).into_response()
}

// ========== Receipts ==========

/// GET /api/receipts - list all receipts
pub async fn list_receipts(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<FinancialRecord>>> {
    let repo = FinancialRepository::new(state.db.clone());
    let records = repo.find_all(FinancialKind::Receipt).await?;
    Ok(Json(records))
}

/// POST /api/receipts - create a batch of receipts
pub async fn create_receipts(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<FinancialCreate>>,
) -> AppResult<Response> {
    let outcome = state
        .invoice_flow
        .create_financial_batch(FinancialKind::Receipt, entries)
        .await?;
    Ok(batch_response(outcome))
}

// ========== Payments ==========

/// GET /api/payments - list all payments
pub async fn list_payments(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<FinancialRecord>>> {
    let repo = FinancialRepository::new(state.db.clone());
    let records = repo.find_all(FinancialKind::Payment).await?;
    Ok(Json(records))
}

/// POST /api/payments - create a batch of payments
pub async fn create_payments(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<FinancialCreate>>,
) -> AppResult<Response> {
    let outcome = state
        .invoice_flow
        .create_financial_batch(FinancialKind::Payment, entries)
        .await?;
    Ok(batch_response(outcome))
}

/// DELETE /api/payments - bulk delete by id list (rollback path)
pub async fn delete_payments(
    State(state): State<ServerState>,
    Json(ids): Json<Vec<String>>,
) -> AppResult<Json<usize>> {
    let removed = state
        .invoice_flow
        .delete_financial(FinancialKind::Payment, &ids)
        .await?;
    Ok(Json(removed))
}

// ========== Transactions ==========

/// GET /api/transactions - list all ledger transactions
pub async fn list_transactions(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<FinancialRecord>>> {
    let repo = FinancialRepository::new(state.db.clone());
    let records = repo.find_all(FinancialKind::Transaction).await?;
    Ok(Json(records))
}

/// POST /api/transactions - create a batch of ledger transactions
pub async fn create_transactions(
    State(state): State<ServerState>,
    Json(entries): Json<Vec<FinancialCreate>>,
) -> AppResult<Response> {
    let outcome = state
        .invoice_flow
        .create_financial_batch(FinancialKind::Transaction, entries)
        .await?;
    Ok(batch_response(outcome))
}
