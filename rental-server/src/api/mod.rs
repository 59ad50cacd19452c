//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`customers`] - customer management
//! - [`accounts`] - accounting ledger accounts
//! - [`master_items`] - master inventory items
//! - [`sub_items`] - rentable sub-items
//! - [`invoices`] - invoice CRUD plus the save-and-reconcile flow
//! - [`financial`] - receipts, payments and ledger transactions

pub mod accounts;
pub mod customers;
pub mod financial;
pub mod health;
pub mod invoices;
pub mod master_items;
pub mod sub_items;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(accounts::router())
        .merge(master_items::router())
        .merge(sub_items::router())
        .merge(invoices::router())
        .merge(financial::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
