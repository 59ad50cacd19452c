//! Financial API module (receipts, payments, transactions)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/receipts",
            get(handler::list_receipts).post(handler::create_receipts),
        )
        .route(
            "/api/payments",
            get(handler::list_payments)
                .post(handler::create_payments)
                .delete(handler::delete_payments),
        )
        .route(
            "/api/transactions",
            get(handler::list_transactions).post(handler::create_transactions),
        )
}
