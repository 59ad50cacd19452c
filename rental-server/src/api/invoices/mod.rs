//! Invoice API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/latest", get(handler::latest))
        .route("/next-number", get(handler::next_number))
        .route("/update-item-status", put(handler::update_item_status))
        .route(
            "/update-delivery-status",
            put(handler::update_delivery_status),
        )
        .route("/{key}/neighbor", get(handler::neighbor))
        .route(
            "/{key}",
            get(handler::get_by_key)
                .put(handler::update)
                .delete(handler::delete),
        )
}
