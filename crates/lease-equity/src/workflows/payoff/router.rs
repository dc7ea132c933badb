use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::PayoffDirectory;

/// Router builder exposing the lender payoff directory.
pub fn payoff_router(directory: Arc<PayoffDirectory>) -> Router {
    Router::new()
        .route("/api/v1/payoff/lenders", get(list_handler))
        .route("/api/v1/payoff/lenders/:lender", get(lookup_handler))
        .with_state(directory)
}

async fn list_handler(State(directory): State<Arc<PayoffDirectory>>) -> Response {
    Json(json!({ "lenders": directory.entries() })).into_response()
}

async fn lookup_handler(
    State(directory): State<Arc<PayoffDirectory>>,
    Path(lender): Path<String>,
) -> Response {
    match directory.lookup(&lender) {
        Some(contact) => (StatusCode::OK, Json(contact.clone())).into_response(),
        None => {
            let payload = json!({
                "error": "lender not found",
                "lender": lender,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}
