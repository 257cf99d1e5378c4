//! Counter API Handlers
//!
//! HTTP endpoints that expose the [`Counter`] to users (`/increment`,
//! `/count`) and to peers (`/counter/propagate`).

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use std::sync::Arc;

use super::protocol::CountResponse;
use super::service::Counter;
use super::types::Increment;

/// Public endpoint. Applies a fresh increment locally and kicks off
/// propagation; responds as soon as the local apply is done.
pub async fn handle_increment(Extension(counter): Extension<Arc<Counter>>) -> StatusCode {
    counter.local_increment().await;
    StatusCode::OK
}

/// Public endpoint. Snapshot read of the counter.
pub async fn handle_count(Extension(counter): Extension<Arc<Counter>>) -> Json<CountResponse> {
    Json(CountResponse {
        count: counter.value().await,
    })
}

/// Internal endpoint. Applies an increment originated on another node.
/// Duplicates are not an error; the apply simply reports "already seen".
pub async fn handle_propagate(
    Extension(counter): Extension<Arc<Counter>>,
    Json(inc): Json<Increment>,
) -> StatusCode {
    if inc.id.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    counter.apply(inc).await;
    StatusCode::OK
}
