// src/routes/mod.rs
pub mod invocations;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use invocations::{invocations_handler, ping_handler, runtime_invocations_handler};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/invocations", post(invocations_handler))
        .route("/runtime/invocations", post(runtime_invocations_handler))
        .route("/ping", get(ping_handler))
        .layer(TraceLayer::new_for_http())
}
