use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::models::ChainId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    supported_chains: usize,
    cached_chains: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("GET /health - Health check");
    Json(HealthResponse {
        status: "ok",
        supported_chains: ChainId::ALL.len(),
        cached_chains: state.tvl_cache.len(),
    })
}
