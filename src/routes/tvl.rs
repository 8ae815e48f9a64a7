use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{AllChainsTvl, ChainSummary};
use crate::services::tvl_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(get_all_tvl))
        .route("/csv", get(get_tvl_csv))
        .route("/:chain", get(get_chain_tvl))
}

pub async fn get_chain_tvl(
    Path(chain): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ChainSummary>, AppError> {
    info!("GET /api/tvl/{} - Getting chain TVL", chain);
    let summary = tvl_service::get_chain_summary(
        state.tvl_provider.as_ref(),
        &state.tvl_cache,
        &chain,
    )
    .await?;
    Ok(Json(summary))
}

pub async fn get_all_tvl(State(state): State<AppState>) -> Json<AllChainsTvl> {
    info!("GET /api/tvl/all - Getting TVL for all chains");
    let all = tvl_service::get_all_summaries(
        state.tvl_provider.as_ref(),
        &state.tvl_cache,
        state.fetch_concurrency,
    )
    .await;
    Json(all)
}

pub async fn get_tvl_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /api/tvl/csv - Exporting TVL as CSV");
    let csv = tvl_service::export_csv(
        state.tvl_provider.as_ref(),
        &state.tvl_cache,
        state.fetch_concurrency,
    )
    .await
    .map_err(|e| {
        error!("Failed to export TVL CSV: {}", e);
        e
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment;filename=tvl_data.csv"),
        ],
        csv,
    ))
}
