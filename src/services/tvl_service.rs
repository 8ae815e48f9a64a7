use chrono::Local;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::external::tvl_provider::{TvlProvider, TvlProviderError};
use crate::models::{AllChainsTvl, ChainId, ChainSummary, RawTvlPoint};
use crate::services::csv_export;
use crate::services::transform::{self, TransformError};
use crate::services::tvl_cache::TvlCache;

/// Why a single chain dropped out of a request.
#[derive(Debug, Error)]
pub enum ChainFailure {
    #[error("fetch failed: {0}")]
    Fetch(#[from] TvlProviderError),
    #[error("processing failed: {0}")]
    Process(#[from] TransformError),
}

impl ChainFailure {
    fn into_app_error(self, chain: ChainId) -> AppError {
        match self {
            ChainFailure::Fetch(_) => AppError::UpstreamFetchFailed(chain),
            ChainFailure::Process(_) => AppError::DataProcessingFailed(chain),
        }
    }
}

/// Raw series for `chain`, served from cache while fresh.
///
/// A failed fetch leaves the cache untouched and is never retried here.
pub async fn fetch_chain(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    chain: ChainId,
) -> Result<Vec<RawTvlPoint>, TvlProviderError> {
    if let Some(points) = cache.get_fresh(chain) {
        debug!("Cache hit for {} ({} points)", chain, points.len());
        return Ok(points);
    }

    match provider.fetch_chain_tvl(chain).await {
        Ok(points) => {
            info!("✓ Fetched {} TVL points for {}", points.len(), chain);
            cache.store(chain, points.clone());
            Ok(points)
        }
        Err(e) => {
            error!("✗ Error fetching TVL data for {}: {}", chain, e);
            Err(e)
        }
    }
}

/// Contract for `GET /api/tvl/{chain}`: validate, fetch, summarize.
pub async fn get_chain_summary(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    chain_name: &str,
) -> Result<ChainSummary, AppError> {
    let chain: ChainId = chain_name.parse().map_err(|_| {
        warn!("Rejected unknown chain '{}'", chain_name);
        AppError::InvalidChain(chain_name.to_string())
    })?;

    summarize_chain(provider, cache, chain)
        .await
        .map_err(|e| e.into_app_error(chain))
}

async fn summarize_chain(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    chain: ChainId,
) -> Result<ChainSummary, ChainFailure> {
    let points = fetch_chain(provider, cache, chain).await?;
    transform::summarize(chain, &points).map_err(|e| {
        error!("✗ Error processing TVL data for {}: {}", chain, e);
        ChainFailure::from(e)
    })
}

/// Run `process` for every supported chain with at most `limit` chains in
/// flight. Each chain's outcome is returned, in canonical chain order.
async fn fan_out<T, F>(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    limit: usize,
    process: F,
) -> Vec<(ChainId, Result<T, ChainFailure>)>
where
    F: Fn(ChainId, &[RawTvlPoint]) -> Result<T, TransformError>,
{
    let process = &process;

    let mut outcomes: Vec<_> = stream::iter(ChainId::ALL)
        .map(|chain| async move {
            let outcome = match fetch_chain(provider, cache, chain).await {
                Ok(points) => process(chain, &points).map_err(ChainFailure::from),
                Err(e) => Err(ChainFailure::from(e)),
            };
            (chain, outcome)
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    outcomes.sort_by_key(|(chain, _)| *chain);
    outcomes
}

/// Contract for `GET /api/tvl/all`. Failing chains are logged and left
/// out; when every chain fails the result is simply empty.
pub async fn get_all_summaries(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    limit: usize,
) -> AllChainsTvl {
    let mut chains: Vec<ChainSummary> = fan_out(provider, cache, limit, transform::summarize)
        .await
        .into_iter()
        .filter_map(|(chain, outcome)| match outcome {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Skipping {} in aggregate: {}", chain, e);
                None
            }
        })
        .collect();

    // Highest TVL first; chains without a usable latest value go last.
    chains.sort_by(|a, b| {
        let a = a.tvl.unwrap_or(f64::NEG_INFINITY);
        let b = b.tvl.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let total_tvl: f64 = chains.iter().filter_map(|c| c.tvl).sum();

    info!("Aggregated TVL for {}/{} chains", chains.len(), ChainId::ALL.len());

    AllChainsTvl {
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        total_tvl,
        chains,
    }
}

/// Contract for `GET /api/tvl/csv`. Unlike the JSON aggregate, having no
/// rows at all is an error.
pub async fn export_csv(
    provider: &dyn TvlProvider,
    cache: &TvlCache,
    limit: usize,
) -> Result<String, AppError> {
    let mut rows: Vec<_> = fan_out(provider, cache, limit, transform::csv_rows)
        .await
        .into_iter()
        .filter_map(|(chain, outcome)| match outcome {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!("Skipping {} in CSV export: {}", chain, e);
                None
            }
        })
        .flatten()
        .collect();

    if rows.is_empty() {
        error!("CSV export has no rows: every chain failed");
        return Err(AppError::NoDataAvailable);
    }

    csv_export::sort_rows(&mut rows);
    info!("Exporting {} TVL rows as CSV", rows.len());

    Ok(csv_export::write_csv(&rows)?)
}
