use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ChainId, RawTvlPoint};

#[derive(Debug, Error)]
pub enum TvlProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad status: {0}")]
    BadStatus(u16),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Source of raw per-chain TVL series.
#[async_trait]
pub trait TvlProvider: Send + Sync {
    async fn fetch_chain_tvl(&self, chain: ChainId) -> Result<Vec<RawTvlPoint>, TvlProviderError>;
}
