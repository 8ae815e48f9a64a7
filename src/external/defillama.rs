use std::time::Duration;

use async_trait::async_trait;

use crate::external::tvl_provider::{TvlProvider, TvlProviderError};
use crate::models::{ChainId, RawTvlPoint};

/// Client for the DeFi Llama backed TVL service (`GET {base}/tvl/{chain}`).
pub struct DefiLlamaProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DefiLlamaProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TvlProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TvlProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chain_url(&self, chain: ChainId) -> String {
        format!("{}/tvl/{}", self.base_url, chain.as_str())
    }
}

#[async_trait]
impl TvlProvider for DefiLlamaProvider {
    async fn fetch_chain_tvl(&self, chain: ChainId) -> Result<Vec<RawTvlPoint>, TvlProviderError> {
        let resp = self
            .client
            .get(self.chain_url(chain))
            .send()
            .await
            .map_err(|e| TvlProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TvlProviderError::BadStatus(status.as_u16()));
        }

        resp.json::<Vec<RawTvlPoint>>()
            .await
            .map_err(|e| TvlProviderError::Parse(e.to_string()))
    }
}
