use std::sync::Arc;
use crate::external::tvl_provider::TvlProvider;
use crate::services::tvl_cache::TvlCache;

#[derive(Clone)]
pub struct AppState {
    pub tvl_provider: Arc<dyn TvlProvider>,
    pub tvl_cache: TvlCache,
    pub fetch_concurrency: usize,
}
