mod chain;
mod tvl;

pub use chain::ChainId;
pub use tvl::{AllChainsTvl, ChainSummary, RawTvlPoint, TvlCsvRow, TvlPoint, TvlValue};
