pub mod defillama;
pub mod tvl_provider;
