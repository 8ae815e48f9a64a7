pub mod csv_export;
pub mod transform;
pub mod tvl_cache;
pub mod tvl_service;
