use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_API_BASE_URL: &str =
    "https://tvl-defillama-service-1094890588015.us-central1.run.app";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub cache_ttl_secs: i64,
    pub fetch_concurrency: usize,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            cache_ttl_secs: 3600,
            fetch_concurrency: 5,
            http_timeout_secs: 10,
        }
    }
}

// Unparseable values keep the default rather than aborting startup.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cfg = Self {
            api_base_url: std::env::var("TVL_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            cache_ttl_secs: env_or("TVL_CACHE_TTL_SECS", defaults.cache_ttl_secs),
            fetch_concurrency: env_or("TVL_FETCH_CONCURRENCY", defaults.fetch_concurrency),
            http_timeout_secs: env_or("TVL_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
        };

        info!("Loaded config: {:?}", cfg);
        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("TVL_API_BASE_URL is not a valid URL: {}", e))?;
        if self.fetch_concurrency == 0 {
            return Err("TVL_FETCH_CONCURRENCY must be at least 1".to_string());
        }
        if self.http_timeout_secs == 0 {
            return Err("TVL_HTTP_TIMEOUT_SECS must be at least 1".to_string());
        }
        if self.cache_ttl_secs < 0 {
            return Err("TVL_CACHE_TTL_SECS must not be negative".to_string());
        }
        self.cache_ttl()?;
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Result<chrono::Duration, String> {
        chrono::Duration::try_seconds(self.cache_ttl_secs)
            .ok_or_else(|| format!("TVL_CACHE_TTL_SECS is too large: {}", self.cache_ttl_secs))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}
