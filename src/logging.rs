use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Keep HTTP client internals out of `info` output unless asked for.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            loki_enabled: std::env::var("LOKI_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            loki_url: std::env::var("LOKI_URL").ok().filter(|u| !u.trim().is_empty()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "tvl-backend".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match (&self.loki_url, self.loki_enabled) {
            (None, true) => Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string()),
            (Some(url), true) => url::Url::parse(url)
                .map(|_| ())
                .map_err(|e| format!("LOKI_URL is not a valid URL: {}", e)),
            _ => Ok(()),
        }
    }

    /// `RUST_LOG` directives, with the HTTP stack quietened unless the
    /// caller already set a level for it.
    fn filter(&self) -> EnvFilter {
        let mut directives = vec![self.log_level.clone()];
        for quiet in QUIET_DEPENDENCIES {
            let target = quiet.split('=').next().unwrap_or_default();
            if !self.log_level.contains(target) {
                directives.push(quiet.to_string());
            }
        }

        EnvFilter::try_new(directives.join(",")).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if config.loki_enabled {
            if let Some(loki_url) = config.loki_url.clone() {
                return init_with_loki(config, &loki_url);
            }
        }
    }

    init_console_only(config)
}

fn init_console_only(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("📊 Console logging initialized for {} ({})", config.service_name, config.environment);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(loki_url)?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;

    // Ships buffered events to Loki in the background.
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("✅ Loki logging initialized at {}", loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(loki_enabled: bool, loki_url: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            loki_enabled,
            loki_url: loki_url.map(str::to_string),
            service_name: "tvl-backend".into(),
            environment: "test".into(),
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_loki_requires_valid_url() {
        assert!(config(true, None).validate().is_err());
        assert!(config(true, Some("not a url")).validate().is_err());
        assert!(config(true, Some("http://localhost:3100")).validate().is_ok());
        assert!(config(false, None).validate().is_ok());
    }

    #[test]
    fn test_filter_quietens_http_stack() {
        let filter = config(false, None).filter().to_string();
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("hyper=warn"));
    }

    #[test]
    fn test_filter_respects_explicit_levels() {
        let mut cfg = config(false, None);
        cfg.log_level = "debug,reqwest=trace".into();

        let filter = cfg.filter().to_string();
        assert!(filter.contains("reqwest=trace"));
        assert!(!filter.contains("reqwest=warn"));
    }
}
