use serde::Deserialize;
use std::time::Duration;
use anyhow::Result;
use config::{Config as ConfigSource, File, Environment};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_node_api_base")]
    pub node_api_base: String,
    #[serde(default = "default_pool_api_base")]
    pub pool_api_base: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// 0 disables the Prometheus exporter.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default = "default_stats_page_size")]
    pub stats_page_size: u64,
    #[serde(default = "default_stats_page_delay_ms")]
    pub stats_page_delay_ms: u64,
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Miner pool polling stays off unless this is set.
    #[serde(default)]
    pub miner_refresh_secs: Option<u64>,
}

fn default_node_api_base() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_pool_api_base() -> String {
    "http://localhost:8081/api".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_page_size() -> u64 {
    10
}

fn default_stats_page_size() -> u64 {
    100
}

fn default_stats_page_delay_ms() -> u64 {
    50
}

fn default_batch_delay_ms() -> u64 {
    500
}

fn default_batch_concurrency() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_api_base: default_node_api_base(),
            pool_api_base: default_pool_api_base(),
            listen_addr: default_listen_addr(),
            metrics_port: default_metrics_port(),
            page_size: default_page_size(),
            stats_page_size: default_stats_page_size(),
            stats_page_delay_ms: default_stats_page_delay_ms(),
            batch_delay_ms: default_batch_delay_ms(),
            batch_concurrency: default_batch_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            miner_refresh_secs: None,
        }
    }
}

impl Config {
    /// `config/dashboard.toml` (optional) overlaid by `DASHBOARD_*` variables.
    pub fn load() -> Result<Self> {
        let config: Config = ConfigSource::builder()
            .add_source(File::with_name("config/dashboard").required(false))
            .add_source(Environment::with_prefix("DASHBOARD"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `load()`, falling back to the plain `NODE_API_BASE`-style variables
    /// when the layered sources cannot be read.
    pub fn load_or_env() -> Result<Self> {
        Self::load().or_else(|e| {
            warn!(
                event = "config_fallback",
                message = "Layered configuration failed, reading plain environment variables",
                error = %e
            );
            Self::from_env()
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            node_api_base: lookup("NODE_API_BASE").unwrap_or(defaults.node_api_base),
            pool_api_base: lookup("POOL_API_BASE").unwrap_or(defaults.pool_api_base),
            listen_addr: lookup("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            metrics_port: lookup("METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),
            miner_refresh_secs: lookup("MINER_REFRESH_SECS").and_then(|v| v.parse().ok()),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.stats_page_size == 0 {
            anyhow::bail!("page sizes must be greater than zero");
        }
        if self.batch_concurrency == 0 {
            anyhow::bail!("batch_concurrency must be greater than zero");
        }
        if self.miner_refresh_secs == Some(0) {
            anyhow::bail!("miner_refresh_secs must be greater than zero when set");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stats_page_delay(&self) -> Duration {
        Duration::from_millis(self.stats_page_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn miner_refresh(&self) -> Option<Duration> {
        self.miner_refresh_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 10);
        assert!(config.miner_refresh().is_none());
    }

    #[test]
    fn zero_refresh_is_rejected() {
        let config = Config {
            miner_refresh_secs: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn plain_variables_fill_the_fallback() {
        let config = Config::from_lookup(|key| match key {
            "NODE_API_BASE" => Some("http://coordinator:8080/api".to_string()),
            "METRICS_PORT" => Some("0".to_string()),
            "MINER_REFRESH_SECS" => Some("20".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.node_api_base, "http://coordinator:8080/api");
        assert_eq!(config.pool_api_base, default_pool_api_base());
        assert_eq!(config.metrics_port, 0);
        assert_eq!(config.miner_refresh(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn fallback_still_validates() {
        let result = Config::from_lookup(|key| (key == "MINER_REFRESH_SECS").then(|| "0".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let config: Config = ConfigSource::builder()
            .add_source(File::from_str(
                "node_api_base = \"http://node:8080/api\"\npage_size = 25\nminer_refresh_secs = 15",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.node_api_base, "http://node:8080/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.pool_api_base, default_pool_api_base());
        assert_eq!(config.miner_refresh(), Some(Duration::from_secs(15)));
    }
}
