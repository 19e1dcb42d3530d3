//! Client configuration using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `./pastus.toml`
//! 3. `PASTUS_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// Which data source backs the services.
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Origin plus API prefix; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

/// Fixture-backed or HTTP-backed services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Fixture,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    #[serde(default)]
    pub source: DataSourceKind,

    /// Artificial latency before a fixture resolves.
    #[serde(default = "default_fixture_delay_ms")]
    pub fixture_delay_ms: u64,
}

impl DataConfig {
    pub fn fixture_delay(&self) -> Duration {
        Duration::from_millis(self.fixture_delay_ms)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::default(),
            fixture_delay_ms: default_fixture_delay_ms(),
        }
    }
}

fn default_fixture_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory for the persisted stores; in-memory when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from `./pastus.toml` with env var overrides.
pub fn load_config() -> Result<ClientConfig, figment::Error> {
    build_figment(Toml::file("pastus.toml")).extract()
}

/// Load configuration from a TOML string only (no env overrides).
pub fn load_config_from_str(toml_content: &str) -> Result<ClientConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClientConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ClientConfig, figment::Error> {
    build_figment(Toml::file(path)).extract()
}

fn build_figment(file: figment::providers::Data<Toml>) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ClientConfig::default()))
        .merge(file)
        .merge(env_provider())
}

/// Maps `PASTUS_API_BASE_URL` to `api.base_url` and so on.
///
/// Uses `Env::map()` rather than `split("_")` because field names contain
/// underscores themselves (`base_url`, `fixture_delay_ms`).
fn env_provider() -> Env {
    Env::prefixed("PASTUS_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("api_", "api.", 1)
            .replacen("data_", "data.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fixtures() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.data.source, DataSourceKind::Fixture);
        assert_eq!(config.data.fixture_delay(), Duration::from_millis(500));
        assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
        assert!(config.storage.dir.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn toml_selects_http_source() {
        let config = load_config_from_str(
            r#"
            [api]
            base_url = "https://api.pastus.example/api/v1"

            [data]
            source = "http"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.source, DataSourceKind::Http);
        assert_eq!(config.api.base_url, "https://api.pastus.example/api/v1");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [data]
            mode = "http"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "pastus.toml",
                r#"
                [data]
                source = "fixture"
                fixture_delay_ms = 10
                "#,
            )?;
            jail.set_env("PASTUS_DATA_SOURCE", "http");
            jail.set_env("PASTUS_API_BASE_URL", "http://10.0.0.2:8080");

            let config = load_config().expect("config loads");
            assert_eq!(config.data.source, DataSourceKind::Http);
            assert_eq!(config.data.fixture_delay_ms, 10);
            assert_eq!(config.api.base_url, "http://10.0.0.2:8080");
            Ok(())
        });
    }
}
