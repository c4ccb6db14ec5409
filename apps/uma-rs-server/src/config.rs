//! Layered server configuration.
//!
//! Built-in defaults are overlaid by an optional YAML file and then by
//! `UMA_RS__`-prefixed environment variables, where `__` separates nested
//! keys (`UMA_RS__SERVER__BIND_ADDR=0.0.0.0:9000`).

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use resource_server::ResourceServerConfig;
use serde::{Deserialize, Serialize};
use static_uma_plugin::StaticUmaPluginConfig;

pub const ENV_PREFIX: &str = "UMA_RS__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub resource_server: ResourceServerConfig,
    pub static_uma_plugin: StaticUmaPluginConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional YAML file and the environment.
    ///
    /// # Errors
    /// Returns an error if the file is missing or any layer fails to deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "config file not found: {}", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Render the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).map_err(|e| anyhow::anyhow!("failed to render config: {e}"))
    }
}
