use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use crate::core::converter::ConversionStrategy;
use crate::core::format::DisplayStyle;
use crate::providers::open_exchange_rates::DEFAULT_BASE_URL;

/// Environment variable that overrides the configured provider credential.
pub const APP_ID_ENV: &str = "OPEN_EXCHANGE_RATES_APP_ID";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_pivot() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenExchangeRatesConfig {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenExchangeRatesConfig {
    fn default() -> Self {
        OpenExchangeRatesConfig {
            app_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OpenExchangeRatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub open_exchange_rates: OpenExchangeRatesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversionConfig {
    #[serde(default)]
    pub strategy: ConversionStrategy,
    /// Base currency fetched by the cross strategy.
    #[serde(default = "default_pivot")]
    pub pivot: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            strategy: ConversionStrategy::default(),
            pivot: default_pivot(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub style: DisplayStyle,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxbot", "fxbot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolves the provider credential, preferring the environment over the file.
    pub fn app_id(&self) -> Result<String> {
        self.app_id_with_env(std::env::var(APP_ID_ENV).ok())
    }

    fn app_id_with_env(&self, from_env: Option<String>) -> Result<String> {
        let from_file = self.providers.open_exchange_rates.app_id.clone();
        let non_blank = |id: &String| !id.trim().is_empty();
        match from_env.filter(non_blank).or(from_file.filter(non_blank)) {
            Some(id) => Ok(id.trim().to_string()),
            None => bail!(
                "No Open Exchange Rates app id configured; set providers.open_exchange_rates.app_id or {APP_ID_ENV}"
            ),
        }
    }
}
