use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::{
    deserialize_duration, deserialize_duration_opt, serialize_duration, serialize_duration_opt,
};
use crate::format::MAX_DECIMAL_PLACES;
use crate::market_data::{RetryPolicy, DEFAULT_PRICE_LIST_URL};
use crate::normalize::{Normalizer, PriorityTable, DEFAULT_AMOUNT_DECIMALS};

pub const CONFIG_FILE_NAME: &str = "balancebook.toml";

fn default_price_list_url() -> String {
    DEFAULT_PRICE_LIST_URL.to_string()
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places of `formatted_amount` on normalized balances.
    pub amount_decimals: u32,

    /// Decimal places for USD values in human-readable output.
    pub usd_decimals: u32,

    /// Render USD values with thousands separators.
    pub grouping: bool,

    /// Optional prefix for USD values, e.g. "$".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_symbol: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            amount_decimals: DEFAULT_AMOUNT_DECIMALS,
            usd_decimals: 2,
            grouping: false,
            usd_symbol: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts
}

fn default_initial_delay() -> Duration {
    RetryPolicy::default().initial_delay
}

fn default_max_delay() -> Duration {
    RetryPolicy::default().max_delay
}

fn default_multiplier() -> u32 {
    RetryPolicy::default().multiplier
}

/// Backoff settings for price fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(
        default = "default_initial_delay",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub initial_delay: Duration,

    #[serde(
        default = "default_max_delay",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub max_delay: Duration,

    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            multiplier: self.multiplier,
        }
    }
}

/// Remote price list settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesConfig {
    /// URL of the JSON price list.
    #[serde(default = "default_price_list_url")]
    pub url: String,

    /// Quotes older than this are treated as missing (price 0).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_duration_opt",
        deserialize_with = "deserialize_duration_opt"
    )]
    pub staleness: Option<Duration>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            url: default_price_list_url(),
            staleness: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chain priority policy. Replaces the built-in policy when present.
    #[serde(default = "PriorityTable::reference")]
    pub priorities: PriorityTable,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub prices: PricesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            priorities: PriorityTable::reference(),
            display: DisplayConfig::default(),
            prices: PricesConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.display.amount_decimals <= MAX_DECIMAL_PLACES,
            "display.amount_decimals must be at most {MAX_DECIMAL_PLACES}, got {}",
            self.display.amount_decimals
        );
        ensure!(
            self.display.usd_decimals <= MAX_DECIMAL_PLACES,
            "display.usd_decimals must be at most {MAX_DECIMAL_PLACES}, got {}",
            self.display.usd_decimals
        );
        Ok(())
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new().with_amount_decimals(self.display.amount_decimals)
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./balancebook.toml` if it exists in current directory
/// 2. `<config dir>/balancebook/balancebook.toml` (e.g. `~/.config` on Linux)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("balancebook").join(CONFIG_FILE_NAME);
    }

    local_config
}
