//! Session configuration
//!
//! Loaded from JSON; every field has a default so partial files are fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tradebook_core::CurrencyCode;

use crate::volume::NumberLocale;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Poll interval must be positive")]
    InvalidPollInterval,
    #[error("Invalid default currency: {0}")]
    InvalidCurrency(String),
    #[error("Decimal and grouping separators must differ")]
    AmbiguousLocale,
    #[error("Command capacity must be positive")]
    InvalidCommandCapacity,
}

/// Configuration for one order book session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Dirty-flag poll period
    pub poll_interval_ms: u64,
    /// Currency scope used while the viewer has no selected account
    pub default_currency: CurrencyCode,
    /// Decimal conventions for amount/price text input
    pub number_locale: NumberLocale,
    /// Bound of the UI command channel
    pub command_capacity: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            default_currency: CurrencyCode::new("EUR"),
            number_locale: NumberLocale::default(),
            command_capacity: 64,
        }
    }
}

impl MarketConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        if !self.default_currency.is_well_formed() {
            return Err(ConfigError::InvalidCurrency(
                self.default_currency.to_string(),
            ));
        }
        if self.number_locale.grouping_separator == Some(self.number_locale.decimal_separator) {
            return Err(ConfigError::AmbiguousLocale);
        }
        if self.command_capacity == 0 {
            return Err(ConfigError::InvalidCommandCapacity);
        }
        Ok(())
    }
}

/// Load market configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MarketConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<MarketConfig, ConfigError> {
    let config: MarketConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<MarketConfig, ConfigError> {
    let default_config = include_str!("market_config.json");
    load_config_from_str(default_config)
}
