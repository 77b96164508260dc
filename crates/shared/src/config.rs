//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Loan pricing configuration.
    #[serde(default)]
    pub lending: LendingConfig,
    /// Base-rate source configuration.
    #[serde(default)]
    pub rates: RateConfig,
    /// Notification configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Loan pricing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LendingConfig {
    /// Base rate (percent) used when the rate source is unavailable.
    #[serde(default = "default_fallback_base_rate")]
    pub fallback_base_rate: Decimal,
    /// Margin (percent) added on top of the base rate for every loan.
    #[serde(default = "default_rate_margin")]
    pub rate_margin: Decimal,
}

fn default_fallback_base_rate() -> Decimal {
    Decimal::from(10)
}

fn default_rate_margin() -> Decimal {
    Decimal::from(5)
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            fallback_base_rate: default_fallback_base_rate(),
            rate_margin: default_rate_margin(),
        }
    }
}

/// Base-rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    /// Value (percent) served by the fixed rate source.
    #[serde(default = "default_fixed_base_rate")]
    pub fixed_base_rate: Decimal,
    /// How long a fetched base rate stays cached, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_fixed_base_rate() -> Decimal {
    Decimal::from(16)
}

fn default_cache_ttl_secs() -> u64 {
    3600 // 1 hour
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            fixed_base_rate: default_fixed_base_rate(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Whether notifications are delivered. When off they are only logged.
    #[serde(default)]
    pub enabled: bool,
    /// Sender address on outgoing messages.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

fn default_from_address() -> String {
    "bank@tally.local".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from_address: default_from_address(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
