//! Configuration for the account simulation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Account to open
    pub account: AccountConfig,

    /// Actor configuration
    pub actor: ActorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,

    /// Report output configuration
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "bank-sim".to_string(),
            account: AccountConfig::default(),
            actor: ActorConfig::default(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Account number
    pub id: String,

    /// Amount deposited when the account is opened
    pub initial_deposit: Decimal,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            id: "S-987654321".to_string(),
            initial_deposit: Decimal::new(100000, 2), // 1000.00
        }
    }
}

/// Actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Drive the simulation through the single-writer actor
    pub enabled: bool,

    /// Mailbox capacity (messages)
    pub mailbox_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mailbox_capacity: 1000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Print collected metrics when the simulation ends
    pub enabled: bool,
}

/// Report output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Also dump the final history as JSON
    pub json: bool,
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from `BANK_SIM_CONFIG` (if set), then apply environment overrides
    pub fn load() -> crate::Result<Self> {
        let mut config = match std::env::var("BANK_SIM_CONFIG") {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(id) = std::env::var("BANK_SIM_ACCOUNT_ID") {
            self.account.id = id;
        }

        if let Ok(amount) = std::env::var("BANK_SIM_INITIAL_DEPOSIT") {
            self.account.initial_deposit = amount.trim().parse().map_err(|e| {
                crate::Error::Config(format!("Invalid BANK_SIM_INITIAL_DEPOSIT: {}", e))
            })?;
        }

        if let Ok(filter) = std::env::var("BANK_SIM_LOG") {
            self.logging.filter = filter;
        }

        if let Ok(json) = std::env::var("BANK_SIM_LOG_JSON") {
            self.logging.json = is_truthy(&json);
        }

        if let Ok(actor) = std::env::var("BANK_SIM_USE_ACTOR") {
            self.actor.enabled = is_truthy(&actor);
        }

        if let Ok(metrics) = std::env::var("BANK_SIM_METRICS") {
            self.metrics.enabled = is_truthy(&metrics);
        }

        if let Ok(json) = std::env::var("BANK_SIM_OUTPUT_JSON") {
            self.output.json = is_truthy(&json);
        }

        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
