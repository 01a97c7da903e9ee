//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every engine knob defaults to the fixed constants of the bidding
//! heuristic, so an empty file (or no file at all) yields the stock bot.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::GavelError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tunables of the bidding pipeline.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Starting value of the items-still-needed countdown.
    pub items_needed_start: u32,
    /// The countdown never drops below this.
    pub items_needed_floor: u32,
    /// Fewer remaining occurrences than this forces HIGH priority.
    pub scarcity_threshold: usize,
    /// Number of most recent settled prices in the rolling average.
    pub price_window: usize,
    /// Below this many items still needed, LOW priority items get a zero bid.
    pub endgame_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            items_needed_start: 8, // 3 + 3 + 1 + 1
            items_needed_floor: 2,
            scarcity_threshold: 5,
            price_window: 3,
            endgame_threshold: 4,
        }
    }
}

impl EngineConfig {
    /// Reject values that would break the countdown or the price window.
    pub fn validate(&self) -> Result<(), GavelError> {
        if self.items_needed_floor == 0 {
            return Err(GavelError::Config(
                "items_needed_floor must be at least 1".into(),
            ));
        }
        if self.items_needed_start < self.items_needed_floor {
            return Err(GavelError::Config(format!(
                "items_needed_start ({}) is below items_needed_floor ({})",
                self.items_needed_start, self.items_needed_floor
            )));
        }
        if self.price_window == 0 {
            return Err(GavelError::Config("price_window must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.engine.validate()?;
        Ok(config)
    }
}
