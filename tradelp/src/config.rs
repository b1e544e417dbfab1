//! Layered configuration for the command-line tools.
//!
//! Values come from the built-in defaults, then an optional TOML file, then
//! environment variables, each layer overriding the one before.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tlp_core::models::TradeConfig;

/// Everything a run can be configured with
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    /// The engine configuration (tolerance, slack penalties, backend options)
    #[serde(default)]
    pub trade: TradeConfig,

    /// Give up on a solve that runs longer than this (e.g. "90s", "5m")
    #[serde(default, with = "humantime_serde::option")]
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. The config file, if given
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `TLP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Loosen the numerical tolerance
    /// export TLP_TRADE__EPSILON=1e-5
    ///
    /// # Raise the floor of the unmet-demand penalty
    /// export TLP_TRADE__DEMAND_SLACK_COST=5000
    ///
    /// # Abandon solves after two minutes
    /// export TLP_TIMEOUT="2m"
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        // This maps TLP_TRADE__EPSILON to trade.epsilon
        config = config.add_source(
            config::Environment::with_prefix("TLP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
