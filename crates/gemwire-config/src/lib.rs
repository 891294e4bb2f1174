#![allow(clippy::must_use_candidate)]

//! Configuration for gemwire
//!
//! Loaded from TOML with `{{ env.VAR }}` placeholders expanded before parsing.

mod env;
mod loader;
pub mod logging;
pub mod provider;

use serde::Deserialize;

pub use logging::{LogFormat, LoggingConfig};
pub use provider::{CapabilityRuleConfig, ProviderConfig};

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}
