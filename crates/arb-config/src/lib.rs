//! arb-config
//!
//! Environment-driven configuration for the bet-pair execution engine,
//! plus a layered-YAML profile loader for test/dry-run harnesses.

mod profile;

pub use profile::{load_layered_yaml, LoadedConfig};

use std::time::Duration;

pub const ENV_API_URL: &str = "API_URL";
pub const ENV_REDIS_URL: &str = "REDIS_URL";
pub const ENV_COOLDOWN_SECONDS: &str = "COOLDOWN_SECONDS";

const DEFAULT_API_URL: &str = "http://api:3001";
const DEFAULT_REDIS_URL: &str = "redis://redis:6379";
const DEFAULT_QUEUE_NAME: &str = "arb-execute";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// The hard cooldown constant. Not read from configuration — see
/// `EngineConfig::from_env`'s handling of `COOLDOWN_SECONDS`.
pub const COOLDOWN_SECONDS: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub api_base: String,
    pub redis_url: String,
    pub queue_name: String,
    pub provider_call_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDuration(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDuration(v) => write!(f, "invalid duration value: {v}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Loads configuration from the environment, applying the defaults
    /// documented below. `COOLDOWN_SECONDS` is read only to warn the operator
    /// that it has no effect — the cooldown window is a fixed 60s constant
    /// enforced in `arb-cooldown`, not a tunable here.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var(ENV_COOLDOWN_SECONDS) {
            if v.trim() != "60" {
                tracing_warn_cooldown_override(&v);
            }
        }

        let provider_call_timeout = match std::env::var("PROVIDER_CALL_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse::<u64>()
                    .map_err(|_| ConfigError::InvalidDuration(v))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base: std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            redis_url: std::env::var(ENV_REDIS_URL).unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            queue_name: std::env::var("ARB_QUEUE_NAME").unwrap_or_else(|_| DEFAULT_QUEUE_NAME.to_string()),
            provider_call_timeout,
        })
    }
}

// Kept as a free function (rather than inlined) so the warning text has one
// home and doesn't drift between call sites.
fn tracing_warn_cooldown_override(got: &str) {
    // arb-config has no tracing dependency of its own (this crate is pure
    // config plumbing); the daemon logs this at start-up instead. Record the
    // attempted override for the caller to surface.
    eprintln!(
        "COOLDOWN_SECONDS={got} set in environment, but the cooldown window is a fixed \
         60-second constant enforced in arb-cooldown and is not configurable here"
    );
}
