//! Dispatch configuration: who this player is and how destinations are named.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::routing::RoutingConfig;

const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Identity of the local player. Stamped on game logs this player publishes.
    pub username: String,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl DispatchConfig {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            routing: RoutingConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `PERIL_*` environment variables. Only `PERIL_USERNAME` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new(lookup("PERIL_USERNAME").unwrap_or_default());

        if let Some(prefix) = lookup("PERIL_WAR_PREFIX") {
            config.routing.war_recognitions_prefix = prefix;
        }
        if let Some(slug) = lookup("PERIL_GAME_LOG_SLUG") {
            config.routing.game_log_slug = slug;
        }
        if let Some(prefix) = lookup("PERIL_ARMY_MOVES_PREFIX") {
            config.routing.army_moves_prefix = prefix;
        }
        if let Some(raw) = lookup("PERIL_POLL_INTERVAL_MS") {
            config.poll_interval_ms = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PERIL_POLL_INTERVAL_MS",
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_segment("username", &self.username)?;
        check_segment("war_recognitions_prefix", &self.routing.war_recognitions_prefix)?;
        check_segment("game_log_slug", &self.routing.game_log_slug)?;
        check_segment("army_moves_prefix", &self.routing.army_moves_prefix)?;
        check_segment("pause_key", &self.routing.pause_key)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Every configured name is a single routing word.
fn check_segment(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if value.contains(['.', '*', '#']) {
        return Err(ConfigError::InvalidSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
