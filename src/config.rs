//! Board configuration.
//!
//! Defaults cover the common case. A host may pass JSON and/or set
//! environment variables:
//! - `RACKBOARD_ID_PREFIX` - prefix for generated record ids
//! - `RACKBOARD_DEFAULT_VIEW` - `product`, `environment` or `owner`
//! - `RACKBOARD_LOG_LEVEL` - `error`, `warn`, `info`, `debug`, `trace`
//! - `RACKBOARD_STRICT_HOSTNAMES` - `true`/`false`

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::grouping::view::View;
use crate::store::record_store::DEFAULT_ID_PREFIX;

pub const ENV_ID_PREFIX: &str = "RACKBOARD_ID_PREFIX";
pub const ENV_DEFAULT_VIEW: &str = "RACKBOARD_DEFAULT_VIEW";
pub const ENV_LOG_LEVEL: &str = "RACKBOARD_LOG_LEVEL";
pub const ENV_STRICT_HOSTNAMES: &str = "RACKBOARD_STRICT_HOSTNAMES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    pub id_prefix: String,
    pub default_view: View,
    pub log_level: String,
    pub strict_hostnames: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            default_view: View::Product,
            log_level: "info".to_string(),
            strict_hostnames: false,
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let config: BoardConfig =
            serde_json::from_str(json).map_err(|e| BoardError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `RACKBOARD_*` environment variables onto this config.
    pub fn with_env_overrides(self) -> Result<Self, BoardError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, BoardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup(ENV_ID_PREFIX) {
            self.id_prefix = prefix;
        }
        if let Some(view) = lookup(ENV_DEFAULT_VIEW) {
            self.default_view = view
                .parse()
                .map_err(|e| BoardError::InvalidConfig(format!("{}: {}", ENV_DEFAULT_VIEW, e)))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(strict) = lookup(ENV_STRICT_HOSTNAMES) {
            self.strict_hostnames = parse_bool(&strict).ok_or_else(|| {
                BoardError::InvalidConfig(format!("{}: not a boolean: {}", ENV_STRICT_HOSTNAMES, strict))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        if self.id_prefix.is_empty() {
            return Err(BoardError::InvalidConfig("idPrefix must not be empty".to_string()));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, BoardError> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| BoardError::InvalidConfig(format!("unknown log level: {}", self.log_level)))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
