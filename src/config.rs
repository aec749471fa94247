//! # Configuration Module
//!
//! File and environment configuration for building a [`Relay`](crate::relay::Relay).
//!
//! ## Config File
//!
//! YAML or JSON, selected by extension (`.json` → JSON, anything else → YAML):
//!
//! ```yaml
//! queue:
//!   - request_id
//!   - auth
//!   - hello
//! on_exhausted: respond
//! exhausted_status: 404
//! ```
//!
//! Queue items are identifiers, resolved at dispatch time by whatever
//! [`Resolver`](crate::resolver::Resolver) the relay is built with.
//!
//! ## Environment Variables
//!
//! ### `RELAY_ON_EXHAUSTED`
//!
//! What to do when the last entry calls `next`: `fail` (default) raises
//! `ChainExhausted`, `respond` answers with an empty response.
//!
//! ### `RELAY_EXHAUSTED_STATUS`
//!
//! Status used by `respond`. Default: `404`.
//!
//! Environment values override file values when applied with
//! [`RelayConfig::with_env_overrides`].

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::relay::ExhaustionPolicy;

/// Status used by [`ExhaustedMode::Respond`] unless configured otherwise
pub const DEFAULT_EXHAUSTED_STATUS: u16 = 404;

/// Exhaustion behaviour selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustedMode {
    #[default]
    Fail,
    Respond,
}

impl ExhaustedMode {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "respond" | "empty" => ExhaustedMode::Respond,
            _ => ExhaustedMode::Fail, // Default to failing loudly
        }
    }
}

/// Relay configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Queue description; usually a list of identifiers
    pub queue: Option<Value>,
    pub on_exhausted: ExhaustedMode,
    pub exhausted_status: u16,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue: None,
            on_exhausted: ExhaustedMode::Fail,
            exhausted_status: DEFAULT_EXHAUSTED_STATUS,
        }
    }
}

impl RelayConfig {
    /// Defaults overridden by environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `RELAY_*` environment overrides on top of `self`
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(mode) = lookup("RELAY_ON_EXHAUSTED") {
            self.on_exhausted = ExhaustedMode::parse(&mode);
        }
        if let Some(status) = lookup("RELAY_EXHAUSTED_STATUS").and_then(|s| s.parse().ok()) {
            self.exhausted_status = status;
        }
        self
    }

    /// Parse a YAML document (JSON is accepted too, being a YAML subset)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse relay config")
    }

    /// Load configuration from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read relay config {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse relay config {}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse relay config {}", path.display()))
        }
    }

    /// Exhaustion policy described by this configuration
    pub fn exhaustion_policy(&self) -> Result<ExhaustionPolicy> {
        match self.on_exhausted {
            ExhaustedMode::Fail => Ok(ExhaustionPolicy::Fail),
            ExhaustedMode::Respond => {
                let status = StatusCode::from_u16(self.exhausted_status).with_context(|| {
                    format!("Invalid exhausted_status {}", self.exhausted_status)
                })?;
                Ok(ExhaustionPolicy::Respond(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert!(config.queue.is_none());
        assert_eq!(config.on_exhausted, ExhaustedMode::Fail);
        assert_eq!(config.exhausted_status, 404);
        assert!(matches!(
            config.exhaustion_policy().unwrap(),
            ExhaustionPolicy::Fail
        ));
    }

    #[test]
    fn test_exhausted_mode_parse() {
        assert_eq!(ExhaustedMode::parse("respond"), ExhaustedMode::Respond);
        assert_eq!(ExhaustedMode::parse(" RESPOND "), ExhaustedMode::Respond);
        assert_eq!(ExhaustedMode::parse("empty"), ExhaustedMode::Respond);
        assert_eq!(ExhaustedMode::parse("fail"), ExhaustedMode::Fail);
        assert_eq!(ExhaustedMode::parse("whatever"), ExhaustedMode::Fail);
    }

    #[test]
    fn test_env_overrides() {
        let config = RelayConfig::default().with_overrides(lookup(&[
            ("RELAY_ON_EXHAUSTED", "respond"),
            ("RELAY_EXHAUSTED_STATUS", "204"),
        ]));
        assert_eq!(config.on_exhausted, ExhaustedMode::Respond);
        assert_eq!(config.exhausted_status, 204);
        assert!(matches!(
            config.exhaustion_policy().unwrap(),
            ExhaustionPolicy::Respond(StatusCode::NO_CONTENT)
        ));
    }

    #[test]
    fn test_unparseable_status_keeps_previous_value() {
        let config = RelayConfig::default()
            .with_overrides(lookup(&[("RELAY_EXHAUSTED_STATUS", "not-a-number")]));
        assert_eq!(config.exhausted_status, DEFAULT_EXHAUSTED_STATUS);
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let config = RelayConfig {
            on_exhausted: ExhaustedMode::Respond,
            exhausted_status: 42,
            ..RelayConfig::default()
        };
        let err = config.exhaustion_policy().unwrap_err();
        assert!(err.to_string().contains("Invalid exhausted_status 42"));
    }

    #[test]
    fn test_from_yaml_str() {
        let config = RelayConfig::from_yaml_str(
            "queue: [request_id, auth, hello]\non_exhausted: respond\nexhausted_status: 503\n",
        )
        .unwrap();
        assert_eq!(
            config.queue,
            Some(serde_json::json!(["request_id", "auth", "hello"]))
        );
        assert_eq!(config.on_exhausted, ExhaustedMode::Respond);
        assert_eq!(config.exhausted_status, 503);
    }

    #[test]
    fn test_from_yaml_str_partial_uses_defaults() {
        let config = RelayConfig::from_yaml_str("queue: hello\n").unwrap();
        assert_eq!(config.queue, Some(serde_json::json!("hello")));
        assert_eq!(config.on_exhausted, ExhaustedMode::Fail);
    }
}
