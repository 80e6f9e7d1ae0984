//! Runtime settings for the billing system.
//!
//! Built-in defaults are layered with an optional JSON file and then with
//! `COURIER_BILLING_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::ServiceType;

pub const DEFAULT_CHANNEL_BUFFER: usize = 32;
pub const DEFAULT_SAME_DAY_FALLBACK_RATE: f64 = 25.0;
pub const DEFAULT_DIRECT_FALLBACK_RATE: f64 = 35.0;
pub const DEFAULT_LOG_FILTER: &str = "info";

const ENV_CHANNEL_BUFFER: &str = "COURIER_BILLING_CHANNEL_BUFFER";
const ENV_SAME_DAY_RATE: &str = "COURIER_BILLING_FALLBACK_SAME_DAY_RATE";
const ENV_DIRECT_RATE: &str = "COURIER_BILLING_FALLBACK_DIRECT_RATE";
const ENV_LOG_FILTER: &str = "COURIER_BILLING_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Rates charged when a customer has no active subscription at all.
///
/// Only built through [`FallbackRates::new`], so both rates are always
/// finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackRates {
    same_day: f64,
    direct: f64,
}

impl FallbackRates {
    pub fn new(same_day: f64, direct: f64) -> Result<Self, ConfigError> {
        for (name, rate) in [("fallback_same_day_rate", same_day), ("fallback_direct_rate", direct)] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {rate}")));
            }
        }
        Ok(Self { same_day, direct })
    }

    pub fn rate_for(&self, service_type: ServiceType) -> f64 {
        service_type.pick(self.same_day, self.direct)
    }
}

impl Default for FallbackRates {
    fn default() -> Self {
        Self {
            same_day: DEFAULT_SAME_DAY_FALLBACK_RATE,
            direct: DEFAULT_DIRECT_FALLBACK_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Capacity of every actor's request channel.
    pub channel_buffer: usize,
    pub fallback_same_day_rate: f64,
    pub fallback_direct_rate: f64,
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            fallback_same_day_rate: DEFAULT_SAME_DAY_FALLBACK_RATE,
            fallback_direct_rate: DEFAULT_DIRECT_FALLBACK_RATE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl BillingConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: display, source })
    }

    /// Defaults (or the JSON file at `path`) overridden by whatever
    /// `COURIER_BILLING_*` variables are set, then validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_CHANNEL_BUFFER) {
            self.channel_buffer = parse_env(ENV_CHANNEL_BUFFER, &value)?;
        }
        if let Some(value) = lookup(ENV_SAME_DAY_RATE) {
            self.fallback_same_day_rate = parse_env(ENV_SAME_DAY_RATE, &value)?;
        }
        if let Some(value) = lookup(ENV_DIRECT_RATE) {
            self.fallback_direct_rate = parse_env(ENV_DIRECT_RATE, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG_FILTER) {
            self.log_filter = value;
        }
        Ok(self)
    }

    /// A customer without a subscription must always be charged something.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be positive".to_string()));
        }
        self.fallback_rates().map(|_| ())
    }

    pub fn fallback_rates(&self) -> Result<FallbackRates, ConfigError> {
        FallbackRates::new(self.fallback_same_day_rate, self.fallback_direct_rate)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = BillingConfig::default();
        config.validate().unwrap();
        assert_eq!(config.fallback_rates().unwrap(), FallbackRates::default());
    }

    #[test]
    fn overrides_replace_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CHANNEL_BUFFER, "8"),
            (ENV_DIRECT_RATE, "40.5"),
            (ENV_LOG_FILTER, "courier_billing=debug"),
        ]);
        let config = BillingConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.channel_buffer, 8);
        assert_eq!(config.fallback_direct_rate, 40.5);
        assert_eq!(config.fallback_same_day_rate, DEFAULT_SAME_DAY_FALLBACK_RATE);
        assert_eq!(config.log_filter, "courier_billing=debug");
    }

    #[test]
    fn unparsable_override_is_an_error() {
        let err = BillingConfig::default()
            .with_overrides(|key| (key == ENV_SAME_DAY_RATE).then(|| "cheap".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn zero_rates_and_buffer_are_rejected() {
        let config = BillingConfig { fallback_direct_rate: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = BillingConfig { channel_buffer: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fallback_rates_must_be_positive() {
        assert!(FallbackRates::new(25.0, 0.0).is_err());
        assert!(FallbackRates::new(-1.0, 35.0).is_err());
        assert!(FallbackRates::new(f64::NAN, 35.0).is_err());
        let rates = FallbackRates::new(19.0, 29.0).unwrap();
        assert_eq!(rates.rate_for(ServiceType::SameDay), 19.0);
        assert_eq!(rates.rate_for(ServiceType::Direct), 29.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: BillingConfig = serde_json::from_str(r#"{"fallback_same_day_rate": 19.0}"#).unwrap();
        assert_eq!(config.fallback_same_day_rate, 19.0);
        assert_eq!(config.channel_buffer, DEFAULT_CHANNEL_BUFFER);
    }

    #[test]
    fn load_reads_and_validates_file() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("courier-billing-good-{}.json", std::process::id()));
        std::fs::write(&good, r#"{"channel_buffer": 4, "fallback_direct_rate": 30.0}"#).unwrap();
        let config = BillingConfig::load(Some(&good)).unwrap();
        assert_eq!(config.channel_buffer, 4);
        assert_eq!(config.fallback_direct_rate, 30.0);

        let bad = dir.join(format!("courier-billing-bad-{}.json", std::process::id()));
        std::fs::write(&bad, r#"{"fallback_same_day_rate": 0.0}"#).unwrap();
        let err = BillingConfig::load(Some(&bad)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        std::fs::remove_file(good).unwrap();
        std::fs::remove_file(bad).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BillingConfig::from_json_file("/nonexistent/courier-billing.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/courier-billing.json"));
    }
}
