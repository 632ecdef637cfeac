//! Client configuration: TOML file, environment overrides, validation.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

/// Tunable parameters of the paribet core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParibetConfig {
    /// Site identifier embedded in every memo; scans filter on it.
    pub site: String,
    /// History page size for the ledger scanner.
    pub page_size: usize,
    /// Attempts per history page before the scan gives up.
    pub max_page_attempts: u32,
    /// Hard confirmation-wait bound. After this the submission outcome is
    /// reported as unknown, not failed.
    pub confirm_timeout_ms: u64,
    pub confirm_poll_interval_ms: u64,
    /// Fixed per-bet service fee, in smallest units.
    pub service_fee: Money,
    /// On-ledger size of a bet account, for the rent-exemption estimate.
    pub bet_account_size: usize,
    /// Maximum simultaneous open bets per bettor per game.
    pub max_open_bets: u64,
}

impl Default for ParibetConfig {
    fn default() -> Self {
        Self {
            site: "paribet".to_string(),
            page_size: 1000,
            max_page_attempts: 3,
            confirm_timeout_ms: 30_000,
            confirm_poll_interval_ms: 1_000,
            service_fee: Money::from_units(1_000_000),
            bet_account_size: 128,
            max_open_bets: 10,
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ParibetConfig {
    /// Load from an optional TOML file, apply `PARIBET_*` environment
    /// overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::LoadFailed(format!("failed to read {}: {}", path.display(), e))
                })?;
                toml::from_str(&content)
                    .map_err(|e| ConfigError::LoadFailed(format!("failed to parse TOML: {}", e)))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty TOML, e.g. to generate a sample config file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("failed to serialize: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            ConfigError::SaveFailed(format!("failed to write {}: {}", path.display(), e))
        })
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(site) = env::var("PARIBET_SITE") {
            self.site = site;
        }
        if let Ok(value) = env::var("PARIBET_PAGE_SIZE") {
            self.page_size = parse_env("PARIBET_PAGE_SIZE", &value)?;
        }
        if let Ok(value) = env::var("PARIBET_MAX_PAGE_ATTEMPTS") {
            self.max_page_attempts = parse_env("PARIBET_MAX_PAGE_ATTEMPTS", &value)?;
        }
        if let Ok(value) = env::var("PARIBET_CONFIRM_TIMEOUT_MS") {
            self.confirm_timeout_ms = parse_env("PARIBET_CONFIRM_TIMEOUT_MS", &value)?;
        }
        if let Ok(value) = env::var("PARIBET_CONFIRM_POLL_INTERVAL_MS") {
            self.confirm_poll_interval_ms = parse_env("PARIBET_CONFIRM_POLL_INTERVAL_MS", &value)?;
        }
        if let Ok(value) = env::var("PARIBET_SERVICE_FEE") {
            // Smallest units, matching the TOML representation.
            self.service_fee = Money::from_units(parse_env("PARIBET_SERVICE_FEE", &value)?);
        }
        if let Ok(value) = env::var("PARIBET_BET_ACCOUNT_SIZE") {
            self.bet_account_size = parse_env("PARIBET_BET_ACCOUNT_SIZE", &value)?;
        }
        if let Ok(value) = env::var("PARIBET_MAX_OPEN_BETS") {
            self.max_open_bets = parse_env("PARIBET_MAX_OPEN_BETS", &value)?;
        }
        Ok(())
    }

    /// Reject configurations the scanner or submitter cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "site".to_string(),
                value: String::new(),
                reason: "site identifier cannot be empty".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size".to_string(),
                value: "0".to_string(),
                reason: "page size cannot be zero".to_string(),
            });
        }
        if self.max_page_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_page_attempts".to_string(),
                value: "0".to_string(),
                reason: "at least one page attempt is required".to_string(),
            });
        }
        if self.confirm_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "confirm_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "confirmation timeout cannot be zero".to_string(),
            });
        }
        if self.confirm_poll_interval_ms == 0
            || self.confirm_poll_interval_ms > self.confirm_timeout_ms
        {
            return Err(ConfigError::InvalidValue {
                field: "confirm_poll_interval_ms".to_string(),
                value: self.confirm_poll_interval_ms.to_string(),
                reason: "poll interval must be nonzero and within the timeout".to_string(),
            });
        }
        if self.max_open_bets == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_open_bets".to_string(),
                value: "0".to_string(),
                reason: "bet limit cannot be zero".to_string(),
            });
        }
        if self.service_fee < Money::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "service_fee".to_string(),
                value: self.service_fee.to_string(),
                reason: "service fee cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "not a valid number".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Environment variables are process-global; tests that set or read them
    // through `load` serialize on this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_are_valid() {
        let config = ParibetConfig::default();
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.confirm_timeout_ms, 30_000);
        assert_eq!(config.max_open_bets, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_page_size() {
        let mut config = ParibetConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_poll_interval_beyond_timeout() {
        let mut config = ParibetConfig::default();
        config.confirm_timeout_ms = 100;
        config.confirm_poll_interval_ms = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_cover_every_numeric_knob() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("PARIBET_SITE", "derby");
        env::set_var("PARIBET_PAGE_SIZE", "500");
        env::set_var("PARIBET_MAX_PAGE_ATTEMPTS", "5");
        env::set_var("PARIBET_CONFIRM_TIMEOUT_MS", "10000");
        env::set_var("PARIBET_CONFIRM_POLL_INTERVAL_MS", "250");
        env::set_var("PARIBET_SERVICE_FEE", "77");
        env::set_var("PARIBET_BET_ACCOUNT_SIZE", "256");
        env::set_var("PARIBET_MAX_OPEN_BETS", "4");

        let loaded = ParibetConfig::load(None);

        for key in [
            "PARIBET_SITE",
            "PARIBET_PAGE_SIZE",
            "PARIBET_MAX_PAGE_ATTEMPTS",
            "PARIBET_CONFIRM_TIMEOUT_MS",
            "PARIBET_CONFIRM_POLL_INTERVAL_MS",
            "PARIBET_SERVICE_FEE",
            "PARIBET_BET_ACCOUNT_SIZE",
            "PARIBET_MAX_OPEN_BETS",
        ] {
            env::remove_var(key);
        }

        let loaded = loaded.unwrap();
        assert_eq!(loaded.site, "derby");
        assert_eq!(loaded.page_size, 500);
        assert_eq!(loaded.max_page_attempts, 5);
        assert_eq!(loaded.confirm_timeout_ms, 10_000);
        assert_eq!(loaded.confirm_poll_interval_ms, 250);
        assert_eq!(loaded.service_fee, Money::from_units(77));
        assert_eq!(loaded.bet_account_size, 256);
        assert_eq!(loaded.max_open_bets, 4);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let _guard = ENV_LOCK.lock().unwrap();
        let file = NamedTempFile::new().unwrap();
        let mut original = ParibetConfig::default();
        original.site = "derby".to_string();
        original.service_fee = Money::from_units(42);
        original.save(file.path()).unwrap();

        let loaded = ParibetConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.site, "derby");
        assert_eq!(loaded.service_fee, Money::from_units(42));
        assert_eq!(loaded.page_size, original.page_size);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "site = \"derby\"\n").unwrap();
        let loaded = ParibetConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.site, "derby");
        assert_eq!(loaded.page_size, 1000);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = ParibetConfig::load(Some(Path::new("/nonexistent/paribet.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed(_)));
    }
}
