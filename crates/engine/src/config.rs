//! Engine configuration.
//!
//! Defaults reproduce the standard rules. Values can be overridden from
//! `BLOCKFALL_*` environment variables or loaded from a JSON file; either way
//! the result goes through [`EngineConfig::validate`] before use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    BASE_DROP_INTERVAL_MS, DEFAULT_LOOKAHEAD, LINE_CLEAR_DELAY_MS, MAX_LOOKAHEAD,
    MIN_DROP_INTERVAL_MS, MIN_LOOKAHEAD,
};

pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_LOOKAHEAD: &str = "BLOCKFALL_LOOKAHEAD";
pub const ENV_CLEAR_DELAY_MS: &str = "BLOCKFALL_CLEAR_DELAY_MS";
pub const ENV_BASE_DROP_MS: &str = "BLOCKFALL_BASE_DROP_MS";
pub const ENV_MIN_DROP_MS: &str = "BLOCKFALL_MIN_DROP_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lookahead must be between {min} and {max}, got {value}")]
    InvalidLookahead { value: usize, min: usize, max: usize },

    #[error("minimum drop interval {min_ms}ms exceeds base interval {base_ms}ms")]
    IntervalOrder { base_ms: u32, min_ms: u32 },

    #[error("minimum drop interval must be positive")]
    ZeroInterval,

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rule and timing parameters for one engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Seeds the per-game piece sequences
    pub seed: u32,
    /// Preview length (3..=7)
    pub lookahead: usize,
    /// How long cleared rows stay on display
    pub clear_delay_ms: u32,
    pub base_drop_ms: u32,
    pub min_drop_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            lookahead: DEFAULT_LOOKAHEAD,
            clear_delay_ms: LINE_CLEAR_DELAY_MS,
            base_drop_ms: BASE_DROP_INTERVAL_MS,
            min_drop_ms: MIN_DROP_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `BLOCKFALL_*` variables that are set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`EngineConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, ENV_SEED)? {
            config.seed = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_LOOKAHEAD)? {
            config.lookahead = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_CLEAR_DELAY_MS)? {
            config.clear_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_BASE_DROP_MS)? {
            config.base_drop_ms = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_MIN_DROP_MS)? {
            config.min_drop_ms = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_LOOKAHEAD..=MAX_LOOKAHEAD).contains(&self.lookahead) {
            return Err(ConfigError::InvalidLookahead {
                value: self.lookahead,
                min: MIN_LOOKAHEAD,
                max: MAX_LOOKAHEAD,
            });
        }
        if self.min_drop_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_drop_ms > self.base_drop_ms {
            return Err(ConfigError::IntervalOrder {
                base_ms: self.base_drop_ms,
                min_ms: self.min_drop_ms,
            });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookahead, 4);
        assert_eq!(config.clear_delay_ms, 300);
        assert_eq!(config.base_drop_ms, 1000);
        assert_eq!(config.min_drop_ms, 50);
    }

    #[test]
    fn env_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_SEED, "99"),
            (ENV_LOOKAHEAD, " 6 "),
            (ENV_CLEAR_DELAY_MS, ""),
        ]))
        .unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.lookahead, 6);
        assert_eq!(config.clear_delay_ms, 300);
    }

    #[test]
    fn env_rejects_garbage() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_BASE_DROP_MS, "fast")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: ENV_BASE_DROP_MS, .. }
        ));
    }

    #[test]
    fn env_result_is_validated() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_LOOKAHEAD, "8")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLookahead { value: 8, .. }));
    }

    #[test]
    fn lookahead_below_three_rejected() {
        for lookahead in [0, 1, 2] {
            let config = EngineConfig {
                lookahead,
                ..EngineConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidLookahead { value, min: 3, max: 7 } if value == lookahead
            ));
            assert!(err.to_string().contains("between 3 and 7"));
        }
        for lookahead in 3..=7 {
            let config = EngineConfig {
                lookahead,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn interval_order_checked() {
        let config = EngineConfig {
            base_drop_ms: 40,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalOrder { base_ms: 40, min_ms: 50 })
        ));

        let config = EngineConfig {
            min_drop_ms: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn json_file_partial_fields() {
        let path =
            std::env::temp_dir().join(format!("blockfall-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "seed": 7, "clearDelayMs": 0 }"#).unwrap();
        let config = EngineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.seed, 7);
        assert_eq!(config.clear_delay_ms, 0);
        assert_eq!(config.lookahead, 4);
    }

    #[test]
    fn json_file_errors() {
        let missing = EngineConfig::from_json_file("/nonexistent/blockfall.json").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let path = std::env::temp_dir().join(format!("blockfall-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let bad = EngineConfig::from_json_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(bad, ConfigError::Json { .. }));
        assert!(bad.to_string().contains("invalid config file"));
    }
}
