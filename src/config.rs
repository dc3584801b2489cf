use crate::domain::Decimal;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub session_file: String,
    pub engine: EngineConfig,
}

/// Tunables for the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Balances within `epsilon` of zero count as settled.
    pub epsilon: Decimal,
    /// Decimal places transfer amounts are rounded to.
    pub currency_scale: u32,
    pub match_order: MatchOrder,
    /// Reject the whole recompute when any pinned transfer is invalid.
    pub strict_pins: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::from_minor(1, 2),
            currency_scale: 2,
            match_order: MatchOrder::Magnitude,
            strict_pins: true,
        }
    }
}

/// Order in which creditors and debtors are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOrder {
    /// Largest magnitudes first (stable for ties).
    Magnitude,
    /// Order players were supplied.
    Insertion,
}

const MAX_CURRENCY_SCALE: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let session_file = env_map
            .get("SESSION_FILE")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("SESSION_FILE".to_string()))?;

        Ok(Config {
            session_file,
            engine: EngineConfig::from_env_map(&env_map)?,
        })
    }
}

impl EngineConfig {
    pub fn from_env_map(env_map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = EngineConfig::default();

        let epsilon = match env_map.get("SETTLE_EPSILON") {
            Some(raw) => {
                let value = Decimal::from_str_canonical(raw.trim()).map_err(|_| {
                    ConfigError::InvalidValue(
                        "SETTLE_EPSILON".to_string(),
                        "must be a decimal number".to_string(),
                    )
                })?;
                if value.is_negative() {
                    return Err(ConfigError::InvalidValue(
                        "SETTLE_EPSILON".to_string(),
                        "must not be negative".to_string(),
                    ));
                }
                value
            }
            None => defaults.epsilon,
        };

        let currency_scale = match env_map.get("SETTLE_CURRENCY_SCALE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|scale| *scale <= MAX_CURRENCY_SCALE)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "SETTLE_CURRENCY_SCALE".to_string(),
                        format!("must be an integer between 0 and {}", MAX_CURRENCY_SCALE),
                    )
                })?,
            None => defaults.currency_scale,
        };

        let match_order = match env_map
            .get("SETTLE_MATCH_ORDER")
            .map(|s| s.as_str())
            .unwrap_or("magnitude")
        {
            "magnitude" => MatchOrder::Magnitude,
            "insertion" => MatchOrder::Insertion,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SETTLE_MATCH_ORDER".to_string(),
                    format!("must be magnitude or insertion, got {}", other),
                ))
            }
        };

        let strict_pins = match env_map
            .get("SETTLE_STRICT_PINS")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SETTLE_STRICT_PINS".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(EngineConfig {
            epsilon,
            currency_scale,
            match_order,
            strict_pins,
        })
    }
}
