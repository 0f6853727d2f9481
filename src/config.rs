use crate::domain::FeeRate;
use crate::engine::FeeSchedule;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub fee_schedule: FeeSchedule,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            fee_schedule: FeeSchedule::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = FeeSchedule::default();

        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let short_term_rate =
            parse_rate(&env_map, "SERVICE_FEE_SHORT_TERM_RATE", defaults.short_term_rate)?;
        let long_term_rate =
            parse_rate(&env_map, "SERVICE_FEE_LONG_TERM_RATE", defaults.long_term_rate)?;

        let long_term_min_periods = match env_map.get("SERVICE_FEE_THRESHOLD_PERIODS") {
            Some(raw) => raw.trim().parse::<usize>().ok().filter(|n| *n >= 1).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SERVICE_FEE_THRESHOLD_PERIODS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?,
            None => defaults.long_term_min_periods,
        };

        if long_term_rate > short_term_rate {
            return Err(ConfigError::InvalidValue(
                "SERVICE_FEE_LONG_TERM_RATE".to_string(),
                format!(
                    "must not exceed the short-term rate {}, got {}",
                    short_term_rate, long_term_rate
                ),
            ));
        }

        Ok(Config {
            port,
            fee_schedule: FeeSchedule {
                short_term_rate,
                long_term_rate,
                long_term_min_periods,
            },
        })
    }
}

/// Parse a fee rate in `[0, 1)`, falling back to `default` when unset.
fn parse_rate(
    env_map: &HashMap<String, String>,
    key: &str,
    default: FeeRate,
) -> Result<FeeRate, ConfigError> {
    let Some(raw) = env_map.get(key) else {
        return Ok(default);
    };

    let rate = FeeRate::parse(raw.trim())
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), "must be a decimal".to_string()))?;

    if !rate.is_fraction() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be in [0, 1), got {}", raw),
        ));
    }
    Ok(rate)
}
