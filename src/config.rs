use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_batch_size: usize,
    pub step_delay: Duration,
    pub conflict_policy: ConflictPolicy,
    pub rng_seed: Option<u64>,
}

/// What to do when a resolved floor lies above the resolved ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail the batch before any line is computed.
    #[default]
    Reject,
    /// Clamp anyway; the ceiling wins.
    PreferCeiling,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

impl Default for Config {
    fn default() -> Self {
        Config {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            step_delay: Duration::ZERO,
            conflict_policy: ConflictPolicy::Reject,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let max_batch_size = env_map
            .get("MAX_BATCH_SIZE")
            .map(|s| s.as_str())
            .unwrap_or("50")
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MAX_BATCH_SIZE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let step_delay_ms = env_map
            .get("BATCH_STEP_DELAY_MS")
            .map(|s| s.as_str())
            .unwrap_or("0")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BATCH_STEP_DELAY_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let conflict_policy = match env_map
            .get("CONSTRAINT_CONFLICT_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("reject")
        {
            "reject" => ConflictPolicy::Reject,
            "prefer_ceiling" => ConflictPolicy::PreferCeiling,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CONSTRAINT_CONFLICT_POLICY".to_string(),
                    format!("must be reject or prefer_ceiling, got {}", other),
                ))
            }
        };

        let rng_seed = match env_map.get("MARKUP_RNG_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "MARKUP_RNG_SEED".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?),
            None => None,
        };

        Ok(Config {
            max_batch_size,
            step_delay: Duration::from_millis(step_delay_ms),
            conflict_policy,
            rng_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_batch_size, 50);
    }

    #[test]
    fn test_all_values() {
        let config = Config::from_env_map(env(&[
            ("MAX_BATCH_SIZE", "10"),
            ("BATCH_STEP_DELAY_MS", "250"),
            ("CONSTRAINT_CONFLICT_POLICY", "prefer_ceiling"),
            ("MARKUP_RNG_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.step_delay, Duration::from_millis(250));
        assert_eq!(config.conflict_policy, ConflictPolicy::PreferCeiling);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        match Config::from_env_map(env(&[("MAX_BATCH_SIZE", "0")])) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MAX_BATCH_SIZE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_step_delay() {
        match Config::from_env_map(env(&[("BATCH_STEP_DELAY_MS", "soon")])) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "BATCH_STEP_DELAY_MS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_conflict_policy() {
        match Config::from_env_map(env(&[("CONSTRAINT_CONFLICT_POLICY", "guess")])) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "CONSTRAINT_CONFLICT_POLICY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_seed() {
        match Config::from_env_map(env(&[("MARKUP_RNG_SEED", "-1")])) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MARKUP_RNG_SEED"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
