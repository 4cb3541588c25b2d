//! Player configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `WAVELINE_DUCK_GAIN` | `0.2` (must be within `0.0..=1.0`) |
//! | `WAVELINE_RECONNECT_ATTEMPTS` | `1` |
//! | `WAVELINE_RECONNECT_DELAY_MS` | `0` (immediate) |
//! | `WAVELINE_ALBUM_PLAYLIST_PREFIX` | `OLAK5uy_` |

use std::str::FromStr;

use thiserror::Error;
use waveline_domain::ALBUM_PLAYLIST_PREFIX;

use crate::application::services::volume_duck::DEFAULT_DUCK_GAIN;
use crate::infrastructure::session::ReconnectPolicy;

pub const ENV_DUCK_GAIN: &str = "WAVELINE_DUCK_GAIN";
pub const ENV_RECONNECT_ATTEMPTS: &str = "WAVELINE_RECONNECT_ATTEMPTS";
pub const ENV_RECONNECT_DELAY_MS: &str = "WAVELINE_RECONNECT_DELAY_MS";
pub const ENV_ALBUM_PLAYLIST_PREFIX: &str = "WAVELINE_ALBUM_PLAYLIST_PREFIX";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Duck gain must be within 0.0..=1.0, got {0}")]
    DuckGainOutOfRange(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub duck_gain: f32,
    pub reconnect: ReconnectPolicy,
    pub album_playlist_prefix: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            duck_gain: DEFAULT_DUCK_GAIN,
            reconnect: ReconnectPolicy::default(),
            album_playlist_prefix: ALBUM_PLAYLIST_PREFIX.to_string(),
        }
    }
}

impl PlayerConfig {
    /// Load from the process environment, reading a `.env` file first if one
    /// exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let duck_gain = parse_or(&lookup, ENV_DUCK_GAIN, defaults.duck_gain)?;
        let max_attempts = parse_or(
            &lookup,
            ENV_RECONNECT_ATTEMPTS,
            defaults.reconnect.max_attempts,
        )?;
        let initial_delay_ms = parse_or(
            &lookup,
            ENV_RECONNECT_DELAY_MS,
            defaults.reconnect.initial_delay_ms,
        )?;
        let album_playlist_prefix = lookup(ENV_ALBUM_PLAYLIST_PREFIX)
            .map(|prefix| prefix.trim().to_string())
            .unwrap_or(defaults.album_playlist_prefix);

        let config = Self {
            duck_gain,
            reconnect: ReconnectPolicy {
                max_attempts,
                initial_delay_ms,
            },
            album_playlist_prefix,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.duck_gain) {
            return Err(ConfigError::DuckGainOutOfRange(self.duck_gain));
        }
        Ok(())
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: err.to_string(),
            }),
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
    fn test_empty_environment_gives_defaults() {
        let config = PlayerConfig::from_lookup(lookup(&[])).expect("valid config");

        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.duck_gain, 0.2);
        assert_eq!(config.reconnect.max_attempts, 1);
        assert_eq!(config.reconnect.initial_delay_ms, 0);
        assert_eq!(config.album_playlist_prefix, "OLAK5uy_");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = PlayerConfig::from_lookup(lookup(&[
            (ENV_DUCK_GAIN, "0.35"),
            (ENV_RECONNECT_ATTEMPTS, "3"),
            (ENV_RECONNECT_DELAY_MS, " 250 "),
            (ENV_ALBUM_PLAYLIST_PREFIX, "ALB_"),
        ]))
        .expect("valid config");

        assert_eq!(config.duck_gain, 0.35);
        assert_eq!(
            config.reconnect,
            ReconnectPolicy {
                max_attempts: 3,
                initial_delay_ms: 250
            }
        );
        assert_eq!(config.album_playlist_prefix, "ALB_");
    }

    #[test]
    fn test_duck_gain_out_of_range_is_rejected() {
        let result = PlayerConfig::from_lookup(lookup(&[(ENV_DUCK_GAIN, "1.5")]));

        assert_eq!(result, Err(ConfigError::DuckGainOutOfRange(1.5)));
    }

    #[test]
    fn test_unparseable_value_names_the_key() {
        let result = PlayerConfig::from_lookup(lookup(&[(ENV_RECONNECT_ATTEMPTS, "many")]));

        match result {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, ENV_RECONNECT_ATTEMPTS);
                assert_eq!(value, "many");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
