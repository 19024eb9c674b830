use std::ops::RangeInclusive;
use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Startup configuration failure
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting is missing or unusable; `key` is its dotted TOML path
    #[error("{key}: {reason} {location}")]
    Invalid {
        key: &'static str,
        reason: String,
        location: ErrorLocation,
    },

    #[error("{path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn out_of_range(key: &'static str, bounds: &RangeInclusive<u64>, got: u64) -> Self {
        Self::invalid(
            key,
            format!(
                "must be between {} and {}, got {}",
                bounds.start(),
                bounds.end(),
                got
            ),
        )
    }

    /// Dotted key of the rejected setting
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::Invalid { key, .. } => Some(*key),
            _ => None,
        }
    }
}

pub type ConfigErrorResult<T> = Result<T, ConfigError>;
