use crate::{ConfigError, ConfigErrorResult};

use std::ops::RangeInclusive;

use serde::Deserialize;

const MAX_ACTIVE_SESSIONS: RangeInclusive<u64> = 1..=100;
const DEFAULT_MAX_ACTIVE_SESSIONS: usize = 5;

/// Per-identity session admission settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Refresh tokens kept per identity; the oldest is evicted beyond this
    pub max_active_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: DEFAULT_MAX_ACTIVE_SESSIONS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let value = self.max_active_sessions as u64;
        if !MAX_ACTIVE_SESSIONS.contains(&value) {
            return Err(ConfigError::out_of_range(
                "session.max_active_sessions",
                &MAX_ACTIVE_SESSIONS,
                value,
            ));
        }

        Ok(())
    }
}
