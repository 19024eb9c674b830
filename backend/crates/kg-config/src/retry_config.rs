use crate::{ConfigError, ConfigErrorResult};

use std::ops::RangeInclusive;

use serde::Deserialize;

const ATTEMPTS: RangeInclusive<u64> = 1..=20;
const INITIAL_DELAY_MS: RangeInclusive<u64> = 1..=1000;

/// Tuning for re-running identity writes that lost a version race.
///
/// Back-off cap and growth factor are fixed by the auth service; only the
/// budget, the first pause and jitter are exposed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total tries, the first one included
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 10,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let bounded = [
            ("retry.max_attempts", u64::from(self.max_attempts), ATTEMPTS),
            ("retry.initial_delay_ms", self.initial_delay_ms, INITIAL_DELAY_MS),
        ];

        for (key, value, bounds) in bounded {
            if !bounds.contains(&value) {
                return Err(ConfigError::out_of_range(key, &bounds, value));
            }
        }

        Ok(())
    }
}
