use crate::{ConfigError, ConfigErrorResult, DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL};

use std::time::Duration;

use serde::Deserialize;

/// HS256 secrets shorter than this are rejected
pub const MIN_SECRET_LENGTH: usize = 32;

/// Token signing settings.
///
/// Access and refresh tokens are signed with independent secrets so that
/// leaking one cannot be used to mint the other kind. TTLs use humantime
/// syntax ("15m", "1d", "30d").
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_secret: Option<String>,
    pub refresh_token_secret: Option<String>,
    pub access_token_ttl: String,
    pub refresh_token_ttl: String,
    /// Shared secret for the identity-provider bridge. Federated login is
    /// not exposed over HTTP when unset.
    pub federation_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: None,
            refresh_token_secret: None,
            access_token_ttl: String::from(DEFAULT_ACCESS_TOKEN_TTL),
            refresh_token_ttl: String::from(DEFAULT_REFRESH_TOKEN_TTL),
            federation_secret: None,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let access = Self::require_secret("auth.access_token_secret", &self.access_token_secret)?;
        let refresh =
            Self::require_secret("auth.refresh_token_secret", &self.refresh_token_secret)?;

        if access == refresh {
            return Err(ConfigError::invalid(
                "auth.refresh_token_secret",
                "must differ from auth.access_token_secret",
            ));
        }

        if let Some(ref secret) = self.federation_secret
            && secret.len() < MIN_SECRET_LENGTH
        {
            return Err(ConfigError::invalid(
                "auth.federation_secret",
                format!("must be at least {} characters", MIN_SECRET_LENGTH),
            ));
        }

        let access_ttl = self.access_token_ttl()?;
        let refresh_ttl = self.refresh_token_ttl()?;

        if access_ttl.is_zero() {
            return Err(ConfigError::invalid("auth.access_token_ttl", "must be positive"));
        }

        if refresh_ttl <= access_ttl {
            return Err(ConfigError::invalid(
                "auth.refresh_token_ttl",
                format!(
                    "{} must be longer than auth.access_token_ttl ({})",
                    self.refresh_token_ttl, self.access_token_ttl
                ),
            ));
        }

        Ok(())
    }

    pub fn access_token_ttl(&self) -> ConfigErrorResult<Duration> {
        Self::parse_ttl("auth.access_token_ttl", &self.access_token_ttl)
    }

    pub fn refresh_token_ttl(&self) -> ConfigErrorResult<Duration> {
        Self::parse_ttl("auth.refresh_token_ttl", &self.refresh_token_ttl)
    }

    fn parse_ttl(key: &'static str, value: &str) -> ConfigErrorResult<Duration> {
        humantime::parse_duration(value)
            .map_err(|e| ConfigError::invalid(key, format!("'{}' is not a duration: {}", value, e)))
    }

    fn require_secret<'a>(
        key: &'static str,
        secret: &'a Option<String>,
    ) -> ConfigErrorResult<&'a str> {
        match secret {
            None => Err(ConfigError::invalid(key, "is required")),
            Some(s) if s.len() < MIN_SECRET_LENGTH => Err(ConfigError::invalid(
                key,
                format!("must be at least {} characters", MIN_SECRET_LENGTH),
            )),
            Some(s) => Ok(s.as_str()),
        }
    }
}
