use crate::error::Result as ServerErrorResult;

use kg_auth::{Argon2Hasher, AuthService, RetryPolicy, SessionPolicy, TokenSettings};
use kg_config::{Config, ConfigError};
use kg_core::IdentityStore;

use std::sync::Arc;
use std::time::Duration;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    /// Bearer secret of the identity-provider bridge; `None` disables
    /// federated login over HTTP.
    pub federation_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(auth: AuthService, federation_secret: Option<String>) -> Self {
        Self {
            auth: Arc::new(auth),
            federation_secret: federation_secret.map(Arc::from),
        }
    }

    /// Wire the auth service from validated configuration
    pub fn from_config(config: &Config, store: Arc<dyn IdentityStore>) -> ServerErrorResult<Self> {
        let auth = AuthService::new(
            store,
            Arc::new(Argon2Hasher::new()),
            &token_settings(config)?,
            session_policy(config),
            retry_policy(config),
        );

        Ok(Self::new(auth, config.auth.federation_secret.clone()))
    }
}

pub fn token_settings(config: &Config) -> ServerErrorResult<TokenSettings> {
    let access_secret = config
        .auth
        .access_token_secret
        .clone()
        .ok_or_else(|| ConfigError::invalid("auth.access_token_secret", "is required"))?;
    let refresh_secret = config
        .auth
        .refresh_token_secret
        .clone()
        .ok_or_else(|| ConfigError::invalid("auth.refresh_token_secret", "is required"))?;

    Ok(TokenSettings {
        access_secret,
        refresh_secret,
        access_ttl: config.auth.access_token_ttl()?,
        refresh_ttl: config.auth.refresh_token_ttl()?,
    })
}

pub fn session_policy(config: &Config) -> SessionPolicy {
    SessionPolicy {
        max_active_sessions: config.session.max_active_sessions,
    }
}

pub fn retry_policy(config: &Config) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.retry.max_attempts,
        initial_delay: Duration::from_millis(config.retry.initial_delay_ms),
        jitter: config.retry.jitter,
        ..RetryPolicy::default()
    }
}
