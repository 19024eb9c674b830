//! Refresh-token admission, rotation and revocation.
//!
//! The identity's `active_refresh_tokens` list is the only record of which
//! refresh tokens are live. Every change to it is a read-modify-write
//! committed with a version-checked save; a lost race re-reads and re-applies
//! through [`with_retry`].

use crate::{
    AuthError, AuthMetrics, Result as AuthErrorResult, RetryPolicy, TokenIssuer, with_retry,
};

use kg_core::{Identity, IdentityStore, StoreError, TokenPair};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_MAX_ACTIVE_SESSIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Refresh tokens kept per identity; the oldest is evicted beyond this
    pub max_active_sessions: usize,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_active_sessions: DEFAULT_MAX_ACTIVE_SESSIONS,
        }
    }
}

/// Identity as persisted after the session change, plus the new tokens
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub identity: Identity,
    pub tokens: TokenPair,
}

pub struct SessionManager {
    store: Arc<dyn IdentityStore>,
    issuer: Arc<TokenIssuer>,
    policy: SessionPolicy,
    retry: RetryPolicy,
    metrics: AuthMetrics,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        issuer: Arc<TokenIssuer>,
        policy: SessionPolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            issuer,
            policy,
            retry,
            metrics: AuthMetrics::new(),
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Start a new session: issue a token pair and admit the refresh token,
    /// evicting the oldest sessions beyond the cap.
    pub async fn begin_session(&self, identity: &Identity) -> AuthErrorResult<SessionGrant> {
        let identity_id = identity.id;
        let tokens = self.issuer.issue_pair(identity_id)?;
        let refresh_token = tokens.refresh_token.as_str();
        let max_active = self.policy.max_active_sessions;

        let result: AuthErrorResult<(Identity, usize)> =
            with_retry(&self.retry, "begin_session", || async move {
                let mut current = self.store.find_by_id(identity_id).await?.ok_or_else(|| {
                    StoreError::NotFound {
                        id: identity_id,
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;

                let evicted = current
                    .active_refresh_tokens
                    .admit(refresh_token.to_string(), max_active);
                current.touch();

                let saved = self.store.save(&current).await?;
                Ok((saved, evicted.len()))
            })
            .await;
        let (saved, evicted) = result?;

        self.metrics.session_admitted();
        self.metrics.sessions_evicted(evicted);
        if evicted > 0 {
            debug!(
                "Identity {} at session cap {}: evicted {} oldest session(s)",
                identity_id, max_active, evicted
            );
        }
        info!(
            "Session started for identity {} ({} active)",
            identity_id,
            saved.active_refresh_tokens.len()
        );

        Ok(SessionGrant {
            identity: saved,
            tokens,
        })
    }

    /// Exchange a live refresh token for a new pair. The presented token is
    /// retired in the same write that admits its replacement.
    pub async fn rotate_session(&self, presented: &str) -> AuthErrorResult<SessionGrant> {
        let claims = self.issuer.verify_refresh_token(presented)?;
        let identity_id = claims.identity_id()?;

        // Both tokens are signed before the write commits
        let tokens = self.issuer.issue_pair(identity_id)?;
        let replacement_ref = tokens.refresh_token.as_str();

        let result: AuthErrorResult<Identity> =
            with_retry(&self.retry, "rotate_session", || async move {
                let mut current = self
                    .store
                    .find_by_id(identity_id)
                    .await?
                    .ok_or_else(|| AuthError::invalid_token("identity no longer exists"))?;

                if !current
                    .active_refresh_tokens
                    .rotate(presented, replacement_ref.to_string())
                {
                    return Err(AuthError::invalid_token("refresh token is not active"));
                }
                current.touch();

                Ok(self.store.save(&current).await?)
            })
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                if matches!(e, AuthError::InvalidToken { .. }) {
                    self.metrics.replay_rejected();
                    warn!(
                        "Refresh rejected for identity {}: token not active",
                        identity_id
                    );
                }
                return Err(e);
            }
        };

        self.metrics.session_rotated();
        debug!("Session rotated for identity {}", identity_id);

        Ok(SessionGrant {
            identity: saved,
            tokens,
        })
    }

    /// Retire one refresh token. Idempotent and infallible from the caller's
    /// point of view; returns whether a token was actually removed.
    pub async fn end_session(&self, identity_id: Uuid, refresh_token: Option<&str>) -> bool {
        let Some(token) = refresh_token else {
            debug!("Logout for identity {} without a refresh token", identity_id);
            return false;
        };

        let result: AuthErrorResult<bool> =
            with_retry(&self.retry, "end_session", || async move {
                let Some(mut current) = self.store.find_by_id(identity_id).await? else {
                    return Ok(false);
                };

                if !current.active_refresh_tokens.remove(token) {
                    return Ok(false);
                }
                current.touch();

                self.store.save(&current).await?;
                Ok(true)
            })
            .await;

        match result {
            Ok(true) => {
                self.metrics.session_revoked();
                info!("Session ended for identity {}", identity_id);
                true
            }
            Ok(false) => {
                debug!(
                    "Logout for identity {}: token was not active",
                    identity_id
                );
                false
            }
            Err(e) => {
                warn!(
                    "Logout for identity {} could not persist: {}",
                    identity_id, e
                );
                false
            }
        }
    }
}
