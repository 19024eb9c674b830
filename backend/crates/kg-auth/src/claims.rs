use crate::{AuthError, Result as AuthErrorResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload shared by access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: String,
    /// Issued at timestamp (Unix)
    pub iat: i64,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Unique token id; keeps same-second tokens distinct
    pub jti: String,
}

impl Claims {
    pub fn new(identity_id: Uuid, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: identity_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[track_caller]
    pub fn identity_id(&self) -> AuthErrorResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::invalid_token("sub is not an identity id"))
    }
}
