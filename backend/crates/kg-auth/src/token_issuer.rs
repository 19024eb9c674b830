//! Mints and checks the two kinds of bearer token.
//!
//! Access and refresh tokens are HS256 JWTs signed with independent secrets,
//! so a token of one kind never verifies as the other. Every verification
//! failure collapses into [`AuthError::InvalidToken`].

use crate::{AuthError, Claims, Result as AuthErrorResult};

use kg_core::TokenPair;

use std::panic::Location;
use std::time::Duration;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

const CLOCK_SKEW_LEEWAY_SECS: u64 = 30;
const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    /// Settings with the default lifetimes (1 day access, 30 days refresh)
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }
}

pub struct TokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;

        Self {
            access: SigningKeys::new(&settings.access_secret, settings.access_ttl),
            refresh: SigningKeys::new(&settings.refresh_secret, settings.refresh_ttl),
            validation,
        }
    }

    #[track_caller]
    pub fn issue_access_token(&self, identity_id: Uuid) -> AuthErrorResult<String> {
        Self::sign(&self.access, identity_id)
    }

    #[track_caller]
    pub fn issue_refresh_token(&self, identity_id: Uuid) -> AuthErrorResult<String> {
        Self::sign(&self.refresh, identity_id)
    }

    #[track_caller]
    pub fn issue_pair(&self, identity_id: Uuid) -> AuthErrorResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access_token(identity_id)?,
            refresh_token: self.issue_refresh_token(identity_id)?,
        })
    }

    #[track_caller]
    pub fn verify_access_token(&self, token: &str) -> AuthErrorResult<Claims> {
        self.verify(&self.access, token)
    }

    #[track_caller]
    pub fn verify_refresh_token(&self, token: &str) -> AuthErrorResult<Claims> {
        self.verify(&self.refresh, token)
    }

    #[track_caller]
    fn sign(keys: &SigningKeys, identity_id: Uuid) -> AuthErrorResult<String> {
        let claims = Claims::new(identity_id, Utc::now().timestamp(), keys.ttl_secs);

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
            AuthError::TokenSigning {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn verify(&self, keys: &SigningKeys, token: &str) -> AuthErrorResult<Claims> {
        let token_data = decode::<Claims>(token, &keys.decoding, &self.validation)
            .map_err(|e| AuthError::invalid_token(e.to_string()))?;

        // Reject tokens whose subject is not an identity id up front
        token_data.claims.identity_id()?;

        Ok(token_data.claims)
    }
}
