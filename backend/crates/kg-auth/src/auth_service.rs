//! The operations exposed to callers: register, login, refresh, logout and
//! federated login, plus bearer authentication for ordinary requests.

use crate::{
    AuthError, CredentialHasher, CredentialVerifier, IdentityMergeResolver, MergeOutcome,
    Result as AuthErrorResult, RetryPolicy, SessionManager, SessionPolicy, TokenIssuer,
    TokenSettings,
};

use kg_core::validation::{validate_email, validate_name, validate_new_password, validate_required};
use kg_core::{
    FederatedProfile, Identity, IdentityStore, PublicIdentity, Role, StoreError, TokenPair,
    normalize_email,
};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::info;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: PublicIdentity,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginResponse {
    pub user: PublicIdentity,
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub outcome: MergeOutcome,
}

pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: Arc<TokenIssuer>,
    verifier: CredentialVerifier,
    sessions: SessionManager,
    resolver: IdentityMergeResolver,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: &TokenSettings,
        sessions: SessionPolicy,
        retry: RetryPolicy,
    ) -> Self {
        let issuer = Arc::new(TokenIssuer::new(tokens));

        Self {
            verifier: CredentialVerifier::new(store.clone(), hasher.clone()),
            sessions: SessionManager::new(store.clone(), issuer.clone(), sessions, retry.clone()),
            resolver: IdentityMergeResolver::new(store.clone(), retry),
            store,
            hasher,
            issuer,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> AuthErrorResult<AuthResponse> {
        validate_name(name)?;
        validate_email(email)?;
        validate_new_password(password)?;

        let email = normalize_email(email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let password_hash = self.hasher.hash(password)?;
        let identity = Identity::new_local(name.trim().to_string(), &email, password_hash);

        let identity = match self.store.insert(&identity).await {
            Ok(identity) => identity,
            Err(StoreError::DuplicateEmail { .. }) => {
                return Err(AuthError::EmailTaken {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => return Err(e.into()),
        };
        info!("Registered identity {}", identity.id);

        let grant = self.sessions.begin_session(&identity).await?;
        Ok(AuthResponse {
            user: PublicIdentity::from(&grant.identity),
            tokens: grant.tokens,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthErrorResult<AuthResponse> {
        validate_email(email)?;
        validate_required("password", password)?;

        let identity = self.verifier.login(email, password).await?;
        let grant = self.sessions.begin_session(&identity).await?;

        Ok(AuthResponse {
            user: PublicIdentity::from(&grant.identity),
            tokens: grant.tokens,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> AuthErrorResult<TokenPair> {
        validate_required("refreshToken", refresh_token)?;

        let grant = self.sessions.rotate_session(refresh_token).await?;
        Ok(grant.tokens)
    }

    /// Always succeeds; a token that is absent or already retired is ignored
    pub async fn logout(&self, identity_id: Uuid, refresh_token: Option<&str>) {
        self.sessions.end_session(identity_id, refresh_token).await;
    }

    pub async fn federated_login(
        &self,
        profile: &FederatedProfile,
    ) -> AuthErrorResult<FederatedLoginResponse> {
        let resolution = self.resolver.resolve(profile).await?;
        let grant = self.sessions.begin_session(&resolution.identity).await?;

        Ok(FederatedLoginResponse {
            user: PublicIdentity::from(&grant.identity),
            tokens: grant.tokens,
            outcome: resolution.outcome,
        })
    }

    /// Resolve the identity behind an access token
    pub async fn authenticate(&self, access_token: &str) -> AuthErrorResult<Identity> {
        let claims = self.issuer.verify_access_token(access_token)?;
        let identity_id = claims.identity_id()?;

        self.store
            .find_by_id(identity_id)
            .await?
            .ok_or_else(|| AuthError::invalid_token("identity no longer exists"))
    }

    pub async fn current_user(&self, access_token: &str) -> AuthErrorResult<PublicIdentity> {
        let identity = self.authenticate(access_token).await?;
        Ok(PublicIdentity::from(identity))
    }

    /// An empty `allowed` list admits every role
    #[track_caller]
    pub fn authorize(identity: &Identity, allowed: &[Role]) -> AuthErrorResult<()> {
        if allowed.is_empty() || allowed.contains(&identity.role) {
            return Ok(());
        }

        Err(AuthError::Forbidden {
            message: String::from("You do not have permission to perform this action"),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
