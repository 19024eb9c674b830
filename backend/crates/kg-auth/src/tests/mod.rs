
use crate::{Argon2Hasher, CredentialHasher, RetryPolicy, SessionManager, SessionPolicy, TokenIssuer, TokenSettings};

use kg_core::{Identity, IdentityStore, StoreError, StoreResult};
use kg_db::MemoryIdentityStore;

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use uuid::Uuid;

pub(crate) const ACCESS_SECRET: &str = "access-secret-for-tests-0123456789abcdef";
pub(crate) const REFRESH_SECRET: &str = "refresh-secret-for-tests-0123456789abcde";
pub(crate) const PASSWORD: &str = "Abcdef1!";

pub(crate) fn token_settings() -> TokenSettings {
    TokenSettings::new(ACCESS_SECRET, REFRESH_SECRET)
}

pub(crate) fn issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(&token_settings()))
}

/// Millisecond back-off without jitter keeps retry tests fast and deterministic
pub(crate) fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

/// Minimum Argon2 cost; production parameters are far too slow for unit tests
pub(crate) fn fast_hasher() -> Arc<Argon2Hasher> {
    Arc::new(Argon2Hasher::with_params(64, 1, 1).unwrap())
}

pub(crate) fn session_manager(store: Arc<dyn IdentityStore>, max_active: usize) -> SessionManager {
    SessionManager::new(
        store,
        issuer(),
        SessionPolicy {
            max_active_sessions: max_active,
        },
        fast_retry(),
    )
}

pub(crate) async fn seed_identity(store: &MemoryIdentityStore, email: &str) -> Identity {
    let hash = fast_hasher().hash(PASSWORD).unwrap();
    store
        .insert(&Identity::new_local("Ann".to_string(), email, hash))
        .await
        .unwrap()
}

/// Store wrapper that reports a version conflict for the first `conflicts`
/// saves. Before failing it commits a competing change (an admitted
/// `interloper` token or a rival rotation) so the retry sees fresh state.
pub(crate) struct ConflictingStore {
    pub(crate) inner: MemoryIdentityStore,
    conflicts: usize,
    interloper: Option<String>,
    rival_rotation: Option<(String, String)>,
    pub(crate) saves: AtomicUsize,
}

impl ConflictingStore {
    pub(crate) fn new(inner: MemoryIdentityStore, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts,
            interloper: None,
            rival_rotation: None,
            saves: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_interloper(mut self, token: &str) -> Self {
        self.interloper = Some(token.to_string());
        self
    }

    /// Another request rotates `presented` to `winner` and commits first
    pub(crate) fn with_rival_rotation(mut self, presented: &str, winner: &str) -> Self {
        self.rival_rotation = Some((presented.to_string(), winner.to_string()));
        self
    }
}

#[async_trait]
impl IdentityStore for ConflictingStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, identity: &Identity) -> StoreResult<Identity> {
        self.inner.insert(identity).await
    }

    async fn save(&self, identity: &Identity) -> StoreResult<Identity> {
        let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
        if attempt < self.conflicts {
            if self.interloper.is_some() || self.rival_rotation.is_some() {
                let mut competing = self.inner.find_by_id(identity.id).await?.unwrap();
                if let Some(ref token) = self.interloper {
                    competing.active_refresh_tokens.admit(token.clone(), usize::MAX);
                }
                if let Some((ref presented, ref winner)) = self.rival_rotation {
                    assert!(competing.active_refresh_tokens.rotate(presented, winner.clone()));
                }
                self.inner.save(&competing).await?;
            }
            return Err(StoreError::Conflict {
                id: identity.id,
                expected_version: identity.version,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.inner.save(identity).await
    }
}

/// Store wrapper that yields to the scheduler after every read, so two
/// joined requests both load the same version before either one saves.
pub(crate) struct YieldingStore {
    pub(crate) inner: MemoryIdentityStore,
    pub(crate) conflicts: AtomicUsize,
}

impl YieldingStore {
    pub(crate) fn new(inner: MemoryIdentityStore) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityStore for YieldingStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        let found = self.inner.find_by_id(id).await;
        tokio::task::yield_now().await;
        found
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let found = self.inner.find_by_email(email).await;
        tokio::task::yield_now().await;
        found
    }

    async fn insert(&self, identity: &Identity) -> StoreResult<Identity> {
        self.inner.insert(identity).await
    }

    async fn save(&self, identity: &Identity) -> StoreResult<Identity> {
        let result = self.inner.save(identity).await;
        if matches!(result, Err(StoreError::Conflict { .. })) {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}
