//! In-process identity store with the same conditional-write semantics as
//! the SQLite store. Used by tests and for running the server without disk.

use kg_core::{Identity, IdentityStore, StoreError, StoreResult, normalize_email};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>> {
        Ok(self.identities.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let email = normalize_email(email);
        let identities = self.identities.read().await;

        Ok(identities
            .values()
            .find(|identity| identity.email == email)
            .cloned())
    }

    async fn insert(&self, identity: &Identity) -> StoreResult<Identity> {
        let mut stored = identity.clone();
        stored.email = normalize_email(&identity.email);

        let mut identities = self.identities.write().await;
        if identities.values().any(|existing| existing.email == stored.email) {
            return Err(StoreError::DuplicateEmail {
                email: stored.email,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        identities.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, identity: &Identity) -> StoreResult<Identity> {
        let mut stored = identity.clone();
        stored.email = normalize_email(&identity.email);

        let mut identities = self.identities.write().await;

        let Some(current) = identities.get(&identity.id) else {
            return Err(StoreError::NotFound {
                id: identity.id,
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if current.version != identity.version {
            return Err(StoreError::Conflict {
                id: identity.id,
                expected_version: identity.version,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if identities
            .values()
            .any(|other| other.id != stored.id && other.email == stored.email)
        {
            return Err(StoreError::DuplicateEmail {
                email: stored.email,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        stored.version = identity.version + 1;
        identities.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
