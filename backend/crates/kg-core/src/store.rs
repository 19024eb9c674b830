//! Persistence seam for identity records.
//!
//! Implementations behave like a keyed document store with atomic
//! single-document writes. `save` is a conditional write: it only succeeds
//! when the stored record still carries the `version` the caller read, and
//! reports [`StoreError::Conflict`] otherwise. Callers resolve conflicts by
//! re-reading and re-applying their change.

use crate::Identity;

use std::result::Result as StdResult;

use async_trait::async_trait;
use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Identity {id} was modified concurrently (expected version {expected_version}) {location}")]
    Conflict {
        id: Uuid,
        expected_version: i32,
        location: ErrorLocation,
    },

    #[error("An identity with email {email} already exists {location}")]
    DuplicateEmail {
        email: String,
        location: ErrorLocation,
    },

    #[error("Identity {id} not found {location}")]
    NotFound { id: Uuid, location: ErrorLocation },

    #[error("Store backend error: {message} {location}")]
    Backend {
        message: String,
        location: ErrorLocation,
    },
}

impl StoreError {
    /// Only write races are worth retrying
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type StoreResult<T> = StdResult<T, StoreError>;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Identity>>;

    /// Case-insensitive exact match
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;

    /// Persist a new identity. Fails with `DuplicateEmail` when the email is taken.
    async fn insert(&self, identity: &Identity) -> StoreResult<Identity>;

    /// Conditionally replace the stored record.
    ///
    /// Succeeds only when the stored version equals `identity.version`; the
    /// returned record carries the incremented version.
    async fn save(&self, identity: &Identity) -> StoreResult<Identity>;
}
