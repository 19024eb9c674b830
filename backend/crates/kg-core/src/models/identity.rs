//! Identity entity - the account record shared by password and federated sign-in.

use crate::{ActiveSessions, AuthProvider, FederatedProfile, Role};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored in place of a password hash for identities created by a federated
/// login. It is not a valid PHC string, so it can never verify.
pub const FEDERATED_PASSWORD_SENTINEL: &str = "OAuth";

/// Canonical form of an email used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lower-case); unique across identities
    pub email: String,
    pub password_hash: String,
    pub auth_provider: AuthProvider,
    /// External subject id, set once when a federated login is first linked
    pub federated_provider_id: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub picture_url: Option<String>,
    pub email_verified: bool,
    pub active_refresh_tokens: ActiveSessions,
    /// Optimistic locking version
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a password identity. `password_hash` must already be hashed.
    pub fn new_local(name: String, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email: normalize_email(email),
            password_hash,
            auth_provider: AuthProvider::Local,
            federated_provider_id: None,
            role: Role::default(),
            phone: None,
            picture_url: None,
            email_verified: false,
            active_refresh_tokens: ActiveSessions::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a federated-only identity from a verified provider profile.
    ///
    /// The caller is responsible for rejecting profiles without an email.
    pub fn new_federated(profile: &FederatedProfile, email: &str) -> Self {
        let now = Utc::now();
        let name = if profile.display_name.trim().is_empty() {
            email.split('@').next().unwrap_or_default().to_string()
        } else {
            profile.display_name.trim().to_string()
        };

        Self {
            id: Uuid::new_v4(),
            name,
            email: normalize_email(email),
            password_hash: FEDERATED_PASSWORD_SENTINEL.to_string(),
            auth_provider: AuthProvider::Federated,
            federated_provider_id: Some(profile.provider_id.clone()),
            role: Role::default(),
            phone: None,
            picture_url: profile.picture_url.clone(),
            email_verified: true,
            active_refresh_tokens: ActiveSessions::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// False for federated-only identities
    pub fn has_usable_password(&self) -> bool {
        self.password_hash != FEDERATED_PASSWORD_SENTINEL
    }

    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
