use crate::{AuthProvider, Identity, Role};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity as returned to callers: no password hash, no refresh tokens,
/// no storage version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub federated_provider_id: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for PublicIdentity {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            auth_provider: identity.auth_provider,
            federated_provider_id: identity.federated_provider_id.clone(),
            role: identity.role,
            phone: identity.phone.clone(),
            picture_url: identity.picture_url.clone(),
            email_verified: identity.email_verified,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

impl From<Identity> for PublicIdentity {
    fn from(identity: Identity) -> Self {
        Self::from(&identity)
    }
}
