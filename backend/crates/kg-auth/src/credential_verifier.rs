use crate::{AuthError, CredentialHasher, Result as AuthErrorResult};

use kg_core::{Identity, IdentityStore, normalize_email};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::debug;

/// Checks an email/password pair against the stored identity.
///
/// Read-only: a failed login never mutates the identity.
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn IdentityStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthErrorResult<Identity> {
        let email = normalize_email(email);

        let Some(identity) = self.store.find_by_email(&email).await? else {
            debug!("Login rejected: no identity for email");
            return Err(AuthError::AccountNotFound {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if !identity.has_usable_password() {
            debug!("Login rejected: identity {} is federated-only", identity.id);
            return Err(AuthError::FederatedOnlyAccount {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.hasher.verify(password, &identity.password_hash) {
            debug!("Login rejected: wrong password for identity {}", identity.id);
            return Err(AuthError::InvalidCredentials {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(identity)
    }
}
