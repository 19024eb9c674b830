pub mod error;
pub mod models;
pub mod store;
pub mod validation;

pub use error::{CoreError, Result};
pub use models::active_sessions::ActiveSessions;
pub use models::auth_provider::AuthProvider;
pub use models::federated_profile::FederatedProfile;
pub use models::identity::{FEDERATED_PASSWORD_SENTINEL, Identity, normalize_email};
pub use models::public_identity::PublicIdentity;
pub use models::role::Role;
pub use models::token_pair::TokenPair;
pub use store::{IdentityStore, StoreError, StoreResult};

#[cfg(test)]
mod tests;
