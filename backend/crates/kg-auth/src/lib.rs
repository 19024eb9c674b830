pub mod auth_service;
pub mod claims;
pub mod credential_verifier;
pub mod error;
pub mod merge_resolver;
pub mod metrics;
pub mod password;
pub mod retry;
pub mod session_manager;
pub mod token_issuer;

pub use auth_service::{AuthResponse, AuthService, FederatedLoginResponse};
pub use claims::Claims;
pub use credential_verifier::CredentialVerifier;
pub use error::{AuthError, Result};
pub use merge_resolver::{IdentityMergeResolver, MergeOutcome, MergeResolution};
pub use metrics::AuthMetrics;
pub use password::{Argon2Hasher, CredentialHasher};
pub use retry::{IsRetryable, RetryPolicy, with_retry};
pub use session_manager::{SessionGrant, SessionManager, SessionPolicy};
pub use token_issuer::{TokenIssuer, TokenSettings};

#[cfg(test)]
mod tests;
