//! One-way password hashing seam and its Argon2id adapter.

use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use error_location::ErrorLocation;

const SALT_LENGTH: usize = 16;

pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plain: &str) -> AuthErrorResult<String>;

    /// False for a wrong password and for anything that is not a PHC hash
    fn verify(&self, plain: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC strings
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost parameters (memory in KiB, iterations, lanes)
    #[track_caller]
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> AuthErrorResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            AuthError::PasswordHash {
                message: format!("invalid Argon2 parameters: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    #[track_caller]
    fn hash(&self, plain: &str) -> AuthErrorResult<String> {
        let salt_bytes: [u8; SALT_LENGTH] = rand::random();
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::PasswordHash {
            message: format!("failed to encode salt: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn verify(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}
