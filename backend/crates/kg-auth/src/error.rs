use kg_core::{CoreError, StoreError};

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
const FEDERATED_ONLY_MESSAGE: &str =
    "This account uses federated sign-in. Please continue with your identity provider.";
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
const EMAIL_TAKEN_MESSAGE: &str = "An account with this email already exists";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("No identity for the supplied email {location}")]
    AccountNotFound { location: ErrorLocation },

    #[error("Password does not match {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("Identity has no usable password {location}")]
    FederatedOnlyAccount { location: ErrorLocation },

    #[error("Invalid token: {message} {location}")]
    InvalidToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Federated login rejected: {message} {location}")]
    FederatedLoginRejected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Email already registered {location}")]
    EmailTaken { location: ErrorLocation },

    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    #[error("Store error: {source} {location}")]
    Store {
        #[source]
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Password hashing failed: {message} {location}")]
    PasswordHash {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token signing failed: {message} {location}")]
    TokenSigning {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    #[track_caller]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable code returned to callers
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::AccountNotFound { .. } | Self::InvalidCredentials { .. } => {
                "INVALID_CREDENTIALS"
            }
            Self::FederatedOnlyAccount { .. } => "FEDERATED_ONLY_ACCOUNT",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::FederatedLoginRejected { .. } => "FEDERATED_LOGIN_REJECTED",
            Self::EmailTaken { .. } => "EMAIL_TAKEN",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Store { .. } | Self::PasswordHash { .. } | Self::TokenSigning { .. } => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Caller-visible message. Internal detail (and the difference between an
    /// unknown account and a wrong password) stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::AccountNotFound { .. } | Self::InvalidCredentials { .. } => {
                INVALID_CREDENTIALS_MESSAGE.to_string()
            }
            Self::FederatedOnlyAccount { .. } => FEDERATED_ONLY_MESSAGE.to_string(),
            Self::InvalidToken { .. } => INVALID_TOKEN_MESSAGE.to_string(),
            Self::FederatedLoginRejected { message, .. } => message.clone(),
            Self::EmailTaken { .. } => EMAIL_TAKEN_MESSAGE.to_string(),
            Self::Forbidden { message, .. } => message.clone(),
            Self::Store { .. } | Self::PasswordHash { .. } | Self::TokenSigning { .. } => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Store { .. } | Self::PasswordHash { .. } | Self::TokenSigning { .. }
        )
    }
}

impl From<CoreError> for AuthError {
    #[track_caller]
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation {
                message, field, ..
            } => Self::Validation {
                message,
                field,
                location: ErrorLocation::from(Location::caller()),
            },
            other => Self::Validation {
                message: other.to_string(),
                field: None,
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<StoreError> for AuthError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        Self::Store {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
