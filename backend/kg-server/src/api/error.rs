//! REST API error types
//!
//! Every failure leaves the server as `{"error": {"code", "message", "field?"}}`
//! with a status derived from the error code.

use kg_auth::AuthError;

use std::panic::Location;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "INVALID_TOKEN", "VALIDATION_ERROR")
    pub code: String,
    pub message: String,
    /// Offending request field for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the auth service; status follows its code
    #[error("{source} {location}")]
    Auth {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },

    /// Missing or malformed bearer credential (401)
    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    /// Body could not be parsed (400, reported as a validation failure)
    #[error("Malformed body: {message} {location}")]
    MalformedBody {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth { source, .. } => status_for(source),
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::MalformedBody { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::Validation { .. }
        | AuthError::FederatedOnlyAccount { .. }
        | AuthError::FederatedLoginRejected { .. } => StatusCode::BAD_REQUEST,
        AuthError::AccountNotFound { .. }
        | AuthError::InvalidCredentials { .. }
        | AuthError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
        AuthError::EmailTaken { .. } => StatusCode::CONFLICT,
        AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AuthError::Store { .. } | AuthError::PasswordHash { .. } | AuthError::TokenSigning { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let body = match self {
            ApiError::Auth { source, .. } => ApiErrorBody {
                code: source.error_code().into(),
                message: source.public_message(),
                field: source.field().map(str::to_string),
            },
            ApiError::Unauthorized { .. } => ApiErrorBody {
                code: "INVALID_TOKEN".into(),
                message: "Authentication required".into(),
                field: None,
            },
            ApiError::MalformedBody { message, .. } => ApiErrorBody {
                code: "VALIDATION_ERROR".into(),
                message,
                field: None,
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        ApiError::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Malformed JSON bodies keep the standard error envelope
impl From<JsonRejection> for ApiError {
    #[track_caller]
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody {
            message: rejection.body_text(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
