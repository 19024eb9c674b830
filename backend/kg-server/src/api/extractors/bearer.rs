use crate::ApiError;

use axum::http::{HeaderMap, header::AUTHORIZATION};

const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header
#[track_caller]
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Authorization header is not valid ASCII"))?;

    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::unauthorized("expected a Bearer token")),
    }
}
