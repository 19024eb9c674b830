use crate::{ApiError, AppState, bearer_token};

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};
use subtle::ConstantTimeEq;

/// Proof that the caller is the identity-provider bridge holding the
/// configured federation secret.
pub struct FederationCaller;

impl FromRequestParts<AppState> for FederationCaller {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Some(ref secret) = state.federation_secret else {
                return Err(ApiError::unauthorized("federated login is disabled"));
            };

            let token = bearer_token(&parts.headers)?;
            if !bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
                log::warn!("Rejected federated login with a wrong bridge secret");
                return Err(ApiError::unauthorized("federation secret mismatch"));
            }

            Ok(FederationCaller)
        }
    }
}
