//! Axum extractor for access-token authentication

use crate::{ApiError, AppState, bearer_token};

use kg_core::Identity;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// The identity behind the request's access token.
///
/// Rejects with 401 when the header is missing, the token does not verify,
/// or the identity no longer exists.
pub struct AuthenticatedIdentity(pub Identity);

impl FromRequestParts<AppState> for AuthenticatedIdentity {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = bearer_token(&parts.headers)?;
            let identity = state.auth.authenticate(token).await?;

            log::debug!("Authenticated identity {}", identity.id);
            Ok(AuthenticatedIdentity(identity))
        }
    }
}
