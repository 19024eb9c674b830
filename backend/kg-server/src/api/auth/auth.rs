//! Auth REST API handlers
//!
//! Thin adapters over [`kg_auth::AuthService`]; every rule lives there.

use crate::{
    ApiResult, AppState, AuthenticatedIdentity, FederationCaller, LoginRequest, LogoutRequest,
    MessageResponse, RefreshRequest, RegisterRequest,
};

use kg_auth::{AuthResponse, FederatedLoginResponse};
use kg_core::{FederatedProfile, PublicIdentity, TokenPair};

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = payload?;

    let response = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(request) = payload?;

    let response = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is
/// retired; presenting it again fails with 401.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(request) = payload?;

    let tokens = state.auth.refresh(&request.refresh_token).await?;

    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
///
/// Succeeds for any authenticated caller. The body is optional and a body
/// that does not parse is treated as absent.
pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    body: Bytes,
) -> Json<MessageResponse> {
    let request = if body.is_empty() {
        LogoutRequest::default()
    } else {
        serde_json::from_slice::<LogoutRequest>(&body).unwrap_or_default()
    };

    state
        .auth
        .logout(identity.id, request.refresh_token.as_deref())
        .await;

    Json(MessageResponse {
        message: String::from("Logged out successfully"),
    })
}

/// POST /api/v1/auth/federated
///
/// Called by the identity-provider bridge after its own handshake.
pub async fn federated_login(
    State(state): State<AppState>,
    _caller: FederationCaller,
    payload: Result<Json<FederatedProfile>, JsonRejection>,
) -> ApiResult<Json<FederatedLoginResponse>> {
    let Json(profile) = payload?;

    let response = state.auth.federated_login(&profile).await?;

    Ok(Json(response))
}

/// GET /api/v1/auth/me
pub async fn me(AuthenticatedIdentity(identity): AuthenticatedIdentity) -> Json<PublicIdentity> {
    Json(PublicIdentity::from(identity))
}
