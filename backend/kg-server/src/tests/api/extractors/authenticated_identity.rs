use crate::tests::test_state;
use crate::{ApiError, AuthenticatedIdentity};

use axum::{body::Body, extract::FromRequestParts, http::Request};
use googletest::prelude::*;

#[tokio::test]
async fn given_valid_access_token_when_extracting_then_returns_identity() {
    // Given
    let (state, _store) = test_state(None);
    let registered = state
        .auth
        .register("Ann", "ann@x.com", "Abcdef1!")
        .await
        .unwrap();
    let request = Request::builder()
        .header(
            "Authorization",
            format!("Bearer {}", registered.tokens.access_token),
        )
        .body(Body::empty())
        .unwrap();
    let (mut parts, _body) = request.into_parts();

    // When
    let result = AuthenticatedIdentity::from_request_parts(&mut parts, &state).await;

    // Then
    let AuthenticatedIdentity(identity) = result.unwrap();
    assert_that!(identity.id, eq(registered.user.id));
}

#[tokio::test]
async fn given_refresh_token_as_bearer_when_extracting_then_rejected() {
    // Given
    let (state, _store) = test_state(None);
    let registered = state
        .auth
        .register("Ann", "ann@x.com", "Abcdef1!")
        .await
        .unwrap();
    let request = Request::builder()
        .header(
            "Authorization",
            format!("Bearer {}", registered.tokens.refresh_token),
        )
        .body(Body::empty())
        .unwrap();
    let (mut parts, _body) = request.into_parts();

    // When
    let result = AuthenticatedIdentity::from_request_parts(&mut parts, &state).await;

    // Then
    assert!(matches!(result, Err(ApiError::Auth { .. })));
}
