use crate::tests::{FEDERATION_SECRET, test_state};
use crate::{ApiError, FederationCaller};

use axum::{body::Body, extract::FromRequestParts, http::Request};

async fn extract(
    federation_secret: Option<&str>,
    header: Option<&str>,
) -> Result<FederationCaller, ApiError> {
    let (state, _store) = test_state(federation_secret);
    let mut builder = Request::builder();
    if let Some(value) = header {
        builder = builder.header("Authorization", value);
    }
    let (mut parts, _body) = builder.body(Body::empty()).unwrap().into_parts();

    FederationCaller::from_request_parts(&mut parts, &state).await
}

#[tokio::test]
async fn given_matching_secret_when_extracting_then_accepted() {
    let header = format!("Bearer {}", FEDERATION_SECRET);

    let result = extract(Some(FEDERATION_SECRET), Some(&header)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_wrong_secret_when_extracting_then_unauthorized() {
    let result = extract(
        Some(FEDERATION_SECRET),
        Some("Bearer federation-secret-for-tests-0123456780"),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_prefix_or_extension_of_secret_when_extracting_then_unauthorized() {
    let prefix = format!("Bearer {}", &FEDERATION_SECRET[..FEDERATION_SECRET.len() - 1]);
    let extended = format!("Bearer {}x", FEDERATION_SECRET);

    let short = extract(Some(FEDERATION_SECRET), Some(&prefix)).await;
    let long = extract(Some(FEDERATION_SECRET), Some(&extended)).await;

    assert!(matches!(short, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(long, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_federation_disabled_when_extracting_then_unauthorized() {
    let header = format!("Bearer {}", FEDERATION_SECRET);

    let result = extract(None, Some(&header)).await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_no_header_when_extracting_then_unauthorized() {
    let result = extract(Some(FEDERATION_SECRET), None).await;

    assert!(result.is_err());
}
