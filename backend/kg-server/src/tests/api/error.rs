use crate::ApiError;

use kg_auth::AuthError;
use kg_core::StoreError;

use std::panic::Location;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use axum::http::StatusCode;
use googletest::prelude::*;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn given_validation_error_when_rendered_then_400_with_field() {
    let error = ApiError::from(AuthError::validation("password", "Password is too weak"));

    let (status, json) = body_json(error).await;

    assert_that!(status, eq(StatusCode::BAD_REQUEST));
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "password");
    assert_eq!(json["error"]["message"], "Password is too weak");
}

#[tokio::test]
async fn given_unknown_account_when_rendered_then_same_as_wrong_password() {
    let unknown = ApiError::from(AuthError::AccountNotFound {
        location: ErrorLocation::from(Location::caller()),
    });
    let wrong = ApiError::from(AuthError::InvalidCredentials {
        location: ErrorLocation::from(Location::caller()),
    });

    let (unknown_status, unknown_json) = body_json(unknown).await;
    let (wrong_status, wrong_json) = body_json(wrong).await;

    assert_that!(unknown_status, eq(StatusCode::UNAUTHORIZED));
    assert_that!(wrong_status, eq(unknown_status));
    assert_eq!(unknown_json, wrong_json);
}

#[tokio::test]
async fn given_email_taken_when_rendered_then_409() {
    let error = ApiError::from(AuthError::EmailTaken {
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = body_json(error).await;

    assert_that!(status, eq(StatusCode::CONFLICT));
    assert_eq!(json["error"]["code"], "EMAIL_TAKEN");
    assert!(json["error"].get("field").is_none());
}

#[tokio::test]
async fn given_federated_only_when_rendered_then_400_with_guidance() {
    let error = ApiError::from(AuthError::FederatedOnlyAccount {
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, json) = body_json(error).await;

    assert_that!(status, eq(StatusCode::BAD_REQUEST));
    assert_eq!(json["error"]["code"], "FEDERATED_ONLY_ACCOUNT");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("identity provider")
    );
}

#[tokio::test]
async fn given_forbidden_when_rendered_then_403() {
    let error = ApiError::from(AuthError::Forbidden {
        message: "Staff only".into(),
        location: ErrorLocation::from(Location::caller()),
    });

    let (status, _) = body_json(error).await;

    assert_that!(status, eq(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn given_store_failure_when_rendered_then_500_without_detail() {
    let error = ApiError::from(AuthError::from(StoreError::Backend {
        message: "database is locked".into(),
        location: ErrorLocation::from(Location::caller()),
    }));

    let (status, json) = body_json(error).await;

    assert_that!(status, eq(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("locked"));
}

#[tokio::test]
async fn given_missing_bearer_when_rendered_then_401_invalid_token() {
    let error = ApiError::unauthorized("missing Authorization header");

    let (status, json) = body_json(error).await;

    assert_that!(status, eq(StatusCode::UNAUTHORIZED));
    assert_eq!(json["error"]["code"], "INVALID_TOKEN");
}
