use crate::{ApiError, bearer_token};

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use googletest::prelude::*;

fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn given_bearer_header_when_parsed_then_returns_token() {
    let headers = headers("Bearer abc.def.ghi");

    let token = bearer_token(&headers).unwrap();

    assert_that!(token, eq("abc.def.ghi"));
}

#[test]
fn given_no_header_when_parsed_then_unauthorized() {
    let headers = HeaderMap::new();
    let result = bearer_token(&headers);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn given_basic_scheme_when_parsed_then_unauthorized() {
    let headers = headers("Basic dXNlcjpwYXNz");

    assert!(matches!(
        bearer_token(&headers),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn given_empty_bearer_when_parsed_then_unauthorized() {
    let headers = headers("Bearer   ");

    assert!(bearer_token(&headers).is_err());
}
