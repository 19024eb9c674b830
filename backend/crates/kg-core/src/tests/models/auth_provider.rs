use crate::AuthProvider;

use std::str::FromStr;

#[test]
fn test_auth_provider_as_str() {
    assert_eq!(AuthProvider::Local.as_str(), "local");
    assert_eq!(AuthProvider::Federated.as_str(), "federated");
    assert_eq!(AuthProvider::Both.as_str(), "both");
}

#[test]
fn test_auth_provider_from_str() {
    assert_eq!(
        AuthProvider::from_str("local").unwrap(),
        AuthProvider::Local
    );
    assert_eq!(
        AuthProvider::from_str("federated").unwrap(),
        AuthProvider::Federated
    );
    assert_eq!(AuthProvider::from_str("both").unwrap(), AuthProvider::Both);
    assert!(AuthProvider::from_str("google").is_err());
}

#[test]
fn test_auth_provider_has_federated_login() {
    assert!(!AuthProvider::Local.has_federated_login());
    assert!(AuthProvider::Federated.has_federated_login());
    assert!(AuthProvider::Both.has_federated_login());
}

#[test]
fn test_auth_provider_default() {
    assert_eq!(AuthProvider::default(), AuthProvider::Local);
}
