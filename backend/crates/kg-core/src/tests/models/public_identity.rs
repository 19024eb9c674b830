use crate::{Identity, PublicIdentity};

#[test]
fn given_identity_with_sessions_when_projected_then_secrets_are_not_serialized() {
    let mut identity = Identity::new_local("Ann".into(), "ann@x.com", "argon-hash".into());
    identity
        .active_refresh_tokens
        .admit("refresh-token".to_string(), 5);

    let json = serde_json::to_value(PublicIdentity::from(&identity)).unwrap();

    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
    assert!(json.get("activeRefreshTokens").is_none());
    assert!(json.get("version").is_none());
    assert_eq!(json["email"], "ann@x.com");
    assert_eq!(json["authProvider"], "local");
    assert_eq!(json["role"], "customer");
}
