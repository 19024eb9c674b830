use crate::{AuthProvider, FEDERATED_PASSWORD_SENTINEL, FederatedProfile, Identity, Role};

use googletest::prelude::*;

fn profile(display_name: &str, picture: Option<&str>) -> FederatedProfile {
    FederatedProfile {
        provider_id: "google-123".to_string(),
        email: Some("Ann@X.com".to_string()),
        display_name: display_name.to_string(),
        picture_url: picture.map(str::to_string),
    }
}

#[test]
fn given_mixed_case_email_when_creating_local_identity_then_email_is_normalized() {
    let identity = Identity::new_local("Ann".into(), "  Ann@X.Com ", "hash".into());

    assert_that!(identity.email, eq("ann@x.com"));
    assert_that!(identity.auth_provider, eq(AuthProvider::Local));
    assert_that!(identity.role, eq(Role::Customer));
    assert_that!(identity.email_verified, eq(false));
    assert_that!(identity.active_refresh_tokens.is_empty(), eq(true));
    assert_that!(identity.version, eq(1));
    assert_that!(identity.has_usable_password(), eq(true));
}

#[test]
fn given_profile_when_creating_federated_identity_then_uses_sentinel_and_is_verified() {
    let p = profile("Ann Lee", Some("https://img/ann.png"));

    let identity = Identity::new_federated(&p, "Ann@X.com");

    assert_that!(identity.password_hash, eq(FEDERATED_PASSWORD_SENTINEL));
    assert_that!(identity.has_usable_password(), eq(false));
    assert_that!(identity.auth_provider, eq(AuthProvider::Federated));
    assert_that!(identity.email_verified, eq(true));
    assert_that!(identity.federated_provider_id, some(eq("google-123")));
    assert_that!(identity.picture_url, some(eq("https://img/ann.png")));
    assert_that!(identity.name, eq("Ann Lee"));
    assert_that!(identity.email, eq("ann@x.com"));
}

#[test]
fn given_blank_display_name_when_creating_federated_identity_then_name_falls_back_to_local_part()
{
    let p = profile("   ", None);

    let identity = Identity::new_federated(&p, "ann@x.com");

    assert_that!(identity.name, eq("ann"));
    assert_that!(identity.picture_url, none());
}

#[test]
fn given_blank_email_when_checking_usable_email_then_none() {
    let mut p = profile("Ann", None);
    p.email = Some("   ".to_string());
    assert_that!(p.usable_email(), none());

    p.email = None;
    assert_that!(p.usable_email(), none());
}
