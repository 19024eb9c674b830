
use crate::AppState;

use kg_auth::{Argon2Hasher, AuthService, RetryPolicy, SessionPolicy, TokenSettings};
use kg_db::MemoryIdentityStore;

use std::sync::Arc;

pub(crate) const ACCESS_SECRET: &str = "access-secret-for-tests-0123456789abcdef";
pub(crate) const REFRESH_SECRET: &str = "refresh-secret-for-tests-0123456789abcde";
pub(crate) const FEDERATION_SECRET: &str = "federation-secret-for-tests-0123456789";

pub(crate) fn test_state(federation_secret: Option<&str>) -> (AppState, MemoryIdentityStore) {
    let store = MemoryIdentityStore::new();
    let auth = AuthService::new(
        Arc::new(store.clone()),
        Arc::new(Argon2Hasher::with_params(64, 1, 1).unwrap()),
        &TokenSettings::new(ACCESS_SECRET, REFRESH_SECRET),
        SessionPolicy::default(),
        RetryPolicy::default(),
    );

    (
        AppState::new(auth, federation_secret.map(str::to_string)),
        store,
    )
}
