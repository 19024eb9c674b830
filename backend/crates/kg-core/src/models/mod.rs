pub mod active_sessions;
pub mod auth_provider;
pub mod federated_profile;
pub mod identity;
pub mod public_identity;
pub mod role;
pub mod token_pair;
