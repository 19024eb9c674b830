mod active_sessions;
mod auth_provider;
mod identity;
mod public_identity;
mod role;
