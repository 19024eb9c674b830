pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    auth::{
        auth::{federated_login, login, logout, me, refresh, register},
        login_request::LoginRequest,
        logout_request::LogoutRequest,
        message_response::MessageResponse,
        refresh_request::RefreshRequest,
        register_request::RegisterRequest,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        authenticated_identity::AuthenticatedIdentity, bearer::bearer_token,
        federation_caller::FederationCaller,
    },
};
pub use app_state::AppState;
pub use error::{Result as ServerResult, ServerError};

pub use crate::routes::build_router;
