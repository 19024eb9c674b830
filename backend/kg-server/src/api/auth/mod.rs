pub mod auth;
pub mod login_request;
pub mod logout_request;
pub mod message_response;
pub mod refresh_request;
pub mod register_request;
