pub mod authenticated_identity;
pub mod bearer;
pub mod federation_caller;
