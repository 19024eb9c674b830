mod authenticated_identity;
mod bearer;
mod federation_caller;
