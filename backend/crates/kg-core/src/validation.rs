//! Input rules for the sign-in operations.
//!
//! Each check names the offending field so the HTTP layer can echo it back.

use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 100;

#[track_caller]
fn invalid(field: &str, message: impl Into<String>) -> CoreError {
    CoreError::Validation {
        message: message.into(),
        field: Some(field.to_string()),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
pub fn validate_name(name: &str) -> CoreErrorResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name", "Name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            "name",
            format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Structural check only: one `@`, non-empty local part, a dotted domain,
/// no whitespace.
#[track_caller]
pub fn validate_email(email: &str) -> CoreErrorResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(invalid("email", "Email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(invalid(
            "email",
            format!("Email must be at most {} characters", MAX_EMAIL_LENGTH),
        ));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("email", "Invalid email address"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("email", "Invalid email address"));
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok {
        return Err(invalid("email", "Invalid email address"));
    }

    Ok(())
}

/// Registration password policy: length bounds plus upper, lower, digit and
/// special character.
#[track_caller]
pub fn validate_new_password(password: &str) -> CoreErrorResult<()> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(invalid(
            "password",
            format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(invalid(
            "password",
            format!("Password must be at most {} characters", MAX_PASSWORD_LENGTH),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(invalid(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "password",
            "Password must contain at least one number",
        ));
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(invalid(
            "password",
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

#[track_caller]
pub fn validate_required(field: &str, value: &str) -> CoreErrorResult<()> {
    if value.is_empty() {
        return Err(invalid(field, format!("{} is required", field)));
    }
    Ok(())
}
