//! Client-side checks run before login/register requests are sent.

use thiserror::Error;

/// Minimum password length accepted at registration
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required.")]
    NameRequired,

    #[error("Password is required.")]
    PasswordRequired,

    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,

    #[error("Password must include uppercase, lowercase, and a number.")]
    PasswordTooWeak,
}

pub fn validate_login(name: &str, password: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

pub fn validate_registration(name: &str, password: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}
