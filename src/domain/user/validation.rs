//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 32;
const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate a username: 3 to 32 characters, any characters allowed
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password: at least 6 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}
