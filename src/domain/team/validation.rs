//! Team validation

use thiserror::Error;

use super::entity::TeamCode;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team code must be exactly {0} characters")]
    InvalidCodeLength(usize),

    #[error("Team code can only contain uppercase letters and digits")]
    InvalidCodeCharacters,
}

/// Validate a team name: required, not blank, no length limit
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    Ok(())
}

/// Validate a join code
pub fn validate_team_code(code: &str) -> Result<(), TeamValidationError> {
    if code.len() != TeamCode::LENGTH {
        return Err(TeamValidationError::InvalidCodeLength(TeamCode::LENGTH));
    }

    if !code.bytes().all(|b| TeamCode::ALPHABET.contains(&b)) {
        return Err(TeamValidationError::InvalidCodeCharacters);
    }

    Ok(())
}
