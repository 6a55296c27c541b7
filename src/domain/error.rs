use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Todo '7' not found");
        assert_eq!(error.to_string(), "Not found: Todo '7' not found");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Title is required");
        assert_eq!(error.to_string(), "Validation error: Title is required");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Username 'alice' already exists");
        assert_eq!(error.to_string(), "Conflict: Username 'alice' already exists");
        assert!(error.is_conflict());
    }

    #[test]
    fn test_invalid_credentials_has_no_detail() {
        assert_eq!(DomainError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
