//! Request extractors and response types shared by the handlers

pub mod error;
pub mod json;
pub mod path;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use path::Path;

use serde::Serialize;

/// Body for operations that only confirm success
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
