//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including user entities, validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_email, validate_password, validate_username, UserValidationError};
