//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username (for login)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their email address
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user, failing with `Conflict` on a duplicate username or email
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Delete a user together with everything they own
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// Check if a user ID exists
    async fn exists(&self, id: UserId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    /// Check if an email exists
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
