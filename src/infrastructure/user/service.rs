//! User service for registration and credential checks

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User service for registration, authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Validate input, hash the password and store the account
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id(), username = %user.username(), "Registered user");

        Ok(user)
    }

    /// Check a username/password pair
    ///
    /// Unknown usernames yield `NotFound`, wrong passwords `InvalidCredentials`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repository
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", username)))?;

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(username = %username, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_username(username).await
    }

    /// Delete a user and everything they own
    pub async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;

        if deleted {
            info!(user_id = %id, "Deleted user");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::Store;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::sqlite_repository::SqliteUserRepository;

    async fn create_service() -> UserService<SqliteUserRepository, Argon2Hasher> {
        let store = Store::in_memory().await.unwrap();
        let repository = Arc::new(SqliteUserRepository::new(&store));
        UserService::new(repository, Arc::new(Argon2Hasher::new()))
    }

    fn make_request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash() {
        let service = create_service().await;

        let user = service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(user.username(), "alice");
        assert_ne!(user.password_hash(), "secret1");

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_invalid_input() {
        let service = create_service().await;

        let short_name = service
            .register(make_request("al", "alice@x.com", "secret1"))
            .await;
        assert!(matches!(short_name, Err(DomainError::Validation { .. })));

        let bad_email = service
            .register(make_request("alice", "not-an-email", "secret1"))
            .await;
        assert!(matches!(bad_email, Err(DomainError::Validation { .. })));

        let short_password = service
            .register(make_request("alice", "alice@x.com", "12345"))
            .await;
        assert!(matches!(short_password, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = create_service().await;

        service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .register(make_request("alice", "other@x.com", "secret2"))
            .await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service().await;

        service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let result = service
            .register(make_request("alicia", "alice@x.com", "secret2"))
            .await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_verify_success() {
        let service = create_service().await;

        let registered = service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let user = service.verify("alice", "secret1").await.unwrap();
        assert_eq!(user.id(), registered.id());
    }

    #[tokio::test]
    async fn test_verify_wrong_password() {
        let service = create_service().await;

        service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        let result = service.verify("alice", "wrong").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_unknown_user() {
        let service = create_service().await;

        let result = service.verify("ghost", "secret1").await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = create_service().await;

        let user = service
            .register(make_request("alice", "alice@x.com", "secret1"))
            .await
            .unwrap();

        assert!(service.delete(user.id()).await.unwrap());
        assert!(service.get(user.id()).await.unwrap().is_none());
        assert!(service.get_by_username("alice").await.unwrap().is_none());
    }
}
