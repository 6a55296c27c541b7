//! SQLite user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::{unique_violation, Store};

/// SQLite implementation of UserRepository
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given store
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(msg) if msg.contains("users.email") => {
                DomainError::conflict(format!("Email '{}' already exists", user.email))
            }
            Some(_) => {
                DomainError::conflict(format!("Username '{}' already exists", user.username))
            }
            None => DomainError::storage(format!("Failed to create user: {}", e)),
        })?;

        row_to_user(&row)
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read user id: {}", e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DomainError::storage(format!("Failed to read username: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Failed to read email: {}", e)))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| DomainError::storage(format!("Failed to read password hash: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to read created_at: {}", e)))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Failed to read updated_at: {}", e)))?;

    Ok(User::restore(
        UserId::new(id),
        username,
        email,
        password_hash,
        created_at,
        updated_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_repository() -> SqliteUserRepository {
        let store = Store::in_memory().await.unwrap();
        SqliteUserRepository::new(&store)
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = create_repository().await;

        let user = repo.create(new_user("alice", "alice@x.com")).await.unwrap();
        assert!(user.id().value() > 0);

        let fetched = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(fetched.username(), "alice");
        assert_eq!(fetched.email(), "alice@x.com");

        let by_name = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id(), user.id());

        let by_email = repo.get_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id(), user.id());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = create_repository().await;

        repo.create(new_user("alice", "alice@x.com")).await.unwrap();
        let err = repo.create(new_user("alice", "other@x.com")).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(err.to_string().contains("Username"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = create_repository().await;

        repo.create(new_user("alice", "alice@x.com")).await.unwrap();
        let err = repo.create(new_user("alicia", "alice@x.com")).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(err.to_string().contains("Email"));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = create_repository().await;

        let user = repo.create(new_user("alice", "alice@x.com")).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(!repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_helpers() {
        let repo = create_repository().await;

        let user = repo.create(new_user("alice", "alice@x.com")).await.unwrap();

        assert!(repo.exists(user.id()).await.unwrap());
        assert!(repo.username_exists("alice").await.unwrap());
        assert!(repo.email_exists("alice@x.com").await.unwrap());
        assert!(!repo.username_exists("bob").await.unwrap());
    }
}
