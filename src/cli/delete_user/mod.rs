//! Delete-user command - removes an account and everything it owns
//!
//! The store cascades the delete to the user's todos, the teams they created
//! (with those teams' todos and memberships) and their memberships elsewhere.

use std::sync::Arc;

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::infrastructure::storage::Store;
use crate::infrastructure::user::{Argon2Hasher, SqliteUserRepository, UserService};

#[derive(Args, Debug, PartialEq, Eq)]
pub struct DeleteUserArgs {
    /// Username of the account to delete
    #[arg(long)]
    pub username: String,
}

pub async fn run(args: DeleteUserArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let store = Store::connect(&config.database.to_sqlite_config()).await?;
    store.migrate().await?;

    let result = delete_user(&store, &args.username).await;
    store.close().await;

    result
}

/// Delete the account named `username`; unknown names are an error
pub async fn delete_user(store: &Store, username: &str) -> anyhow::Result<()> {
    let users = UserService::new(
        Arc::new(SqliteUserRepository::new(store)),
        Arc::new(Argon2Hasher::new()),
    );

    let Some(user) = users.get_by_username(username).await? else {
        bail!("User '{}' not found", username);
    };

    users.delete(user.id()).await?;
    info!(user_id = %user.id(), username = %username, "User deleted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::todo::{CreateTodoRequest, SqliteTodoRepository, TodoService};
    use crate::infrastructure::user::RegisterRequest;

    #[tokio::test]
    async fn test_delete_user_cascades_todos() {
        let store = Store::in_memory().await.unwrap();
        let users = UserService::new(
            Arc::new(SqliteUserRepository::new(&store)),
            Arc::new(Argon2Hasher::new()),
        );
        let todos = TodoService::new(Arc::new(SqliteTodoRepository::new(&store)));

        let alice = users
            .register(RegisterRequest {
                username: "alice".to_string(),
                email: "alice@x.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        todos
            .create(
                alice.id(),
                CreateTodoRequest {
                    title: "Buy milk".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        delete_user(&store, "alice").await.unwrap();

        assert!(users.get_by_username("alice").await.unwrap().is_none());
        assert!(todos.list(alice.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_user_fails() {
        let store = Store::in_memory().await.unwrap();

        let err = delete_user(&store, "ghost").await.unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
