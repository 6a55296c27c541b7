//! SQLite todo repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::todo::{NewTask, TaskChanges, Todo, TodoId, TodoRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::Store;

const TODO_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

/// SQLite implementation of TodoRepository
///
/// Every statement filters on the owner as well as the id, so a row owned by
/// someone else behaves exactly like a missing one.
#[derive(Debug, Clone)]
pub struct SqliteTodoRepository {
    pool: SqlitePool,
}

impl SqliteTodoRepository {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM todos WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            TODO_COLUMNS
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list todos: {}", e)))?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn get(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM todos WHERE id = ? AND user_id = ?",
            TODO_COLUMNS
        ))
        .bind(id.value())
        .bind(owner.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get todo: {}", e)))?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn create(&self, owner: UserId, task: NewTask) -> Result<Todo, DomainError> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO todos (user_id, title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, FALSE, ?, ?)
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(owner.value())
        .bind(&task.title)
        .bind(&task.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create todo: {}", e)))?;

        row_to_todo(&row)
    }

    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        changes: &TaskChanges,
    ) -> Result<Option<Todo>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                completed = COALESCE(?, completed),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .bind(Utc::now())
        .bind(id.value())
        .bind(owner.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update todo: {}", e)))?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn toggle(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE todos
            SET completed = NOT completed, updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(Utc::now())
        .bind(id.value())
        .bind(owner.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to toggle todo: {}", e)))?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id.value())
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete todo: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read todo row: {}", e));

    let id: i64 = row.try_get("id").map_err(read)?;
    let user_id: i64 = row.try_get("user_id").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read)?;

    Ok(Todo {
        id: TodoId::new(id),
        user_id: UserId::new(user_id),
        title: row.try_get("title").map_err(read)?,
        description: row.try_get("description").map_err(read)?,
        completed: row.try_get("completed").map_err(read)?,
        created_at,
        updated_at,
    })
}
