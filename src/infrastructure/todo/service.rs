//! Personal todo service

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::todo::{
    validate_changes, validate_new_task, NewTask, TaskChanges, Todo, TodoId, TodoRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for creating a personal todo
#[derive(Debug, Clone)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

impl From<CreateTodoRequest> for NewTask {
    fn from(request: CreateTodoRequest) -> Self {
        NewTask {
            title: request.title,
            description: request.description.unwrap_or_default(),
        }
    }
}

/// Todo service; every operation is scoped to the acting user
#[derive(Debug)]
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// The user's todos, newest first
    pub async fn list(&self, user: UserId) -> Result<Vec<Todo>, DomainError> {
        self.repository.list(user).await
    }

    pub async fn get(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError> {
        self.repository
            .get(user, id)
            .await?
            .ok_or_else(|| todo_not_found(id))
    }

    pub async fn create(&self, user: UserId, request: CreateTodoRequest) -> Result<Todo, DomainError> {
        let task = NewTask::from(request);
        validate_new_task(&task).map_err(|e| DomainError::validation(e.to_string()))?;

        let todo = self.repository.create(user, task).await?;

        info!(user_id = %user, todo_id = %todo.id, "Created todo");

        Ok(todo)
    }

    /// Apply the fields present in `changes`, leaving the rest untouched
    pub async fn update(
        &self,
        user: UserId,
        id: TodoId,
        changes: TaskChanges,
    ) -> Result<Todo, DomainError> {
        validate_changes(&changes).map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository
            .update(user, id, &changes)
            .await?
            .ok_or_else(|| todo_not_found(id))
    }

    /// Flip the completed flag in a single statement
    pub async fn toggle(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError> {
        self.repository
            .toggle(user, id)
            .await?
            .ok_or_else(|| todo_not_found(id))
    }

    /// Delete a todo; deleting a missing one is not an error
    pub async fn delete(&self, user: UserId, id: TodoId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(user, id).await?;

        if !deleted {
            debug!(user_id = %user, todo_id = %id, "Delete matched no todo");
        }

        Ok(deleted)
    }
}

fn todo_not_found(id: TodoId) -> DomainError {
    DomainError::not_found(format!("Todo '{}' not found", id))
}
