//! Todo repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewTask, TaskChanges, Todo, TodoId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for personal todos
///
/// Every operation is scoped by the owning user; a todo belonging to another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait TodoRepository: Send + Sync + Debug {
    /// List a user's todos, newest first
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, DomainError>;

    async fn get(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, DomainError>;

    async fn create(&self, owner: UserId, task: NewTask) -> Result<Todo, DomainError>;

    /// Apply a partial update, returning `None` when no row matched
    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        changes: &TaskChanges,
    ) -> Result<Option<Todo>, DomainError>;

    /// Flip `completed` in a single statement, returning `None` when no row matched
    async fn toggle(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, DomainError>;

    /// Delete a todo, returning whether a row was removed
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool, DomainError>;
}
