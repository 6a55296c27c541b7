//! Team repository traits

use async_trait::async_trait;

use super::entity::{NewTeam, Team, TeamCode, TeamId, TeamMember, TeamTodo, TeamTodoId};
use crate::domain::todo::{NewTask, TaskChanges};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository for teams and their memberships
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Insert the team and the creator's membership atomically
    ///
    /// Fails with `Conflict` when the code is already taken; nothing is
    /// persisted in that case.
    async fn create_with_creator(&self, team: NewTeam) -> Result<Team, DomainError>;

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    async fn get_by_code(&self, code: &TeamCode) -> Result<Option<Team>, DomainError>;

    /// Teams the user created or joined, newest first
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Team>, DomainError>;

    /// True when the user created the team or has a membership row
    async fn is_member(&self, team: TeamId, user: UserId) -> Result<bool, DomainError>;

    /// Add a membership, returning false when it already existed
    async fn add_member(&self, team: TeamId, user: UserId) -> Result<bool, DomainError>;

    async fn list_members(&self, team: TeamId) -> Result<Vec<TeamMember>, DomainError>;

    /// Delete a team; memberships and team todos go with it
    async fn delete(&self, id: TeamId) -> Result<bool, DomainError>;
}

/// Repository for todos shared within a team
///
/// Operations are scoped by team; membership is enforced by the caller.
#[async_trait]
pub trait TeamTodoRepository: Send + Sync + std::fmt::Debug {
    async fn list(&self, team: TeamId) -> Result<Vec<TeamTodo>, DomainError>;

    async fn get(&self, team: TeamId, id: TeamTodoId) -> Result<Option<TeamTodo>, DomainError>;

    async fn create(
        &self,
        team: TeamId,
        author: UserId,
        task: NewTask,
    ) -> Result<TeamTodo, DomainError>;

    async fn update(
        &self,
        team: TeamId,
        id: TeamTodoId,
        changes: &TaskChanges,
    ) -> Result<Option<TeamTodo>, DomainError>;

    async fn delete(&self, team: TeamId, id: TeamTodoId) -> Result<bool, DomainError>;
}
