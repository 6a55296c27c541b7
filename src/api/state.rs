//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::team::{
    Team, TeamId, TeamMember, TeamRepository, TeamTodo, TeamTodoId, TeamTodoRepository,
};
use crate::domain::todo::{TaskChanges, Todo, TodoId, TodoRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::storage::Store;
use crate::infrastructure::team::{CreateTeamRequest, TeamCodeGenerator, TeamService};
use crate::infrastructure::todo::{CreateTodoRequest, TodoService};
use crate::infrastructure::user::{PasswordHasher, RegisterRequest, UserService};

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            cookie_secure: false,
        }
    }
}

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub todo_service: Arc<dyn TodoServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub store: Store,
    pub session: SessionSettings,
    /// Directory holding the HTML pages and assets
    pub static_dir: PathBuf,
}

/// Trait for account operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn verify(&self, username: &str, password: &str) -> Result<User, DomainError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;
}

/// Trait for personal todo operations
#[async_trait::async_trait]
pub trait TodoServiceTrait: Send + Sync {
    async fn list(&self, user: UserId) -> Result<Vec<Todo>, DomainError>;
    async fn get(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError>;
    async fn create(&self, user: UserId, request: CreateTodoRequest) -> Result<Todo, DomainError>;
    async fn update(
        &self,
        user: UserId,
        id: TodoId,
        changes: TaskChanges,
    ) -> Result<Todo, DomainError>;
    async fn toggle(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError>;
    async fn delete(&self, user: UserId, id: TodoId) -> Result<bool, DomainError>;
}

/// Trait for team, membership and team todo operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn is_member(&self, user: UserId, team: TeamId) -> Result<bool, DomainError>;
    async fn is_owner(&self, user: UserId, team: TeamId) -> Result<bool, DomainError>;
    async fn create_team(&self, user: UserId, request: CreateTeamRequest)
        -> Result<Team, DomainError>;
    async fn join_team(&self, user: UserId, code: &str) -> Result<Team, DomainError>;
    async fn list_teams(&self, user: UserId) -> Result<Vec<Team>, DomainError>;
    async fn get_team(&self, user: UserId, team: TeamId) -> Result<Team, DomainError>;
    async fn list_members(&self, user: UserId, team: TeamId)
        -> Result<Vec<TeamMember>, DomainError>;
    async fn delete_team(&self, user: UserId, team: TeamId) -> Result<(), DomainError>;
    async fn list_todos(&self, user: UserId, team: TeamId) -> Result<Vec<TeamTodo>, DomainError>;
    async fn get_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<TeamTodo, DomainError>;
    async fn create_todo(
        &self,
        user: UserId,
        team: TeamId,
        request: CreateTodoRequest,
    ) -> Result<TeamTodo, DomainError>;
    async fn update_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
        changes: TaskChanges,
    ) -> Result<TeamTodo, DomainError>;
    async fn delete_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<bool, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn verify(&self, username: &str, password: &str) -> Result<User, DomainError> {
        UserService::verify(self, username, password).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_username(self, username).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        UserService::delete(self, id).await
    }
}

#[async_trait::async_trait]
impl<R: TodoRepository + 'static> TodoServiceTrait for TodoService<R> {
    async fn list(&self, user: UserId) -> Result<Vec<Todo>, DomainError> {
        TodoService::list(self, user).await
    }

    async fn get(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError> {
        TodoService::get(self, user, id).await
    }

    async fn create(&self, user: UserId, request: CreateTodoRequest) -> Result<Todo, DomainError> {
        TodoService::create(self, user, request).await
    }

    async fn update(
        &self,
        user: UserId,
        id: TodoId,
        changes: TaskChanges,
    ) -> Result<Todo, DomainError> {
        TodoService::update(self, user, id, changes).await
    }

    async fn toggle(&self, user: UserId, id: TodoId) -> Result<Todo, DomainError> {
        TodoService::toggle(self, user, id).await
    }

    async fn delete(&self, user: UserId, id: TodoId) -> Result<bool, DomainError> {
        TodoService::delete(self, user, id).await
    }
}

#[async_trait::async_trait]
impl<R, T, G> TeamServiceTrait for TeamService<R, T, G>
where
    R: TeamRepository + 'static,
    T: TeamTodoRepository + 'static,
    G: TeamCodeGenerator + 'static,
{
    async fn is_member(&self, user: UserId, team: TeamId) -> Result<bool, DomainError> {
        TeamService::is_member(self, user, team).await
    }

    async fn is_owner(&self, user: UserId, team: TeamId) -> Result<bool, DomainError> {
        TeamService::is_owner(self, user, team).await
    }

    async fn create_team(
        &self,
        user: UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        TeamService::create_team(self, user, request).await
    }

    async fn join_team(&self, user: UserId, code: &str) -> Result<Team, DomainError> {
        TeamService::join_team(self, user, code).await
    }

    async fn list_teams(&self, user: UserId) -> Result<Vec<Team>, DomainError> {
        TeamService::list_teams(self, user).await
    }

    async fn get_team(&self, user: UserId, team: TeamId) -> Result<Team, DomainError> {
        TeamService::get_team(self, user, team).await
    }

    async fn list_members(
        &self,
        user: UserId,
        team: TeamId,
    ) -> Result<Vec<TeamMember>, DomainError> {
        TeamService::list_members(self, user, team).await
    }

    async fn delete_team(&self, user: UserId, team: TeamId) -> Result<(), DomainError> {
        TeamService::delete_team(self, user, team).await
    }

    async fn list_todos(&self, user: UserId, team: TeamId) -> Result<Vec<TeamTodo>, DomainError> {
        TeamService::list_todos(self, user, team).await
    }

    async fn get_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<TeamTodo, DomainError> {
        TeamService::get_todo(self, user, team, id).await
    }

    async fn create_todo(
        &self,
        user: UserId,
        team: TeamId,
        request: CreateTodoRequest,
    ) -> Result<TeamTodo, DomainError> {
        TeamService::create_todo(self, user, team, request).await
    }

    async fn update_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
        changes: TaskChanges,
    ) -> Result<TeamTodo, DomainError> {
        TeamService::update_todo(self, user, team, id, changes).await
    }

    async fn delete_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<bool, DomainError> {
        TeamService::delete_todo(self, user, team, id).await
    }
}
