//! Team service: membership rules, join protocol and team todos

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::team::{
    validate_team_name, NewTeam, Team, TeamCode, TeamId, TeamMember, TeamRepository, TeamTodo,
    TeamTodoId, TeamTodoRepository,
};
use crate::domain::todo::{validate_changes, validate_new_task, NewTask, TaskChanges};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::todo::CreateTodoRequest;

use super::code::TeamCodeGenerator;

/// Attempts at finding an unused join code before giving up
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Team service for managing teams and their shared todos
#[derive(Debug)]
pub struct TeamService<R: TeamRepository, T: TeamTodoRepository, G: TeamCodeGenerator> {
    teams: Arc<R>,
    todos: Arc<T>,
    codes: Arc<G>,
}

impl<R: TeamRepository, T: TeamTodoRepository, G: TeamCodeGenerator> TeamService<R, T, G> {
    pub fn new(teams: Arc<R>, todos: Arc<T>, codes: Arc<G>) -> Self {
        Self {
            teams,
            todos,
            codes,
        }
    }

    /// True when the user created the team or joined it
    pub async fn is_member(&self, user: UserId, team: TeamId) -> Result<bool, DomainError> {
        self.teams.is_member(team, user).await
    }

    /// True when the user created the team; false for a missing team
    pub async fn is_owner(&self, user: UserId, team: TeamId) -> Result<bool, DomainError> {
        Ok(self
            .teams
            .get(team)
            .await?
            .is_some_and(|t| t.is_created_by(user)))
    }

    /// Create a team with a fresh join code; the creator becomes its first member
    pub async fn create_team(
        &self,
        user: UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        let name = request.name.trim().to_string();
        validate_team_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.codes.generate()?;

            let result = self
                .teams
                .create_with_creator(NewTeam {
                    name: name.clone(),
                    code: code.clone(),
                    created_by: user,
                })
                .await;

            match result {
                Ok(team) => {
                    info!(team_id = %team.id, code = %team.code, user_id = %user, "Created team");
                    return Ok(team);
                }
                Err(e) if e.is_conflict() => {
                    warn!(code = %code, attempt, "Team code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::conflict(
            "Could not allocate a unique team code, try again",
        ))
    }

    /// Join the team holding `code`; joining twice is a no-op
    pub async fn join_team(&self, user: UserId, code: &str) -> Result<Team, DomainError> {
        let code = TeamCode::parse(code).map_err(|e| DomainError::validation(e.to_string()))?;

        let team = self
            .teams
            .get_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        if self.teams.is_member(team.id, user).await? {
            debug!(team_id = %team.id, user_id = %user, "Already a member");
            return Ok(team);
        }

        if self.teams.add_member(team.id, user).await? {
            info!(team_id = %team.id, user_id = %user, "Joined team");
        }

        Ok(team)
    }

    /// Teams the user created or joined, newest first
    pub async fn list_teams(&self, user: UserId) -> Result<Vec<Team>, DomainError> {
        self.teams.list_for_user(user).await
    }

    pub async fn get_team(&self, user: UserId, team: TeamId) -> Result<Team, DomainError> {
        let found = self
            .teams
            .get(team)
            .await?
            .ok_or_else(|| team_not_found(team))?;

        if !self.teams.is_member(team, user).await? {
            return Err(not_a_member(team));
        }

        Ok(found)
    }

    pub async fn list_members(
        &self,
        user: UserId,
        team: TeamId,
    ) -> Result<Vec<TeamMember>, DomainError> {
        self.get_team(user, team).await?;
        self.teams.list_members(team).await
    }

    /// Delete a team; only its creator may do so
    pub async fn delete_team(&self, user: UserId, team: TeamId) -> Result<(), DomainError> {
        let found = self
            .teams
            .get(team)
            .await?
            .ok_or_else(|| team_not_found(team))?;

        if !found.role_of(user).can_delete_team() {
            return Err(DomainError::forbidden("Only the team creator can delete the team"));
        }

        self.teams.delete(team).await?;

        info!(team_id = %team, user_id = %user, "Deleted team");

        Ok(())
    }

    pub async fn list_todos(&self, user: UserId, team: TeamId) -> Result<Vec<TeamTodo>, DomainError> {
        self.require_member(user, team).await?;
        self.todos.list(team).await
    }

    pub async fn get_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<TeamTodo, DomainError> {
        self.require_member(user, team).await?;

        self.todos
            .get(team, id)
            .await?
            .ok_or_else(|| team_todo_not_found(id))
    }

    pub async fn create_todo(
        &self,
        user: UserId,
        team: TeamId,
        request: CreateTodoRequest,
    ) -> Result<TeamTodo, DomainError> {
        self.require_member(user, team).await?;

        let task = NewTask::from(request);
        validate_new_task(&task).map_err(|e| DomainError::validation(e.to_string()))?;

        let todo = self.todos.create(team, user, task).await?;

        info!(team_id = %team, todo_id = %todo.id, user_id = %user, "Created team todo");

        Ok(todo)
    }

    pub async fn update_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
        changes: TaskChanges,
    ) -> Result<TeamTodo, DomainError> {
        self.require_member(user, team).await?;
        validate_changes(&changes).map_err(|e| DomainError::validation(e.to_string()))?;

        self.todos
            .update(team, id, &changes)
            .await?
            .ok_or_else(|| team_todo_not_found(id))
    }

    /// Delete a team todo; a missing one is not an error
    pub async fn delete_todo(
        &self,
        user: UserId,
        team: TeamId,
        id: TeamTodoId,
    ) -> Result<bool, DomainError> {
        self.require_member(user, team).await?;

        let deleted = self.todos.delete(team, id).await?;

        if !deleted {
            debug!(team_id = %team, todo_id = %id, "Delete matched no team todo");
        }

        Ok(deleted)
    }

    /// Missing teams are reported the same way as foreign ones
    async fn require_member(&self, user: UserId, team: TeamId) -> Result<(), DomainError> {
        if self.teams.is_member(team, user).await? {
            Ok(())
        } else {
            Err(not_a_member(team))
        }
    }
}

fn team_not_found(team: TeamId) -> DomainError {
    DomainError::not_found(format!("Team '{}' not found", team))
}

fn team_todo_not_found(id: TeamTodoId) -> DomainError {
    DomainError::not_found(format!("Team todo '{}' not found", id))
}

fn not_a_member(team: TeamId) -> DomainError {
    DomainError::forbidden(format!("Not a member of team '{}'", team))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::infrastructure::storage::Store;
    use crate::infrastructure::team::code::{RandomTeamCodeGenerator, SequenceTeamCodeGenerator};
    use crate::infrastructure::team::sqlite_repository::{
        SqliteTeamRepository, SqliteTeamTodoRepository,
    };
    use crate::infrastructure::user::SqliteUserRepository;

    type Service<G> = TeamService<SqliteTeamRepository, SqliteTeamTodoRepository, G>;

    struct Fixture {
        store: Store,
        users: SqliteUserRepository,
        alice: UserId,
        bob: UserId,
        carol: UserId,
    }

    async fn setup() -> Fixture {
        let store = Store::in_memory().await.unwrap();
        let users = SqliteUserRepository::new(&store);

        let mut ids = Vec::new();
        for name in ["alice", "bob", "carol"] {
            let user = users
                .create(NewUser {
                    username: name.to_string(),
                    email: format!("{}@x.com", name),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id());
        }

        Fixture {
            store,
            users,
            alice: ids[0],
            bob: ids[1],
            carol: ids[2],
        }
    }

    fn service_with<G: TeamCodeGenerator>(store: &Store, codes: G) -> Service<G> {
        TeamService::new(
            Arc::new(SqliteTeamRepository::new(store)),
            Arc::new(SqliteTeamTodoRepository::new(store)),
            Arc::new(codes),
        )
    }

    fn service(store: &Store) -> Service<RandomTeamCodeGenerator> {
        service_with(store, RandomTeamCodeGenerator::new())
    }

    fn team_request(name: &str) -> CreateTeamRequest {
        CreateTeamRequest {
            name: name.to_string(),
        }
    }

    fn todo_request(title: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            title: title.to_string(),
            description: None,
        }
    }

    async fn count(store: &Store, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(store.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_team() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();

        assert_eq!(team.name, "Eng");
        assert_eq!(team.code.as_str().len(), TeamCode::LENGTH);
        assert!(service.is_member(fx.alice, team.id).await.unwrap());
        assert!(service.is_owner(fx.alice, team.id).await.unwrap());
        assert!(!service.is_member(fx.bob, team.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_team_blank_name() {
        let fx = setup().await;
        let service = service(&fx.store);

        let result = service.create_team(fx.alice, team_request("  ")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_team_retries_on_code_collision() {
        let fx = setup().await;

        let first = service_with(
            &fx.store,
            SequenceTeamCodeGenerator::new(vec![TeamCode::new("AAAAAA").unwrap()]),
        );
        first.create_team(fx.alice, team_request("Eng")).await.unwrap();

        let second = service_with(
            &fx.store,
            SequenceTeamCodeGenerator::new(vec![
                TeamCode::new("AAAAAA").unwrap(),
                TeamCode::new("BBBBBB").unwrap(),
            ]),
        );
        let team = second.create_team(fx.bob, team_request("Ops")).await.unwrap();

        assert_eq!(team.code.as_str(), "BBBBBB");
        assert_eq!(count(&fx.store, "teams").await, 2);
    }

    #[tokio::test]
    async fn test_create_team_gives_up_after_max_attempts() {
        let fx = setup().await;
        let codes = || SequenceTeamCodeGenerator::new(vec![TeamCode::new("AAAAAA").unwrap()]);

        service_with(&fx.store, codes())
            .create_team(fx.alice, team_request("Eng"))
            .await
            .unwrap();

        let result = service_with(&fx.store, codes())
            .create_team(fx.bob, team_request("Ops"))
            .await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(count(&fx.store, "teams").await, 1);
        assert_eq!(count(&fx.store, "team_members").await, 1);
    }

    #[tokio::test]
    async fn test_join_normalizes_code() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        let input = format!("  {}  ", team.code.as_str().to_lowercase());

        let joined = service.join_team(fx.bob, &input).await.unwrap();

        assert_eq!(joined.id, team.id);
        assert!(service.is_member(fx.bob, team.id).await.unwrap());
        assert!(!service.is_owner(fx.bob, team.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_join_twice_keeps_one_membership() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();

        service.join_team(fx.bob, team.code.as_str()).await.unwrap();
        service.join_team(fx.bob, team.code.as_str()).await.unwrap();
        service.join_team(fx.alice, team.code.as_str()).await.unwrap();

        let rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE team_id = ? AND user_id = ?",
        )
        .bind(team.id.value())
        .bind(fx.bob.value())
        .fetch_one(fx.store.pool())
        .await
        .unwrap();
        assert_eq!(rows, 1);

        assert_eq!(service.list_members(fx.alice, team.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_join_unknown_and_malformed_codes() {
        let fx = setup().await;
        let service = service(&fx.store);

        let missing = service.join_team(fx.bob, "ZZZZZZ").await;
        assert!(missing.unwrap_err().is_not_found());

        let malformed = service.join_team(fx.bob, "nope").await;
        assert!(matches!(malformed, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_teams() {
        let fx = setup().await;
        let service = service(&fx.store);

        service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        let ops = service.create_team(fx.bob, team_request("Ops")).await.unwrap();
        service.join_team(fx.alice, ops.code.as_str()).await.unwrap();

        let names: Vec<String> = service
            .list_teams(fx.alice)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Ops", "Eng"]);

        assert!(service.list_teams(fx.carol).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_team_requires_membership() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();

        assert_eq!(service.get_team(fx.alice, team.id).await.unwrap().id, team.id);
        assert!(matches!(
            service.get_team(fx.carol, team.id).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(
            service
                .get_team(fx.alice, TeamId::new(999))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(matches!(
            service.list_members(fx.carol, team.id).await,
            Err(DomainError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn test_team_todos_for_members_only() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        service.join_team(fx.bob, team.code.as_str()).await.unwrap();

        let todo = service
            .create_todo(fx.bob, team.id, todo_request("Ship"))
            .await
            .unwrap();
        assert_eq!(todo.created_by, fx.bob);
        assert_eq!(todo.team_id, team.id);

        let listed = service.list_todos(fx.alice, team.id).await.unwrap();
        assert_eq!(listed.len(), 1);

        let forbidden = [
            service.list_todos(fx.carol, team.id).await.map(|_| ()),
            service.get_todo(fx.carol, team.id, todo.id).await.map(|_| ()),
            service
                .create_todo(fx.carol, team.id, todo_request("Sneak"))
                .await
                .map(|_| ()),
            service
                .update_todo(fx.carol, team.id, todo.id, TaskChanges::default())
                .await
                .map(|_| ()),
            service.delete_todo(fx.carol, team.id, todo.id).await.map(|_| ()),
        ];
        for result in forbidden {
            assert!(matches!(result, Err(DomainError::Forbidden { .. })));
        }

        let missing_team = service.list_todos(fx.alice, TeamId::new(999)).await;
        assert!(matches!(missing_team, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_team_todo_update_and_delete() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        let todo = service
            .create_todo(fx.alice, team.id, todo_request("Ship"))
            .await
            .unwrap();

        let changes = TaskChanges {
            completed: Some(true),
            ..Default::default()
        };
        let updated = service
            .update_todo(fx.alice, team.id, todo.id, changes)
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Ship");

        assert!(service.delete_todo(fx.alice, team.id, todo.id).await.unwrap());
        assert!(
            service
                .get_todo(fx.alice, team.id, todo.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(!service.delete_todo(fx.alice, team.id, todo.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_team_creator_only() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        service.join_team(fx.bob, team.code.as_str()).await.unwrap();
        service
            .create_todo(fx.bob, team.id, todo_request("Ship"))
            .await
            .unwrap();

        let result = service.delete_team(fx.bob, team.id).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
        assert_eq!(count(&fx.store, "teams").await, 1);

        service.delete_team(fx.alice, team.id).await.unwrap();

        assert_eq!(count(&fx.store, "teams").await, 0);
        assert_eq!(count(&fx.store, "team_members").await, 0);
        assert_eq!(count(&fx.store, "team_todos").await, 0);

        assert!(
            service
                .delete_team(fx.alice, team.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_user_delete_cascades_everything() {
        let fx = setup().await;
        let service = service(&fx.store);

        let team = service.create_team(fx.alice, team_request("Eng")).await.unwrap();
        service.join_team(fx.bob, team.code.as_str()).await.unwrap();
        service
            .create_todo(fx.bob, team.id, todo_request("Ship"))
            .await
            .unwrap();

        let other = service.create_team(fx.bob, team_request("Ops")).await.unwrap();
        service.join_team(fx.alice, other.code.as_str()).await.unwrap();

        fx.users.delete(fx.alice).await.unwrap();

        assert_eq!(count(&fx.store, "teams").await, 1);
        assert_eq!(count(&fx.store, "team_todos").await, 0);
        assert!(!service.is_member(fx.alice, other.id).await.unwrap());
        assert_eq!(service.list_members(fx.bob, other.id).await.unwrap().len(), 1);
    }
}
