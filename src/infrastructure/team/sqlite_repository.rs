//! SQLite team, membership and team todo repositories

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::domain::team::{
    NewTeam, Team, TeamCode, TeamId, TeamMember, TeamRepository, TeamRole, TeamTodo, TeamTodoId,
    TeamTodoRepository,
};
use crate::domain::todo::{NewTask, TaskChanges};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{unique_violation, Store};

const TEAM_COLUMNS: &str = "id, name, code, created_by, created_at, updated_at";

const TEAM_TODO_COLUMNS: &str =
    "id, team_id, created_by, title, description, completed, created_at, updated_at";

/// SQLite implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn create_with_creator(&self, team: NewTeam) -> Result<Team, DomainError> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO teams (name, code, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            TEAM_COLUMNS
        ))
        .bind(&team.name)
        .bind(team.code.as_str())
        .bind(team.created_by.value())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(msg) if msg.contains("teams.code") => {
                DomainError::conflict(format!("Team code '{}' already exists", team.code))
            }
            _ => DomainError::storage(format!("Failed to create team: {}", e)),
        })?;

        let created = row_to_team(&row)?;

        sqlx::query("INSERT INTO team_members (team_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(created.id.value())
            .bind(created.created_by.value())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to add team creator: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit team: {}", e)))?;

        Ok(created)
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn get_by_code(&self, code: &TeamCode) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE code = ?", TEAM_COLUMNS))
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team by code: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.code, t.created_by, t.created_at, t.updated_at
            FROM teams t
            WHERE t.created_by = ?
               OR EXISTS (SELECT 1 FROM team_members m WHERE m.team_id = t.id AND m.user_id = ?)
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user.value())
        .bind(user.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn is_member(&self, team: TeamId, user: UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM teams t
                WHERE t.id = ?
                  AND (t.created_by = ?
                       OR EXISTS (SELECT 1 FROM team_members m
                                  WHERE m.team_id = t.id AND m.user_id = ?))
            )
            "#,
        )
        .bind(team.value())
        .bind(user.value())
        .bind(user.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check membership: {}", e)))
    }

    async fn add_member(&self, team: TeamId, user: UserId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team.value())
        .bind(user.value())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add team member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_members(&self, team: TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.team_id, m.user_id, u.username, t.created_by, m.created_at
            FROM team_members m
            JOIN users u ON u.id = m.user_id
            JOIN teams t ON t.id = m.team_id
            WHERE m.team_id = ?
            ORDER BY m.created_at ASC, m.id ASC
            "#,
        )
        .bind(team.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team members: {}", e)))?;

        rows.iter().map(row_to_member).collect()
    }

    async fn delete(&self, id: TeamId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// SQLite implementation of TeamTodoRepository
#[derive(Debug, Clone)]
pub struct SqliteTeamTodoRepository {
    pool: SqlitePool,
}

impl SqliteTeamTodoRepository {
    pub fn new(store: &Store) -> Self {
        Self {
            pool: store.pool().clone(),
        }
    }
}

#[async_trait]
impl TeamTodoRepository for SqliteTeamTodoRepository {
    async fn list(&self, team: TeamId) -> Result<Vec<TeamTodo>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM team_todos WHERE team_id = ? ORDER BY created_at DESC, id DESC",
            TEAM_TODO_COLUMNS
        ))
        .bind(team.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team todos: {}", e)))?;

        rows.iter().map(row_to_team_todo).collect()
    }

    async fn get(&self, team: TeamId, id: TeamTodoId) -> Result<Option<TeamTodo>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM team_todos WHERE id = ? AND team_id = ?",
            TEAM_TODO_COLUMNS
        ))
        .bind(id.value())
        .bind(team.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team todo: {}", e)))?;

        row.as_ref().map(row_to_team_todo).transpose()
    }

    async fn create(
        &self,
        team: TeamId,
        author: UserId,
        task: NewTask,
    ) -> Result<TeamTodo, DomainError> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO team_todos (team_id, created_by, title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, FALSE, ?, ?)
            RETURNING {}
            "#,
            TEAM_TODO_COLUMNS
        ))
        .bind(team.value())
        .bind(author.value())
        .bind(&task.title)
        .bind(&task.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create team todo: {}", e)))?;

        row_to_team_todo(&row)
    }

    async fn update(
        &self,
        team: TeamId,
        id: TeamTodoId,
        changes: &TaskChanges,
    ) -> Result<Option<TeamTodo>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE team_todos
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                completed = COALESCE(?, completed),
                updated_at = ?
            WHERE id = ? AND team_id = ?
            RETURNING {}
            "#,
            TEAM_TODO_COLUMNS
        ))
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.completed)
        .bind(Utc::now())
        .bind(id.value())
        .bind(team.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update team todo: {}", e)))?;

        row.as_ref().map(row_to_team_todo).transpose()
    }

    async fn delete(&self, team: TeamId, id: TeamTodoId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM team_todos WHERE id = ? AND team_id = ?")
            .bind(id.value())
            .bind(team.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team todo: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn read_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to read team row: {}", e))
}

fn row_to_team(row: &SqliteRow) -> Result<Team, DomainError> {
    let id: i64 = row.try_get("id").map_err(read_error)?;
    let code: String = row.try_get("code").map_err(read_error)?;
    let created_by: i64 = row.try_get("created_by").map_err(read_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read_error)?;

    let code = TeamCode::new(code)
        .map_err(|e| DomainError::storage(format!("Stored team code is invalid: {}", e)))?;

    Ok(Team {
        id: TeamId::new(id),
        name: row.try_get("name").map_err(read_error)?,
        code,
        created_by: UserId::new(created_by),
        created_at,
        updated_at,
    })
}

fn row_to_member(row: &SqliteRow) -> Result<TeamMember, DomainError> {
    let team_id: i64 = row.try_get("team_id").map_err(read_error)?;
    let user_id: i64 = row.try_get("user_id").map_err(read_error)?;
    let created_by: i64 = row.try_get("created_by").map_err(read_error)?;

    let role = if user_id == created_by {
        TeamRole::Creator
    } else {
        TeamRole::Member
    };

    Ok(TeamMember {
        id: row.try_get("id").map_err(read_error)?,
        team_id: TeamId::new(team_id),
        user_id: UserId::new(user_id),
        username: row.try_get("username").map_err(read_error)?,
        role,
        created_at: row.try_get("created_at").map_err(read_error)?,
    })
}

fn row_to_team_todo(row: &SqliteRow) -> Result<TeamTodo, DomainError> {
    let id: i64 = row.try_get("id").map_err(read_error)?;
    let team_id: i64 = row.try_get("team_id").map_err(read_error)?;
    let created_by: i64 = row.try_get("created_by").map_err(read_error)?;

    Ok(TeamTodo {
        id: TeamTodoId::new(id),
        team_id: TeamId::new(team_id),
        created_by: UserId::new(created_by),
        title: row.try_get("title").map_err(read_error)?,
        description: row.try_get("description").map_err(read_error)?,
        completed: row.try_get("completed").map_err(read_error)?,
        created_at: row.try_get("created_at").map_err(read_error)?,
        updated_at: row.try_get("updated_at").map_err(read_error)?,
    })
}
