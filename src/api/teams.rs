//! Team, membership and team todo endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::todos::{CreateTaskBody, UpdateTaskBody};
use crate::api::types::{ApiError, Json, MessageResponse, Path};
use crate::domain::team::{Team, TeamId, TeamMember, TeamTodo, TeamTodoId};
use crate::infrastructure::team::CreateTeamRequest;

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/join", post(join_team))
        .route("/teams/{id}", get(get_team).delete(delete_team))
        .route("/teams/{id}/members", get(list_members))
        .route("/teams/{id}/todos", get(list_team_todos).post(create_team_todo))
        .route(
            "/teams/{id}/todos/{todo_id}",
            get(get_team_todo)
                .put(update_team_todo)
                .delete(delete_team_todo),
        )
}

#[derive(Debug, Deserialize)]
pub struct CreateTeamBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinTeamBody {
    #[serde(default)]
    pub code: String,
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = state.team_service.list_teams(user_id).await?;
    Ok(Json(teams))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTeamBody>,
) -> Result<Json<Team>, ApiError> {
    let team = state
        .team_service
        .create_team(user_id, CreateTeamRequest { name: body.name })
        .await?;

    Ok(Json(team))
}

/// POST /api/teams/join
pub async fn join_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<JoinTeamBody>,
) -> Result<Json<Team>, ApiError> {
    let team = state.team_service.join_team(user_id, &body.code).await?;
    Ok(Json(team))
}

/// GET /api/teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Team>, ApiError> {
    let team = state.team_service.get_team(user_id, TeamId::new(id)).await?;
    Ok(Json(team))
}

/// DELETE /api/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .team_service
        .delete_team(user_id, TeamId::new(id))
        .await?;

    Ok(Json(MessageResponse::new("Team deleted successfully")))
}

/// GET /api/teams/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let members = state
        .team_service
        .list_members(user_id, TeamId::new(id))
        .await?;

    Ok(Json(members))
}

/// GET /api/teams/{id}/todos
pub async fn list_team_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TeamTodo>>, ApiError> {
    let todos = state
        .team_service
        .list_todos(user_id, TeamId::new(id))
        .await?;

    Ok(Json(todos))
}

/// POST /api/teams/{id}/todos
pub async fn create_team_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<CreateTaskBody>,
) -> Result<Json<TeamTodo>, ApiError> {
    let todo = state
        .team_service
        .create_todo(user_id, TeamId::new(id), body.into())
        .await?;

    Ok(Json(todo))
}

/// GET /api/teams/{id}/todos/{todo_id}
pub async fn get_team_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, todo_id)): Path<(i64, i64)>,
) -> Result<Json<TeamTodo>, ApiError> {
    let todo = state
        .team_service
        .get_todo(user_id, TeamId::new(id), TeamTodoId::new(todo_id))
        .await?;

    Ok(Json(todo))
}

/// PUT /api/teams/{id}/todos/{todo_id}
pub async fn update_team_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, todo_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .team_service
        .update_todo(user_id, TeamId::new(id), TeamTodoId::new(todo_id), body.into())
        .await?;

    Ok(Json(MessageResponse::new("Team todo updated successfully")))
}

/// DELETE /api/teams/{id}/todos/{todo_id}
pub async fn delete_team_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, todo_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .team_service
        .delete_todo(user_id, TeamId::new(id), TeamTodoId::new(todo_id))
        .await?;

    Ok(Json(MessageResponse::new("Team todo deleted successfully")))
}
