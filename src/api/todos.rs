//! Personal todo endpoints
//!
//! Every handler is scoped to the authenticated caller; another user's todo
//! looks exactly like a missing one.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, Path};
use crate::domain::todo::{TaskChanges, Todo, TodoId};
use crate::infrastructure::todo::CreateTodoRequest;

pub fn create_todos_router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", put(toggle_todo))
}

/// Body for creating a personal or team todo
#[derive(Debug, Deserialize)]
pub struct CreateTaskBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateTaskBody> for CreateTodoRequest {
    fn from(body: CreateTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
        }
    }
}

/// Body for a partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTaskBody> for TaskChanges {
    fn from(body: UpdateTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            completed: body.completed,
        }
    }
}

/// GET /api/todos
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.todo_service.list(user_id).await?;
    Ok(Json(todos))
}

/// POST /api/todos
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.todo_service.create(user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /api/todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.todo_service.get(user_id, TodoId::new(id)).await?;
    Ok(Json(todo))
}

/// PUT /api/todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .todo_service
        .update(user_id, TodoId::new(id), body.into())
        .await?;

    Ok(Json(MessageResponse::new("Todo updated successfully")))
}

/// PUT /api/todos/{id}/toggle
pub async fn toggle_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.todo_service.toggle(user_id, TodoId::new(id)).await?;
    Ok(Json(todo))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.todo_service.delete(user_id, TodoId::new(id)).await?;
    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_absent_fields_stay_none() {
        let body: UpdateTaskBody = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        let changes = TaskChanges::from(body);

        assert_eq!(changes.completed, Some(true));
        assert!(changes.title.is_none());
        assert!(changes.description.is_none());
    }

    #[test]
    fn test_update_body_empty_description_clears() {
        let body: UpdateTaskBody = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        let changes = TaskChanges::from(body);

        assert_eq!(changes.description.as_deref(), Some(""));
    }

    #[test]
    fn test_create_body_missing_title_defaults_empty() {
        let body: CreateTaskBody = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        let request = CreateTodoRequest::from(body);

        assert_eq!(request.title, "");
        assert_eq!(request.description.as_deref(), Some("x"));
    }
}
