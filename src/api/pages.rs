//! Browser page routes
//!
//! Pages are plain files under the configured static directory. The app pages
//! require a session; without one the auth extractor redirects to `/login`.

use std::path::Path;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::api::middleware::{AuthUser, LOGIN_PATH};
use crate::api::state::AppState;

pub fn create_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/todos", get(todos_page))
        .route("/teams", get(teams_page))
        .route("/profile", get(profile_page))
}

/// GET / always sends the browser to the login page
pub async fn index() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response()
}

pub async fn login_page(State(state): State<AppState>, request: Request) -> Response {
    serve_page(&state.static_dir, "login.html", request).await
}

pub async fn register_page(State(state): State<AppState>, request: Request) -> Response {
    serve_page(&state.static_dir, "register.html", request).await
}

pub async fn todos_page(State(state): State<AppState>, _user: AuthUser, request: Request) -> Response {
    serve_page(&state.static_dir, "todos.html", request).await
}

pub async fn teams_page(State(state): State<AppState>, _user: AuthUser, request: Request) -> Response {
    serve_page(&state.static_dir, "teams.html", request).await
}

pub async fn profile_page(
    State(state): State<AppState>,
    _user: AuthUser,
    request: Request,
) -> Response {
    serve_page(&state.static_dir, "profile.html", request).await
}

/// Stream a file from the static directory; a missing file is a plain 404
async fn serve_page(dir: &Path, file: &str, request: Request) -> Response {
    match ServeFile::new(dir.join(file)).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
