use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth;
use super::health;
use super::pages;
use super::state::AppState;
use super::teams;
use super::todos;
use super::types::ApiError;

/// Create the JSON API router mounted under `/api`
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::create_auth_router())
        .merge(todos::create_todos_router())
        .merge(teams::create_teams_router())
        .fallback(api_not_found)
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Create the full router with application state
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let static_dir = state.static_dir.clone();

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", create_api_router())
        // Browser pages and their assets
        .merge(pages::create_pages_router())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Credentialed CORS for the configured origins
///
/// A wildcard cannot be combined with credentials, so `*` is dropped.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                warn!("Ignoring wildcard CORS origin");
                return None;
            }

            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
