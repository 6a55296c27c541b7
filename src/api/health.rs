//! `/health`, `/ready` and `/live`
//!
//! Only `/ready` touches the database.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::types::Json;

use super::state::AppState;

/// Body of `/health` and `/ready`
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// One dependency checked by `/ready`
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Returns 200 whenever the process is serving requests
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check: the database must answer a ping
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let database = check_database(&state).await;
    let overall_status = database.status;

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![database]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Empty 200 for process supervisors
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_database(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    match state.store.ping().await {
        Ok(()) => HealthCheck {
            name: "database".to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            HealthCheck {
                name: "database".to_string(),
                status: HealthStatus::Unhealthy,
                message: Some("Database unavailable".to_string()),
                latency_ms: Some(start.elapsed().as_millis() as u64),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::infrastructure::storage::Store;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn state_with(store: Store) -> AppState {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("health-test-secret".to_string());
        crate::create_app_state_with_store(&config, store)
    }

    async fn body_of(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_omits_checks() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body.get("checks").is_none());
        assert!(body.get("latency_ms").is_none());
    }

    #[tokio::test]
    async fn test_ready_with_open_store() {
        let state = state_with(Store::in_memory().await.unwrap());

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"][0]["name"], "database");
        assert_eq!(body["checks"][0]["status"], "healthy");
        assert!(body["checks"][0].get("message").is_none());
    }

    #[tokio::test]
    async fn test_ready_with_closed_store() {
        let store = Store::in_memory().await.unwrap();
        let state = state_with(store.clone());
        store.close().await;

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_of(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"][0]["status"], "unhealthy");
        assert_eq!(body["checks"][0]["message"], "Database unavailable");
    }

    #[tokio::test]
    async fn test_live_is_empty_ok() {
        let response = live_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
