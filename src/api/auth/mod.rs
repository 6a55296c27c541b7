//! Authentication API endpoints
//!
//! Registration, login and logout issue or clear the session cookie; the
//! token is also returned in the body for bearer-style clients.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::middleware::AuthUser;
use crate::api::state::{AppState, SessionSettings};
use crate::api::types::{ApiError, Json, MessageResponse};
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::auth::IssuedToken;
use crate::infrastructure::user::RegisterRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterRequest {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    let issued = state.jwt_service.issue_token(user.id())?;
    let jar = jar.add(session_cookie(&state.session, &issued));

    Ok((StatusCode::CREATED, jar, Json(auth_response(&user, issued))))
}

/// POST /api/login
///
/// Unknown usernames and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .verify(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } | DomainError::InvalidCredentials => {
                debug!(username = %body.username, "Login rejected");
                ApiError::unauthorized("Invalid credentials")
            }
            other => ApiError::from(other),
        })?;

    let issued = state.jwt_service.issue_token(user.id())?;
    let jar = jar.add(session_cookie(&state.session, &issued));

    info!(user_id = %user.id(), "User logged in");

    Ok((jar, Json(auth_response(&user, issued))))
}

/// POST /api/logout
///
/// Tokens are stateless; logging out only expires the cookie. The expiring
/// cookie is sent even when the request carried none.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(expired_cookie(&state.session));

    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/profile
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    Ok(Json(UserResponse::from(&user)))
}

fn auth_response(user: &User, issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        user: UserResponse::from(user),
        token: issued.token,
        expires_at: issued.expires_at,
    }
}

fn session_cookie(settings: &SessionSettings, issued: &IssuedToken) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure)
        .max_age(remaining_lifetime(issued.expires_at))
        .build()
}

/// Cookie max-age matching the token's own expiry
fn remaining_lifetime(expires_at: DateTime<Utc>) -> time::Duration {
    let seconds = (expires_at - Utc::now()).num_seconds().max(0);
    time::Duration::seconds(seconds)
}

fn expired_cookie(settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let settings = SessionSettings::default();
        let issued = IssuedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(24),
        };

        let cookie = session_cookie(&settings, &issued);

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        let max_age = cookie.max_age().unwrap();
        assert!(max_age <= time::Duration::hours(24));
        assert!(max_age > time::Duration::hours(24) - time::Duration::minutes(1));
    }

    #[test]
    fn test_expired_cookie_attributes() {
        let cookie = expired_cookie(&SessionSettings::default());

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn test_lifetime_of_past_expiry_is_zero() {
        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(remaining_lifetime(past), time::Duration::ZERO);
    }

    #[test]
    fn test_user_response_hides_hash() {
        let now = Utc::now();
        let user = User::restore(1.into(), "alice", "alice@x.com", "$argon2id$secret", now, now);

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
    }
}
