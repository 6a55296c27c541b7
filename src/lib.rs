//! Team Todo
//!
//! A multi-user todo service with:
//! - Username/password accounts and JWT session cookies
//! - Personal todo lists scoped to their owner
//! - Teams joined by a shared code, each with a shared todo list

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::PathBuf;
use std::sync::Arc;

use api::state::{AppState, SessionSettings};
use infrastructure::{
    auth::{JwtConfig, JwtService},
    storage::Store,
    team::{RandomTeamCodeGenerator, SqliteTeamRepository, SqliteTeamTodoRepository, TeamService},
    todo::{SqliteTodoRepository, TodoService},
    user::{Argon2Hasher, SqliteUserRepository, UserService},
};

/// Open the configured database, apply migrations and wire the services
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = Store::connect(&config.database.to_sqlite_config()).await?;
    store.migrate().await?;

    Ok(create_app_state_with_store(config, store))
}

/// Wire the services on top of an already migrated store
pub fn create_app_state_with_store(config: &AppConfig, store: Store) -> AppState {
    let jwt_config = JwtConfig::resolve(config.auth.jwt_secret.as_deref(), config.auth.token_ttl_hours);

    let user_service = UserService::new(
        Arc::new(SqliteUserRepository::new(&store)),
        Arc::new(Argon2Hasher::new()),
    );
    let todo_service = TodoService::new(Arc::new(SqliteTodoRepository::new(&store)));
    let team_service = TeamService::new(
        Arc::new(SqliteTeamRepository::new(&store)),
        Arc::new(SqliteTeamTodoRepository::new(&store)),
        Arc::new(RandomTeamCodeGenerator::new()),
    );

    AppState {
        user_service: Arc::new(user_service),
        todo_service: Arc::new(todo_service),
        team_service: Arc::new(team_service),
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        store,
        session: SessionSettings {
            cookie_name: config.auth.cookie_name.clone(),
            cookie_secure: config.auth.cookie_secure,
        },
        static_dir: PathBuf::from(&config.server.static_dir),
    }
}
