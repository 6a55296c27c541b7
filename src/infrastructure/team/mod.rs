//! Team infrastructure implementations

mod code;
mod service;
mod sqlite_repository;

pub use code::{RandomTeamCodeGenerator, TeamCodeGenerator};
pub use service::{CreateTeamRequest, TeamService, MAX_CODE_ATTEMPTS};
pub use sqlite_repository::{SqliteTeamRepository, SqliteTeamTodoRepository};
