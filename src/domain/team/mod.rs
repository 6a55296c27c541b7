//! Team domain module
//!
//! Teams own a shared todo list. The creator is always a member; anyone
//! holding the join code can become one.

mod entity;
mod repository;
mod validation;

pub use entity::{
    NewTeam, Team, TeamCode, TeamId, TeamMember, TeamRole, TeamTodo, TeamTodoId,
};
pub use repository::{TeamRepository, TeamTodoRepository};
pub use validation::{validate_team_code, validate_team_name, TeamValidationError};
