//! Domain layer - Core business logic and entities

pub mod error;
pub mod team;
pub mod todo;
pub mod user;

pub use error::DomainError;
pub use team::{Team, TeamCode, TeamId, TeamMember, TeamRole, TeamTodo, TeamTodoId};
pub use todo::{TaskChanges, Todo, TodoId};
pub use user::{User, UserId};
