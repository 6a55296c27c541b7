//! Todo domain
//!
//! Personal tasks and the task shapes shared with team todos.

mod entity;
mod repository;
mod validation;

pub use entity::{NewTask, TaskChanges, Todo, TodoId};
pub use repository::TodoRepository;
pub use validation::{
    validate_changes, validate_new_task, validate_title, TaskValidationError,
};
