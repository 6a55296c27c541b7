//! Todo infrastructure module

mod service;
mod sqlite_repository;

pub use service::{CreateTodoRequest, TodoService};
pub use sqlite_repository::SqliteTodoRepository;
