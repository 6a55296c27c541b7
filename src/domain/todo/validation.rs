//! Task validation shared by personal and team todos

use thiserror::Error;

use super::entity::{NewTask, TaskChanges};

/// Errors that can occur during task validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskValidationError {
    #[error("Title is required")]
    EmptyTitle,
}

/// Validate a task title: required, not blank
///
/// Length is unbounded, as is the description.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    Ok(())
}

pub fn validate_new_task(task: &NewTask) -> Result<(), TaskValidationError> {
    validate_title(&task.title)
}

/// Only the fields present in the change set are checked
pub fn validate_changes(changes: &TaskChanges) -> Result<(), TaskValidationError> {
    match &changes.title {
        Some(title) => validate_title(title),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_title() {
        assert!(validate_title("Ship v1").is_ok());
        assert!(validate_title(&"t".repeat(10_000)).is_ok());
    }

    #[test]
    fn test_blank_title() {
        assert_eq!(validate_title(""), Err(TaskValidationError::EmptyTitle));
        assert_eq!(validate_title("   "), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn test_long_description_accepted() {
        let task = NewTask {
            title: "Write report".to_string(),
            description: "d".repeat(20_000),
        };
        assert!(validate_new_task(&task).is_ok());
    }

    #[test]
    fn test_changes_only_check_present_fields() {
        assert!(validate_changes(&TaskChanges::default()).is_ok());

        let clear_description = TaskChanges {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_changes(&clear_description).is_ok());

        let blank_title = TaskChanges {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_changes(&blank_title),
            Err(TaskValidationError::EmptyTitle)
        );
    }
}
