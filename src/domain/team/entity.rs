//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_team_code, TeamValidationError};
use crate::domain::user::UserId;

/// Numeric team identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Join code - 6 uppercase alphanumeric characters, unique per team
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamCode(String);

impl TeamCode {
    /// Number of characters in every code
    pub const LENGTH: usize = 6;

    /// Symbols a code is drawn from
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Create a TeamCode after validation
    pub fn new(code: impl Into<String>) -> Result<Self, TeamValidationError> {
        let code = code.into();
        validate_team_code(&code)?;
        Ok(Self(code))
    }

    /// Normalize user input (surrounding whitespace, lowercase) before validating
    pub fn parse(input: &str) -> Result<Self, TeamValidationError> {
        Self::new(input.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamCode {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamCode> for String {
    fn from(code: TeamCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for TeamCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team with a shared todo list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub code: TeamCode,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn is_created_by(&self, user: UserId) -> bool {
        self.created_by == user
    }

    pub fn role_of(&self, user: UserId) -> TeamRole {
        if self.is_created_by(user) {
            TeamRole::Creator
        } else {
            TeamRole::Member
        }
    }
}

/// Data required to insert a team row
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub code: TeamCode,
    pub created_by: UserId,
}

/// Role of a user within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Created the team; the only role allowed to delete it
    Creator,
    Member,
}

impl TeamRole {
    pub fn can_delete_team(&self) -> bool {
        matches!(self, Self::Creator)
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creator => write!(f, "creator"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Membership row linking a user to a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub username: String,
    pub role: TeamRole,
    /// Join time
    pub created_at: DateTime<Utc>,
}

/// Numeric team todo identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamTodoId(i64);

impl TeamTodoId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TeamTodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task owned by a team and attributed to the member who created it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTodo {
    pub id: TeamTodoId,
    pub team_id: TeamId,
    pub created_by: UserId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_team() -> Team {
        let now = Utc::now();
        Team {
            id: TeamId::new(1),
            name: "Eng".to_string(),
            code: TeamCode::new("ABC123").unwrap(),
            created_by: UserId::new(10),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_team_code_valid() {
        let code = TeamCode::new("AB12CD").unwrap();
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn test_team_code_parse_normalizes() {
        let code = TeamCode::parse("  ab12cd ").unwrap();
        assert_eq!(code.as_str(), "AB12CD");
    }

    #[test]
    fn test_team_code_invalid() {
        assert!(TeamCode::new("ab12cd").is_err());
        assert!(TeamCode::new("ABC").is_err());
        assert!(TeamCode::new("ABC-12").is_err());
    }

    #[test]
    fn test_team_code_deserialization_validates() {
        let ok: Result<TeamCode, _> = serde_json::from_str("\"XYZ789\"");
        assert!(ok.is_ok());

        let bad: Result<TeamCode, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_team_roles() {
        let team = create_test_team();

        assert_eq!(team.role_of(UserId::new(10)), TeamRole::Creator);
        assert_eq!(team.role_of(UserId::new(11)), TeamRole::Member);
        assert!(TeamRole::Creator.can_delete_team());
        assert!(!TeamRole::Member.can_delete_team());
    }

    #[test]
    fn test_team_serialization() {
        let team = create_test_team();

        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["code"], "ABC123");
        assert_eq!(json["created_by"], 10);
    }
}
