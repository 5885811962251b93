//! User identity record.

use serde::{Deserialize, Serialize};

use warden_core::{DomainError, DomainResult, UserId};

/// Login name of a user.
///
/// Matching is exact and case-sensitive: the value is stored as given, with
/// no trimming or case folding. Empty and whitespace-only names are rejected,
/// as are names containing NUL, which Postgres cannot store in a text column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if value.contains('\0') {
            return Err(DomainError::validation("username cannot contain NUL"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity record as read from the store.
///
/// Read-only from this crate's perspective: creation and deletion belong to
/// registration tooling outside this workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
}

impl User {
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_exact_value() {
        let name = Username::parse("Alice").unwrap();
        assert_eq!(name.as_str(), "Alice");
        assert_ne!(name, Username::parse("alice").unwrap());
    }

    #[test]
    fn parse_rejects_empty_blank_and_nul() {
        for input in ["", "   ", "\t\n", "a\0b", "\0", "alice\0"] {
            let err = Username::parse(input).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{input:?}");
        }
    }

    #[test]
    fn deserialization_validates() {
        let ok: Username = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(ok.as_str(), "bob");
        assert!(serde_json::from_str::<Username>("\"\"").is_err());
    }

    #[test]
    fn user_round_trips_through_json() {
        let user = User::new(UserId::new(1), Username::parse("alice").unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 1, "username": "alice" }));
    }
}
