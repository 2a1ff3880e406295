use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role. Fixed at signup; there is no role-change operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Owner,
    Admin,
}

impl Role {
    /// Landing view for the role. The client routes here after sign-in.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Owner => "/owner",
            Role::Admin => "/admin",
        }
    }

    /// Whether the caller may enter a screen scoped to `required`.
    /// Admin is granted superuser access to owner- and student-scoped reads.
    pub fn can_access(&self, required: Role) -> bool {
        *self == required || *self == Role::Admin
    }

    /// Whether the role may own listings.
    pub fn can_own_listings(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// Parse stored role text, defaulting unknown values to Student with a
    /// logged warning. This is the single lenient entry point for role text
    /// that is already inside the system (database rows, token claims).
    pub fn parse_lenient(value: &str) -> Role {
        match value.parse() {
            Ok(role) => role,
            Err(_) => {
                tracing::warn!(role = value, "unknown role value, defaulting to STUDENT");
                Role::Student
            }
        }
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    // Case-insensitive: the wire format is SCREAMING_SNAKE_CASE but earlier
    // data stored roles lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Role::Student),
            "OWNER" => Ok(Role::Owner),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Student => "STUDENT",
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

/// Authenticated caller, resolved once per request at the API boundary and
/// passed explicitly to every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

/// Profile record for an authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Student, Role::Owner, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_parse_accepts_lowercase() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
    }

    #[test]
    fn unknown_role_is_rejected_strictly_and_defaulted_leniently() {
        assert!("landlord".parse::<Role>().is_err());
        assert_eq!(Role::parse_lenient("landlord"), Role::Student);
    }

    #[test]
    fn dashboard_mapping() {
        assert_eq!(Role::Student.dashboard_path(), "/student");
        assert_eq!(Role::Owner.dashboard_path(), "/owner");
        assert_eq!(Role::Admin.dashboard_path(), "/admin");
    }

    #[test]
    fn admin_is_superuser_for_scoped_access() {
        assert!(Role::Admin.can_access(Role::Owner));
        assert!(Role::Admin.can_access(Role::Student));
        assert!(!Role::Student.can_access(Role::Owner));
        assert!(!Role::Owner.can_access(Role::Admin));
    }
}
