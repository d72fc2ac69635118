//! Authorization roles stored in the `user_roles` table.

use serde::{Deserialize, Serialize};

use super::id::{UserId, UserRoleId};

/// Permission label attached to a user.
///
/// Only [`Role::Admin`] unlocks the admin panel. Labels this build does not
/// know about decode as [`Role::Other`] instead of failing the whole row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Other,
}

impl Role {
    /// The label as stored in the table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// A `(user, role)` association row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: UserRoleId,
    pub user_id: UserId,
    pub role: Role,
}

/// Insert payload for a role grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUserRole {
    pub user_id: UserId,
    pub role: Role,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_unknown_role_decodes_as_other() {
        let role: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, Role::Other);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("other".parse::<Role>().is_err());
    }
}
