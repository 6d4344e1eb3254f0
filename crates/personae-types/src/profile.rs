use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// What a signed-in user may do.
///
/// - User: chat with any agent
/// - Creator: additionally create agents and manage their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    User,
    Creator,
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileRole::User => write!(f, "user"),
            ProfileRole::Creator => write!(f, "creator"),
        }
    }
}

impl FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ProfileRole::User),
            "creator" => Ok(ProfileRole::Creator),
            other => Err(format!("invalid profile role: '{other}'")),
        }
    }
}

impl Default for ProfileRole {
    fn default() -> Self {
        ProfileRole::User
    }
}

/// A signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub role: ProfileRole,
    pub created_at: DateTime<Utc>,
}

/// Request body for `PUT /api/v1/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [ProfileRole::User, ProfileRole::Creator] {
            let parsed: ProfileRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_role_default() {
        assert_eq!(ProfileRole::default(), ProfileRole::User);
    }
}
