use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ProfileError;
use crate::identity::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub rating: f64,
    pub completed_jobs: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// First-login profile completion. Role is chosen once here and never again.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompleteProfileInput {
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Self-service edit of display fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

pub(crate) fn check_full_name(name: &str) -> Result<(), ProfileError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(ProfileError::Validation("full_name required".into()));
    }
    if len > 128 {
        return Err(ProfileError::Validation("full_name too long (<=128)".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_rejects_role_field() {
        let res: Result<ProfileUpdate, _> =
            serde_json::from_value(serde_json::json!({ "full_name": "Ana", "role": "admin" }));
        assert!(res.is_err());
    }

    #[test]
    fn complete_input_parses_role() {
        let input: CompleteProfileInput =
            serde_json::from_value(serde_json::json!({ "full_name": "Beto", "role": "specialist" })).unwrap();
        assert_eq!(input.role, Role::Specialist);
        assert!(input.phone.is_none());
    }

    #[test]
    fn full_name_bounds() {
        assert!(check_full_name("  ").is_err());
        assert!(check_full_name(&"x".repeat(129)).is_err());
        assert!(check_full_name("Maria da Silva").is_ok());
    }
}
