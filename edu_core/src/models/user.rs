//! Platform accounts: staff, parents and students

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Record;
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Parent,
    #[default]
    Student,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Teacher => write!(f, "teacher"),
            UserRole::Parent => write!(f, "parent"),
            UserRole::Student => write!(f, "student"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "parent" => Ok(UserRole::Parent),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 100, message = "Display name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank", message = "Display name cannot be blank")
    )]
    pub display_name: String,

    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(
        length(min = 1, max = 100, message = "Display name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank", message = "Display name cannot be blank")
    )]
    pub display_name: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,
}

/// Emails compare case-insensitively, so they are stored lowercased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Record for User {
    type CreateInput = CreateUserInput;
    type UpdateInput = UpdateUserInput;

    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn materialize(id: String, input: CreateUserInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: normalize_email(&input.email),
            display_name: input.display_name,
            role: input.role.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: UpdateUserInput, now: DateTime<Utc>) {
        if let Some(display_name) = input.display_name {
            self.display_name = display_name;
        }
        if let Some(role) = input.role {
            self.role = role;
        }
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            display_name: "Ada".to_string(),
            role: None,
        }
    }

    #[test]
    fn test_user_role_conversion() {
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
        assert_eq!("parent".parse::<UserRole>().unwrap(), UserRole::Parent);
        assert!("Principal".parse::<UserRole>().is_err());
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
    }

    #[test]
    fn test_create_input_validation() {
        assert!(input("ada@example.com").validate().is_ok());
        assert!(input("not-an-email").validate().is_err());

        let blank = CreateUserInput {
            display_name: "  ".to_string(),
            ..input("ada@example.com")
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_materialize_defaults() {
        let user = User::materialize("u-1".to_string(), input(" Ada@Example.COM "), Utc::now());
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, UserRole::Student);
        assert!(user.is_active);
        assert_eq!(user.unique_key().as_deref(), Some("ada@example.com"));
    }
}
