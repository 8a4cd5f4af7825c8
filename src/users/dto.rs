use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{Role, User};
use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Vec::new();
        if self.username.len() < 3 || self.username.len() > 30 {
            violations.push("username: must be between 3 and 30 characters".to_string());
        }
        if !is_valid_email(&self.email) {
            violations.push("email: must be a valid email address".to_string());
        }
        if self.password.len() < 6 {
            violations.push("password: must be at least 6 characters".to_string());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(violations))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Vec::new();
        if !is_valid_email(&self.email) {
            violations.push("email: must be a valid email address".to_string());
        }
        if self.password.is_empty() {
            violations.push("password: is required".to_string());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(violations))
        }
    }
}

/// User record with the password hash omitted. The only user shape that ever
/// leaves the service.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_valid_input() {
        let req = RegisterRequest {
            username: "bob".into(),
            email: "bob@x.com".into(),
            password: "secret1".into(),
            role: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_aggregates_every_violation() {
        let req = RegisterRequest {
            username: "te".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            role: None,
        };
        let err = req.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid input data."));
        assert!(msg.contains("username:"));
        assert!(msg.contains("email:"));
        assert!(msg.contains("password:"));
    }

    #[test]
    fn login_requires_valid_email_and_password() {
        let req = LoginRequest {
            email: "nope".into(),
            password: "".into(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("email:"));
        assert!(err.to_string().contains("password:"));
    }

    #[test]
    fn public_user_never_serializes_password() {
        let user = User {
            id: Uuid::new_v4(),
            username: "bob".into(),
            email: "bob@x.com".into(),
            password_hash: "hash".into(),
            role: Role::User,
        };
        let json = serde_json::to_string(&PublicUser::from(&user)).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
