use serde::Deserialize;

use super::repo::TodoStatus;
use crate::error::AppError;

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const STATUS_VALUES: &str = "pending, in-progress, completed";

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Vec::new();
        check_title(&self.title, &mut violations);
        if let Some(description) = &self.description {
            check_description(description, &mut violations);
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(violations))
        }
    }
}

/// Update payload. Owner, id and creation time are not representable here;
/// unknown JSON fields are ignored on deserialization, so a client sending
/// them changes nothing. `status` stays a plain string so an unknown value
/// fails validation with the envelope message, not a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Vec::new();
        if let Some(title) = &self.title {
            check_title(title, &mut violations);
        }
        if let Some(description) = &self.description {
            check_description(description, &mut violations);
        }
        if let Some(status) = &self.status {
            if status.parse::<TodoStatus>().is_err() {
                violations.push(status_violation());
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(violations))
        }
    }

    /// The parsed status, if one was supplied.
    pub fn status_value(&self) -> Result<Option<TodoStatus>, AppError> {
        match &self.status {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::invalid_input(vec![status_violation()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

fn status_violation() -> String {
    format!("status: must be one of {STATUS_VALUES}")
}

fn check_title(title: &str, violations: &mut Vec<String>) {
    if title.is_empty() || title.len() > TITLE_MAX {
        violations.push(format!("title: must be between 1 and {TITLE_MAX} characters"));
    }
}

fn check_description(description: &str, violations: &mut Vec<String>) {
    if description.len() > DESCRIPTION_MAX {
        violations.push(format!(
            "description: must be at most {DESCRIPTION_MAX} characters"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_empty_and_oversized_titles() {
        let empty = CreateTodoRequest {
            title: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let oversized = CreateTodoRequest {
            title: "x".repeat(101),
            description: None,
        };
        assert!(oversized.validate().is_err());

        let ok = CreateTodoRequest {
            title: "Buy milk".into(),
            description: Some("2 liters".into()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let req: UpdateTodoRequest = serde_json::from_str(
            r#"{"id":"x","userId":"y","createdAt":"z","title":"new"}"#,
        )
        .unwrap();
        assert_eq!(req.title.as_deref(), Some("new"));
        assert!(req.description.is_none());
        assert!(req.status.is_none());
    }

    #[test]
    fn update_with_no_known_fields_is_empty() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn status_parses_from_wire_names() {
        let req: UpdateTodoRequest =
            serde_json::from_str(r#"{"status":"in-progress"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.status_value().unwrap(), Some(TodoStatus::InProgress));
    }

    #[test]
    fn unknown_status_is_a_validation_failure() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        let err = req.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid input data."));
        assert!(msg.contains("status:"));
        assert!(req.status_value().is_err());
    }
}
