use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::models::domain::AccessControl;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ParticipantLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ParticipantRegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct PasswordAccess {
    #[validate(length(min = 1, message = "Password is required for this quiz."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct EmailAccess {
    #[validate(email(message = "Please provide your email to verify invitation."))]
    pub email: String,
}

/// Body of `POST /quizzes/{id}/verify-access/`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum VerifyAccessRequest {
    Password(PasswordAccess),
    Email(EmailAccess),
}

impl VerifyAccessRequest {
    pub fn password(password: &str) -> Self {
        VerifyAccessRequest::Password(PasswordAccess {
            password: password.to_string(),
        })
    }

    pub fn email(email: &str) -> Self {
        VerifyAccessRequest::Email(EmailAccess {
            email: email.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            VerifyAccessRequest::Password(inner) => inner.validate(),
            VerifyAccessRequest::Email(inner) => inner.validate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1, max = 255))]
    pub topic: String,

    #[validate(range(min = 1, max = 100))]
    pub question_count: u32,

    #[validate(range(min = 2, max = 5))]
    pub option_count: u32,

    pub difficulty: String,

    pub access_control: AccessControl,

    pub quiz_type: String,

    pub display_results: bool,

    pub is_timed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub quiz_time_limit: Option<u32>,
}

impl CreateQuizRequest {
    pub fn new(title: &str, topic: &str) -> Self {
        CreateQuizRequest {
            title: title.to_string(),
            topic: topic.to_string(),
            question_count: 5,
            option_count: 4,
            difficulty: "easy".to_string(),
            access_control: AccessControl::Public,
            quiz_type: "multiple-choice".to_string(),
            display_results: true,
            is_timed: false,
            quiz_time_limit: None,
        }
    }
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateQuizRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub topic: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<AccessControl>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_results: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEntry {
    pub id: String,
    pub order: u32,
}

impl OrderEntry {
    /// Entries numbered by their position in `ids`.
    pub fn from_ids<I, S>(ids: I) -> Vec<OrderEntry>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ids.into_iter()
            .enumerate()
            .map(|(order, id)| OrderEntry {
                id: id.into(),
                order: order as u32,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOrderRequest {
    pub quiz_orders: Vec<OrderEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupOrderRequest {
    pub group_orders: Vec<OrderEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveToGroupRequest {
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RenameGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateGroupColorRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    pub quiz_id: String,
    pub answers: Vec<Option<String>>,
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}
