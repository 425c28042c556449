use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};
use crate::models::domain::quiz_question::QuizQuestion;

/// Per-quiz policy governing who may take it.
///
/// Unrecognised backend values are kept as `Unknown` rather than rejected so
/// the access resolver can deny them explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum AccessControl {
    Public,
    LoginRequired,
    Invitation,
    Password,
    Unknown(String),
}

impl AccessControl {
    pub fn as_str(&self) -> &str {
        match self {
            AccessControl::Public => "public",
            AccessControl::LoginRequired => "login_required",
            AccessControl::Invitation => "invitation",
            AccessControl::Password => "password",
            AccessControl::Unknown(raw) => raw,
        }
    }
}

impl Default for AccessControl {
    fn default() -> Self {
        AccessControl::Unknown(String::new())
    }
}

impl From<String> for AccessControl {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "public" => AccessControl::Public,
            "login_required" => AccessControl::LoginRequired,
            "invitation" => AccessControl::Invitation,
            "password" => AccessControl::Password,
            _ => AccessControl::Unknown(raw),
        }
    }
}

impl From<AccessControl> for String {
    fn from(access: AccessControl) -> Self {
        match access {
            AccessControl::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

/// How the quiz-taking view walks through questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationMode {
    Stepwise,
    AllAtOnce,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "account", deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub group: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub access_control: AccessControl,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub quiz_type: Option<String>,
    #[serde(default)]
    pub display_results: bool,
    #[serde(default)]
    pub is_timed: bool,
    #[serde(default)]
    pub quiz_time_limit: Option<u32>, // minutes
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn presentation_mode(&self) -> PresentationMode {
        match self.quiz_type.as_deref() {
            Some("stepwise") => PresentationMode::Stepwise,
            _ => PresentationMode::AllAtOnce,
        }
    }

    pub fn metadata(&self) -> QuizMetadata {
        QuizMetadata {
            id: self.id.clone(),
            account_id: self.account_id.clone(),
            access_control: self.access_control.clone(),
            is_published: self.is_published,
        }
    }
}

/// Read-only projection of a quiz used for access decisions. Fetched once
/// per navigation and never cached beyond it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizMetadata {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "account", deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub access_control: AccessControl,
    #[serde(default)]
    pub is_published: bool,
}

impl QuizMetadata {
    pub fn new(id: &str, account_id: Option<&str>, access_control: AccessControl) -> Self {
        QuizMetadata {
            id: id.to_string(),
            account_id: account_id.map(str::to_string),
            access_control,
            is_published: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_control_parses_known_values() {
        let parsed: AccessControl = serde_json::from_str("\"login_required\"").unwrap();
        assert_eq!(parsed, AccessControl::LoginRequired);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"login_required\"");
    }

    #[test]
    fn access_control_keeps_unknown_values() {
        let parsed: AccessControl = serde_json::from_str("\"members_only\"").unwrap();
        assert_eq!(parsed, AccessControl::Unknown("members_only".to_string()));
        assert_eq!(parsed.as_str(), "members_only");
    }

    #[test]
    fn metadata_defaults_fail_closed_when_policy_missing() {
        let meta: QuizMetadata = serde_json::from_str(r#"{"id": "q1"}"#).unwrap();
        assert!(matches!(meta.access_control, AccessControl::Unknown(_)));
        assert!(meta.account_id.is_none());
        assert!(!meta.is_published);
    }

    #[test]
    fn quiz_from_backend_payload() {
        let payload = r#"{
            "id": "qz_1",
            "account": 9,
            "group": null,
            "title": "Rust basics",
            "topic": "rust",
            "question_count": 2,
            "access_control": "invitation",
            "is_published": true,
            "quiz_type": "stepwise",
            "questions": [
                {"id": 1, "question_text": "2+2?", "option_a": "3", "option_b": "4", "correct_answer": "b"}
            ]
        }"#;

        let quiz: Quiz = serde_json::from_str(payload).unwrap();
        assert_eq!(quiz.account_id.as_deref(), Some("9"));
        assert_eq!(quiz.presentation_mode(), PresentationMode::Stepwise);
        assert_eq!(quiz.questions.len(), 1);

        let meta = quiz.metadata();
        assert_eq!(meta.id, "qz_1");
        assert_eq!(meta.access_control, AccessControl::Invitation);
    }

    #[test]
    fn presentation_mode_defaults_to_all_at_once() {
        let quiz: Quiz = serde_json::from_str(r#"{"id": "q", "quiz_type": "multiple-choice"}"#).unwrap();
        assert_eq!(quiz.presentation_mode(), PresentationMode::AllAtOnce);
    }
}
