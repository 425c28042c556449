use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub participant_id: Option<String>,
    #[serde(default = "anonymous")]
    pub participant_name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub needs_manual_grading: bool,
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

impl QuizAttempt {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}
