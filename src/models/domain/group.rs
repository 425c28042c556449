use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};
use crate::models::domain::quiz::Quiz;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
}

pub fn default_color() -> String {
    "#FFFFFF".to_string()
}
