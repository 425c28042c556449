use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};

/// Account credential exchange. The backend issues a JWT pair; only the
/// access token is kept since refresh is not performed client-side.
#[derive(Clone, Deserialize)]
pub struct AccountTokenResponse {
    #[serde(alias = "access")]
    pub token: String,
}

impl std::fmt::Debug for AccountTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountTokenResponse")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionResult {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedQuiz {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub quiz: String,
    pub share_link: String,
    #[serde(default)]
    pub requires_authentication: bool,
}
