use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};
use crate::models::domain::user::User;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    #[serde(other)]
    Member,
}

/// One user's membership of an account, as listed on the Users page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account: Option<String>,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default)]
    pub invited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_connected: Option<DateTime<Utc>>,
}

impl Member {
    /// Invited but never joined.
    pub fn is_pending(&self) -> bool {
        self.joined_at.is_none()
    }

    pub fn can_manage(&self) -> bool {
        matches!(self.role, MemberRole::Owner | MemberRole::Admin)
    }
}
