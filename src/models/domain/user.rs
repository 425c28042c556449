use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    #[serde(other)]
    Member,
}

/// Account-holder profile as returned by `GET /user/profile/`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, alias = "account_id", deserialize_with = "deserialize_optional_id")]
    pub account: Option<String>,
}

impl User {
    pub fn new(id: &str, username: &str, email: &str, role: UserRole) -> Self {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            account: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Owning account of quizzes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(id: &str, name: &str) -> Self {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            owner_email: None,
            created_at: None,
        }
    }
}

#[cfg(test)]
impl User {
    pub fn assert_fields(&self, id: &str, username: &str, role: UserRole) {
        assert_eq!(self.id, id);
        assert_eq!(self.username, username);
        assert_eq!(self.role, role);
    }
}
