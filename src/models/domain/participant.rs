use serde::{Deserialize, Serialize};

use crate::models::domain::ids::{deserialize_id, deserialize_optional_id};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Participant {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Participant {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Participant")
    }
}

/// Credential exchange result shared by participant login, registration and
/// quiz access verification.
#[derive(Clone, Deserialize)]
pub struct ParticipantAuthResponse {
    pub token: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub participant_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ParticipantAuthResponse {
    pub fn participant(&self) -> Participant {
        Participant {
            id: self.participant_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for ParticipantAuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantAuthResponse")
            .field("token", &"[REDACTED]")
            .field("participant_id", &self.participant_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}

/// Quiz a participant has been verified against in the current session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub account_id: Option<String>,
}

impl QuizRef {
    pub fn new(id: &str) -> Self {
        QuizRef {
            id: id.to_string(),
            account_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_builds_participant() {
        let response: ParticipantAuthResponse = serde_json::from_str(
            r#"{"token": "abc.def", "participant_id": "p-1", "name": "Ada", "email": "ada@example.com"}"#,
        )
        .unwrap();

        let participant = response.participant();
        assert_eq!(participant.id, "p-1");
        assert_eq!(participant.display_name(), "Ada");
    }

    #[test]
    fn auth_response_debug_hides_token() {
        let response: ParticipantAuthResponse =
            serde_json::from_str(r#"{"token": "secret-token", "participant_id": 5}"#).unwrap();

        let rendered = format!("{:?}", response);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("\"5\""));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let participant = Participant {
            id: "p".to_string(),
            name: None,
            email: Some("x@example.com".to_string()),
        };
        assert_eq!(participant.display_name(), "x@example.com");
    }
}
