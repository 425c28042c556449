use chrono::{DateTime, Utc};

use crate::models::domain::{Participant, QuizRef};
use crate::session::{BearerToken, SessionData, SessionKind};

/// Snapshot of the quiz-taker identity.
#[derive(Clone, Debug, Default)]
pub struct ParticipantSession {
    pub token: Option<BearerToken>,
    pub participant: Option<Participant>,
    /// Quiz the participant passed an invitation or password check for.
    pub current_quiz: Option<QuizRef>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl ParticipantSession {
    pub fn verified(token: BearerToken, participant: Participant) -> Self {
        ParticipantSession {
            token: Some(token),
            participant: Some(participant),
            current_quiz: None,
            verified_at: Some(Utc::now()),
        }
    }

    pub fn with_current_quiz(mut self, quiz: QuizRef) -> Self {
        self.current_quiz = Some(quiz);
        self
    }

    pub fn participant_id(&self) -> Option<&str> {
        self.participant.as_ref().map(|p| p.id.as_str())
    }

    /// Verified session whose access check was completed for `quiz_id`.
    pub fn is_verified_for(&self, quiz_id: &str) -> bool {
        self.is_verified()
            && self
                .current_quiz
                .as_ref()
                .map(|quiz| quiz.id == quiz_id)
                .unwrap_or(false)
    }
}

impl SessionData for ParticipantSession {
    const KIND: SessionKind = SessionKind::Participant;

    fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    fn unverified(token: BearerToken) -> Self {
        ParticipantSession {
            token: Some(token),
            ..Default::default()
        }
    }

    fn is_verified(&self) -> bool {
        self.token.is_some() && self.verified_at.is_some()
    }
}
