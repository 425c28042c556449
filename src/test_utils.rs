#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        Account, AccessControl, Participant, Quiz, QuizQuestion, QuizRef, User, UserRole,
    };
    use crate::session::{AccountSession, BearerToken, ParticipantSession};

    /// No account holder and no participant.
    pub fn anonymous() -> (AccountSession, ParticipantSession) {
        (AccountSession::default(), ParticipantSession::default())
    }

    /// Verified member of `account_id`.
    pub fn owner_session(account_id: &str) -> AccountSession {
        AccountSession::verified(
            BearerToken::new("account-token"),
            User::new("u1", "author", "author@example.com", UserRole::Member),
            Some(Account::new(account_id, "Acme")),
        )
    }

    pub fn admin_session() -> AccountSession {
        AccountSession::verified(
            BearerToken::new("admin-token"),
            User::new("u0", "root", "root@example.com", UserRole::Admin),
            None,
        )
    }

    pub fn test_participant() -> Participant {
        Participant {
            id: "p-1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
        }
    }

    /// Verified participant not yet bound to any quiz.
    pub fn participant_session() -> ParticipantSession {
        ParticipantSession::verified(BearerToken::new("participant-token"), test_participant())
    }

    pub fn participant_verified_for(quiz_id: &str) -> ParticipantSession {
        participant_session().with_current_quiz(QuizRef::new(quiz_id))
    }

    /// Public quiz whose questions offer options a to c, ids `{id}-1`, `{id}-2`, ...
    pub fn quiz_with_questions(id: &str, count: usize) -> Quiz {
        let questions = (1..=count)
            .map(|n| QuizQuestion {
                id: format!("{}-{}", id, n),
                question_text: format!("Question {}", n),
                option_a: "first".to_string(),
                option_b: "second".to_string(),
                option_c: Some("third".to_string()),
                option_d: None,
                option_e: Some(String::new()),
                correct_answer: Some("a".to_string()),
            })
            .collect::<Vec<_>>();

        Quiz {
            id: id.to_string(),
            account_id: Some("a1".to_string()),
            group: None,
            order: 0,
            title: format!("Quiz {}", id),
            topic: "testing".to_string(),
            difficulty: Some("easy".to_string()),
            question_count: count as u32,
            access_control: AccessControl::Public,
            is_published: true,
            quiz_type: Some("stepwise".to_string()),
            display_results: true,
            is_timed: false,
            quiz_time_limit: None,
            questions,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::session::SessionData;

    #[test]
    fn test_fixture_sessions_are_verified() {
        assert!(owner_session("a1").is_verified());
        assert!(admin_session().is_admin());
        assert!(participant_verified_for("q1").is_verified_for("q1"));

        let (account, participant) = anonymous();
        assert!(!account.is_authenticated());
        assert!(!participant.is_authenticated());
    }

    #[test]
    fn test_fixture_quiz_questions() {
        let quiz = quiz_with_questions("q1", 3);
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.questions[2].id, "q1-3");
        // The blank option e is not offered.
        assert_eq!(quiz.questions[0].options().len(), 3);
    }
}
