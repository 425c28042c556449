use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    access::decision::{AccessDecision, AccessReason},
    errors::ClientResult,
    models::domain::{AccessControl, QuizMetadata},
    router::View,
    session::{AccountSession, ParticipantSession, SessionData},
};

/// Where quiz metadata comes from. The HTTP-backed implementation is
/// `QuizService`; tests substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizMetadataSource: Send + Sync {
    async fn fetch_quiz_metadata(&self, quiz_id: &str) -> ClientResult<QuizMetadata>;
}

/// Decides whether the current visitor may enter a quiz. Holds no session
/// state of its own: callers pass snapshots in and act on the decision.
#[derive(Clone)]
pub struct AccessResolver {
    source: Arc<dyn QuizMetadataSource>,
}

impl AccessResolver {
    pub fn new(source: Arc<dyn QuizMetadataSource>) -> Self {
        Self { source }
    }

    /// Fetches the quiz's metadata and decides. Never fails: a fetch error is
    /// a `NetworkError` denial.
    pub async fn resolve(
        &self,
        quiz_id: &str,
        account: &AccountSession,
        participant: &ParticipantSession,
    ) -> AccessDecision {
        let quiz = match self.source.fetch_quiz_metadata(quiz_id).await {
            Ok(quiz) => quiz,
            Err(e) => {
                log::error!("Failed to load quiz {} for access check: {}", quiz_id, e);
                return AccessDecision::network_error();
            }
        };

        let decision = Self::decide(quiz_id, &quiz, account, participant);
        log::debug!(
            "Access to quiz {} ({}): allowed={} reason={}",
            quiz_id,
            quiz.access_control.as_str(),
            decision.allowed,
            decision.reason
        );
        decision
    }

    /// The decision table over already-fetched metadata. Invitations are
    /// matched against the requested `quiz_id`, not the id the backend echoed.
    pub fn decide(
        quiz_id: &str,
        quiz: &QuizMetadata,
        account: &AccountSession,
        participant: &ParticipantSession,
    ) -> AccessDecision {
        if quiz.id != quiz_id {
            log::warn!("Metadata for quiz {} came back with id {}", quiz_id, quiz.id);
        }

        if account.owns_or_administers(quiz.account_id.as_deref()) {
            return AccessDecision::allow(AccessReason::OwnerOrAdminBypass);
        }

        match &quiz.access_control {
            AccessControl::Public => AccessDecision::allow(AccessReason::Public),
            AccessControl::LoginRequired => {
                if participant.is_verified() {
                    AccessDecision::allow(AccessReason::ParticipantAuthenticated)
                } else {
                    AccessDecision::deny(AccessReason::AuthRequired, View::AccessGate)
                }
            }
            AccessControl::Invitation | AccessControl::Password | AccessControl::Unknown(_) => {
                if let AccessControl::Unknown(raw) = &quiz.access_control {
                    log::warn!(
                        "Quiz {} has unrecognised access_control '{}'; treating as invitation",
                        quiz_id,
                        raw
                    );
                }
                if participant.is_verified_for(quiz_id) {
                    AccessDecision::allow(AccessReason::InvitationVerified)
                } else {
                    AccessDecision::deny(AccessReason::NotInvited, View::AccessGate)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::test_utils::fixtures::{
        admin_session, anonymous, owner_session, participant_session, participant_verified_for,
    };
    use mockall::predicate::eq;

    fn resolver_returning(meta: QuizMetadata) -> AccessResolver {
        let mut source = MockQuizMetadataSource::new();
        let id = meta.id.clone();
        source
            .expect_fetch_quiz_metadata()
            .with(eq(id))
            .returning(move |_| Ok(meta.clone()));
        AccessResolver::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_public_quiz_with_no_sessions() {
        let resolver = resolver_returning(QuizMetadata::new("q1", Some("a1"), AccessControl::Public));
        let (account, participant) = anonymous();

        let decision = resolver.resolve("q1", &account, &participant).await;
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::Public);
    }

    #[tokio::test]
    async fn test_login_required_without_participant() {
        let resolver = resolver_returning(QuizMetadata::new("q2", None, AccessControl::LoginRequired));
        let (account, participant) = anonymous();

        let decision = resolver.resolve("q2", &account, &participant).await;
        assert_eq!(
            decision,
            AccessDecision::deny(AccessReason::AuthRequired, View::AccessGate)
        );
    }

    #[tokio::test]
    async fn test_owner_bypasses_invitation() {
        let resolver = resolver_returning(QuizMetadata::new("q3", Some("a9"), AccessControl::Invitation));
        let (_, participant) = anonymous();

        let decision = resolver.resolve("q3", &owner_session("a9"), &participant).await;
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::OwnerOrAdminBypass);
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mut source = MockQuizMetadataSource::new();
        source
            .expect_fetch_quiz_metadata()
            .times(1)
            .returning(|_| {
                Err(ClientError::NetworkError(
                    "server returned 500: Internal Server Error".into(),
                ))
            });
        let resolver = AccessResolver::new(Arc::new(source));
        let (account, participant) = anonymous();

        let decision = resolver.resolve("q1", &account, &participant).await;
        assert_eq!(decision, AccessDecision::network_error());
    }

    #[tokio::test]
    async fn test_not_found_never_allows() {
        let mut source = MockQuizMetadataSource::new();
        source
            .expect_fetch_quiz_metadata()
            .returning(|id| Err(ClientError::NotFound(format!("quiz {}", id))));
        let resolver = AccessResolver::new(Arc::new(source));

        let decision = resolver
            .resolve("missing", &admin_session(), &participant_verified_for("missing"))
            .await;
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let resolver = resolver_returning(QuizMetadata::new("q4", Some("a1"), AccessControl::Invitation));
        let account = owner_session("a2");
        let participant = participant_verified_for("q4");

        let first = resolver.resolve("q4", &account, &participant).await;
        let second = resolver.resolve("q4", &account, &participant).await;
        assert_eq!(first, second);
        assert_eq!(first.reason, AccessReason::InvitationVerified);
    }

    #[test]
    fn test_admin_bypasses_any_policy() {
        let quiz = QuizMetadata::new("q5", Some("other"), AccessControl::Unknown("secret".into()));
        let (_, participant) = anonymous();

        let decision = AccessResolver::decide(&quiz.id, &quiz, &admin_session(), &participant);
        assert!(decision.is_owner_bypass());
    }

    #[test]
    fn test_login_required_needs_verified_participant() {
        let quiz = QuizMetadata::new("q6", None, AccessControl::LoginRequired);
        let (account, _) = anonymous();

        let verified = AccessResolver::decide(&quiz.id, &quiz, &account, &participant_session());
        assert_eq!(verified.reason, AccessReason::ParticipantAuthenticated);

        let raw = ParticipantSession::unverified(crate::session::BearerToken::new("t"));
        let denied = AccessResolver::decide(&quiz.id, &quiz, &account, &raw);
        assert_eq!(denied.reason, AccessReason::AuthRequired);
    }

    #[test]
    fn test_invitation_for_other_quiz_is_denied() {
        let quiz = QuizMetadata::new("q7", None, AccessControl::Invitation);
        let (account, _) = anonymous();

        let decision = AccessResolver::decide(&quiz.id, &quiz, &account, &participant_verified_for("q8"));
        assert_eq!(
            decision,
            AccessDecision::deny(AccessReason::NotInvited, View::AccessGate)
        );
    }

    #[test]
    fn test_password_and_unknown_fail_closed() {
        let (account, participant) = anonymous();
        for policy in [
            AccessControl::Password,
            AccessControl::Unknown("members_only".into()),
            AccessControl::default(),
        ] {
            let quiz = QuizMetadata::new("q9", None, policy);
            let decision = AccessResolver::decide(&quiz.id, &quiz, &account, &participant);
            assert!(!decision.allowed);
            assert_eq!(decision.reason, AccessReason::NotInvited);
        }

        let quiz = QuizMetadata::new("q9", None, AccessControl::Password);
        let decision = AccessResolver::decide(&quiz.id, &quiz, &account, &participant_verified_for("q9"));
        assert!(decision.allowed);
    }

    #[test]
    fn test_unverified_owner_gets_no_bypass() {
        let quiz = QuizMetadata::new("q10", Some("a1"), AccessControl::Invitation);
        let mut account = AccountSession::unverified(crate::session::BearerToken::new("t"));
        account.account = owner_session("a1").account;
        let (_, participant) = anonymous();

        let decision = AccessResolver::decide(&quiz.id, &quiz, &account, &participant);
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn test_invitation_matches_requested_id() {
        let mut source = MockQuizMetadataSource::new();
        source
            .expect_fetch_quiz_metadata()
            .returning(|_| Ok(QuizMetadata::new("canonical-11", None, AccessControl::Invitation)));
        let resolver = AccessResolver::new(Arc::new(source));
        let (account, _) = anonymous();

        let requested = resolver
            .resolve("q11", &account, &participant_verified_for("q11"))
            .await;
        assert_eq!(requested.reason, AccessReason::InvitationVerified);

        let echoed = resolver
            .resolve("q11", &account, &participant_verified_for("canonical-11"))
            .await;
        assert_eq!(echoed.reason, AccessReason::NotInvited);
    }
}
