use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use formship_client::{
    access::{AccessDecision, AccessReason, AccessResolver, NavigationCoordinator, QuizMetadataSource},
    errors::{ClientError, ClientResult},
    models::domain::{AccessControl, Account, Participant, QuizMetadata, QuizRef, User, UserRole},
    router::View,
    session::{
        AccountSession, BearerToken, MemoryTokenStorage, ParticipantSession, Sessions, TokenStorage,
    },
};

struct InMemoryQuizSource {
    quizzes: RwLock<HashMap<String, QuizMetadata>>,
    fetches: AtomicUsize,
    delay: Duration,
}

impl InMemoryQuizSource {
    fn new(quizzes: Vec<QuizMetadata>) -> Self {
        Self {
            quizzes: RwLock::new(quizzes.into_iter().map(|q| (q.id.clone(), q)).collect()),
            fetches: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizMetadataSource for InMemoryQuizSource {
    async fn fetch_quiz_metadata(&self, quiz_id: &str) -> ClientResult<QuizMetadata> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if quiz_id == "broken" {
            return Err(ClientError::NetworkError("server returned 500".to_string()));
        }
        self.quizzes
            .read()
            .await
            .get(quiz_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("quiz {}", quiz_id)))
    }
}

fn quiz(id: &str, account: Option<&str>, access: AccessControl) -> QuizMetadata {
    QuizMetadata::new(id, account, access)
}

fn catalogue() -> Vec<QuizMetadata> {
    vec![
        quiz("q1", Some("a1"), AccessControl::Public),
        quiz("q2", None, AccessControl::LoginRequired),
        quiz("q3", Some("a9"), AccessControl::Invitation),
        quiz("q4", Some("a1"), AccessControl::Password),
        quiz("q5", Some("a1"), AccessControl::Unknown("members_only".to_string())),
    ]
}

fn owner(account_id: &str) -> AccountSession {
    AccountSession::verified(
        BearerToken::new("acct"),
        User::new("u1", "author", "author@example.com", UserRole::Member),
        Some(Account::new(account_id, "Acme")),
    )
}

fn admin() -> AccountSession {
    AccountSession::verified(
        BearerToken::new("admin"),
        User::new("u0", "root", "root@example.com", UserRole::Admin),
        None,
    )
}

fn participant(current_quiz: Option<&str>) -> ParticipantSession {
    let session = ParticipantSession::verified(
        BearerToken::new("part"),
        Participant {
            id: "p-1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
        },
    );
    match current_quiz {
        Some(id) => session.with_current_quiz(QuizRef::new(id)),
        None => session,
    }
}

fn account_sessions() -> Vec<AccountSession> {
    vec![AccountSession::default(), owner("a1"), owner("a2"), owner("a9"), admin()]
}

fn participant_sessions() -> Vec<ParticipantSession> {
    vec![
        ParticipantSession::default(),
        participant(None),
        participant(Some("q1")),
        participant(Some("q3")),
    ]
}

fn resolver() -> AccessResolver {
    AccessResolver::new(Arc::new(InMemoryQuizSource::new(catalogue())))
}

#[tokio::test]
async fn public_quizzes_are_always_allowed() {
    let resolver = resolver();
    for account in account_sessions() {
        for participant in participant_sessions() {
            let decision = resolver.resolve("q1", &account, &participant).await;
            assert!(decision.allowed, "denied for {:?} / {:?}", account, participant);
        }
    }
}

#[tokio::test]
async fn owners_and_admins_bypass_every_policy() {
    let resolver = resolver();
    let anonymous = ParticipantSession::default();

    let decision = resolver.resolve("q3", &owner("a9"), &anonymous).await;
    assert_eq!(decision, AccessDecision::allow(AccessReason::OwnerOrAdminBypass));

    for id in ["q2", "q3", "q4", "q5"] {
        let decision = resolver.resolve(id, &admin(), &anonymous).await;
        assert!(decision.is_owner_bypass(), "{} not bypassed for admin", id);
    }
    for id in ["q4", "q5"] {
        let decision = resolver.resolve(id, &owner("a1"), &anonymous).await;
        assert!(decision.is_owner_bypass(), "{} not bypassed for owner", id);
    }
}

#[tokio::test]
async fn login_required_redirects_to_access_gate() {
    let resolver = resolver();

    let decision = resolver
        .resolve("q2", &AccountSession::default(), &ParticipantSession::default())
        .await;
    assert!(!decision.allowed);
    assert_eq!(decision.redirect_target, Some(View::AccessGate));
    assert_eq!(decision.reason, AccessReason::AuthRequired);

    let decision = resolver
        .resolve("q2", &AccountSession::default(), &participant(None))
        .await;
    assert_eq!(decision.reason, AccessReason::ParticipantAuthenticated);
}

#[tokio::test]
async fn invitation_is_bound_to_one_quiz() {
    let resolver = resolver();
    let account = owner("a2");

    let other = resolver.resolve("q3", &account, &participant(Some("q1"))).await;
    assert_eq!(other, AccessDecision::deny(AccessReason::NotInvited, View::AccessGate));

    let invited = resolver.resolve("q3", &account, &participant(Some("q3"))).await;
    assert_eq!(invited.reason, AccessReason::InvitationVerified);
}

#[tokio::test]
async fn unknown_and_password_policies_fail_closed() {
    let resolver = resolver();
    for id in ["q4", "q5"] {
        for participant in participant_sessions() {
            let decision = resolver.resolve(id, &owner("a2"), &participant).await;
            assert!(!decision.allowed, "{} allowed for {:?}", id, participant);
        }
    }
}

#[tokio::test]
async fn fetch_failures_never_allow() {
    let resolver = resolver();
    for account in account_sessions() {
        let decision = resolver.resolve("broken", &account, &participant(Some("broken"))).await;
        assert_eq!(decision, AccessDecision::network_error());

        let decision = resolver.resolve("missing", &account, &participant(None)).await;
        assert!(!decision.allowed);
        assert_eq!(decision.reason, AccessReason::NetworkError);
    }
}

#[tokio::test]
async fn resolve_is_idempotent_over_the_whole_matrix() {
    let resolver = resolver();
    for id in ["q1", "q2", "q3", "q4", "q5", "broken"] {
        for account in account_sessions() {
            for participant in participant_sessions() {
                let first = resolver.resolve(id, &account, &participant).await;
                let second = resolver.resolve(id, &account, &participant).await;
                assert_eq!(first, second);
            }
        }
    }
}

fn coordinator(source: Arc<InMemoryQuizSource>) -> NavigationCoordinator {
    let storage: Arc<dyn TokenStorage> = Arc::new(MemoryTokenStorage::new());
    NavigationCoordinator::new(AccessResolver::new(source), Sessions::new(storage))
}

#[tokio::test]
async fn concurrent_navigations_share_a_single_fetch() {
    let source = Arc::new(InMemoryQuizSource::new(catalogue()).with_delay(Duration::from_millis(25)));
    let coordinator = Arc::new(coordinator(source.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.resolve_shared("q2").await })
        })
        .collect();

    for handle in handles {
        let decision = handle.await.unwrap();
        assert_eq!(decision.reason, AccessReason::AuthRequired);
    }
    assert_eq!(source.fetches(), 1);
    assert_eq!(coordinator.in_flight_count().await, 0);
}

#[tokio::test]
async fn different_quizzes_resolve_independently() {
    let source = Arc::new(InMemoryQuizSource::new(catalogue()).with_delay(Duration::from_millis(10)));
    let coordinator = coordinator(source.clone());

    let (public, gated) = tokio::join!(coordinator.resolve_shared("q1"), coordinator.resolve_shared("q2"));
    assert!(public.allowed);
    assert!(!gated.allowed);
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn stale_result_is_discarded_after_newer_navigation() {
    let source = Arc::new(InMemoryQuizSource::new(catalogue()).with_delay(Duration::from_millis(30)));
    let coordinator = Arc::new(coordinator(source));

    let first = coordinator.begin();
    let slow = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.resolve(first, "q1").await })
    };

    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = coordinator.begin();
    let fresh = coordinator.resolve(second, "q2").await;

    assert!(slow.await.unwrap().is_none());
    assert_eq!(fresh.map(|d| d.reason), Some(AccessReason::AuthRequired));
}
