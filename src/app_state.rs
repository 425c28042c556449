use std::sync::Arc;

use crate::{
    access::{AccessResolver, NavigationCoordinator, QuizMetadataSource},
    config::Config,
    errors::ClientResult,
    router::{RouteTable, Router},
    services::{
        AccountAuthService, AccountService, GroupService, HttpClient, ParticipantAuthService, QuizAttemptService,
        QuizService,
    },
    session::{FileTokenStorage, Sessions, TokenStorage},
};

/// Which persisted sessions survived start-up verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoredSessions {
    pub account: bool,
    pub participant: bool,
}

/// Every long-lived component of the client, wired once.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Sessions,
    pub http: Arc<HttpClient>,
    pub account_auth: Arc<AccountAuthService>,
    pub participant_auth: Arc<ParticipantAuthService>,
    pub account_service: Arc<AccountService>,
    pub quiz_service: Arc<QuizService>,
    pub group_service: Arc<GroupService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub resolver: AccessResolver,
    pub coordinator: Arc<NavigationCoordinator>,
    pub router: Arc<Router>,
}

impl AppState {
    pub fn new(config: Config) -> ClientResult<Self> {
        let storage: Arc<dyn TokenStorage> =
            Arc::new(FileTokenStorage::new(config.storage_path.clone()));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn TokenStorage>) -> ClientResult<Self> {
        config.validate()?;

        let sessions = Sessions::new(storage);
        let http = Arc::new(HttpClient::new(&config, sessions.clone())?);

        let account_auth = Arc::new(AccountAuthService::new(Arc::clone(&http)));
        let participant_auth = Arc::new(ParticipantAuthService::new(Arc::clone(&http)));
        let account_service = Arc::new(AccountService::new(Arc::clone(&http)));
        let quiz_service = Arc::new(QuizService::new(Arc::clone(&http)));
        let group_service = Arc::new(GroupService::new(Arc::clone(&http)));
        let attempt_service = Arc::new(QuizAttemptService::new(
            Arc::clone(&quiz_service),
            Arc::clone(&sessions.participant),
        ));

        let source: Arc<dyn QuizMetadataSource> = quiz_service.clone();
        let resolver = AccessResolver::new(source);
        let coordinator = Arc::new(NavigationCoordinator::new(resolver.clone(), sessions.clone()));
        let router = Arc::new(Router::new(
            RouteTable::default(),
            Arc::clone(&coordinator),
            Arc::clone(&account_auth),
            Arc::clone(&participant_auth),
            Arc::clone(&account_service),
        ));

        log::debug!("Client configured against {}", config.api_base_url);

        Ok(Self {
            config: Arc::new(config),
            sessions,
            http,
            account_auth,
            participant_auth,
            account_service,
            quiz_service,
            group_service,
            attempt_service,
            resolver,
            coordinator,
            router,
        })
    }

    /// Restores both persisted sessions. An unreachable backend is logged and
    /// leaves the stored token in place for the next attempt.
    pub async fn initialize(&self) -> RestoredSessions {
        let (account, participant) = tokio::join!(
            self.account_auth.restore_from_storage(),
            self.participant_auth.restore_from_storage()
        );

        let restored = RestoredSessions {
            account: account.unwrap_or_else(|e| {
                log::warn!("Account session not restored: {}", e);
                false
            }),
            participant: participant.unwrap_or_else(|e| {
                log::warn!("Participant session not restored: {}", e);
                false
            }),
        };
        log::info!(
            "Start-up: account session {}, participant session {}",
            if restored.account { "restored" } else { "absent" },
            if restored.participant { "restored" } else { "absent" }
        );
        restored
    }
}
