use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{ClientError, ClientResult},
    models::{
        domain::{Participant, ParticipantAuthResponse, QuizRef},
        dto::request::{ParticipantLoginRequest, ParticipantRegisterRequest, VerifyAccessRequest},
    },
    services::{
        account_auth_service::credential_error,
        http_client::{HttpClient, RequestScope},
    },
    session::{BearerToken, ParticipantSession, ParticipantStore, SessionData, SessionKind},
};

/// Owns the quiz-taker session.
pub struct ParticipantAuthService {
    http: Arc<HttpClient>,
    store: Arc<ParticipantStore>,
}

impl ParticipantAuthService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        let store = Arc::clone(&http.sessions().participant);
        Self { http, store }
    }

    pub async fn session(&self) -> ParticipantSession {
        self.store.snapshot().await
    }

    pub async fn login(&self, request: ParticipantLoginRequest) -> ClientResult<ParticipantSession> {
        request.validate()?;

        let response: ParticipantAuthResponse = self
            .http
            .post("/participants/login/", &request, RequestScope::Public)
            .await
            .map_err(credential_error)?;

        self.establish(response, None).await
    }

    pub async fn register(
        &self,
        request: ParticipantRegisterRequest,
    ) -> ClientResult<ParticipantSession> {
        request.validate()?;

        let response: ParticipantAuthResponse = self
            .http
            .post("/participants/register/", &request, RequestScope::Public)
            .await
            .map_err(credential_error)?;

        self.establish(response, None).await
    }

    /// Exchanges a quiz password or invitation email for a participant token
    /// bound to `quiz_id`.
    pub async fn verify_access(
        &self,
        quiz_id: &str,
        request: VerifyAccessRequest,
    ) -> ClientResult<ParticipantSession> {
        request.validate()?;

        let path = format!("/quizzes/{}/verify-access/", quiz_id);
        let response: ParticipantAuthResponse = self
            .http
            .post(&path, &request, RequestScope::Public)
            .await
            // 403 here means a wrong password or an email not on the invite list.
            .map_err(credential_error)?;

        self.establish(response, Some(QuizRef::new(quiz_id))).await
    }

    /// Same contract as the account variant: `Ok(false)` when there is no
    /// usable stored token, an error only when the backend could not be reached.
    /// The quiz binding is not persisted, so a restored participant has to pass
    /// the invitation check again.
    pub async fn restore_from_storage(&self) -> ClientResult<bool> {
        let Some(token) = self.store.persisted_token()? else {
            return Ok(false);
        };

        self.store.load_unverified(token).await;
        match self
            .http
            .get::<Participant>("/participants/me/", RequestScope::Participant)
            .await
        {
            Ok(participant) => {
                let token = self.store.bearer().await.ok_or_else(|| ClientError::AuthExpired {
                    kind: SessionKind::Participant,
                    message: "session cleared while loading participant".to_string(),
                })?;
                self.store
                    .replace(ParticipantSession::verified(token, participant))
                    .await?;
                log::info!("Restored participant session from storage");
                Ok(true)
            }
            Err(ClientError::NetworkError(message)) => {
                log::warn!("Could not verify stored participant token: {}", message);
                Err(ClientError::NetworkError(message))
            }
            Err(e) => {
                log::warn!("Discarding stored participant token: {}", e);
                self.store.clear().await?;
                Ok(false)
            }
        }
    }

    pub async fn ensure_verified(&self) -> ClientResult<bool> {
        if self.store.snapshot().await.is_verified() {
            return Ok(true);
        }
        self.restore_from_storage().await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.store.clear().await
    }

    async fn establish(
        &self,
        response: ParticipantAuthResponse,
        quiz: Option<QuizRef>,
    ) -> ClientResult<ParticipantSession> {
        let participant = response.participant();
        let mut session = ParticipantSession::verified(BearerToken::new(response.token), participant);
        if let Some(quiz) = quiz {
            log::info!("Participant {} verified for quiz {}", response.participant_id, quiz.id);
            session = session.with_current_quiz(quiz);
        } else {
            log::info!("Participant session established for {}", response.participant_id);
        }

        self.store.replace(session.clone()).await?;
        Ok(session)
    }
}
