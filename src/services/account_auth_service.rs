use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{ClientError, ClientResult},
    models::{
        domain::{Account, User},
        dto::{
            request::{LoginRequest, RegisterRequest, UpdateProfileRequest},
            response::AccountTokenResponse,
        },
    },
    services::http_client::{HttpClient, RequestScope},
    session::{AccountSession, AccountStore, BearerToken, SessionData, SessionKind},
};

/// Owns the account-holder session: login, registration, restore on start-up
/// and profile edits. Only this service and the HTTP client's 401 handling
/// write to the account store.
pub struct AccountAuthService {
    http: Arc<HttpClient>,
    store: Arc<AccountStore>,
}

impl AccountAuthService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        let store = Arc::clone(&http.sessions().account);
        Self { http, store }
    }

    pub async fn session(&self) -> AccountSession {
        self.store.snapshot().await
    }

    pub async fn authenticate(&self, request: LoginRequest) -> ClientResult<AccountSession> {
        request.validate()?;

        let tokens: AccountTokenResponse = self
            .http
            .post("/user/login/", &request, RequestScope::Public)
            .await
            .map_err(credential_error)?;

        self.store.load_unverified(BearerToken::new(tokens.token)).await;
        let session = match self.load_profile().await {
            Ok(session) => session,
            Err(e) => {
                self.store.clear().await?;
                return Err(e);
            }
        };

        self.store.replace(session.clone()).await?;
        log::info!(
            "Account session established for '{}'",
            session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("")
        );
        Ok(session)
    }

    pub async fn register(&self, request: RegisterRequest) -> ClientResult<AccountSession> {
        request.validate()?;

        let _: serde_json::Value = self
            .http
            .post("/user/register/", &request, RequestScope::Public)
            .await?;
        log::info!("Registered account holder '{}'", request.username);

        self.authenticate(LoginRequest {
            username: request.username,
            password: request.password,
        })
        .await
    }

    /// Verifies a token left by a previous run. Returns `Ok(true)` when the
    /// session is live again and `Ok(false)` when there was nothing to restore
    /// or the backend rejected it. Transport failures keep the token and are
    /// returned as errors.
    pub async fn restore_from_storage(&self) -> ClientResult<bool> {
        let Some(token) = self.store.persisted_token()? else {
            return Ok(false);
        };

        self.store.load_unverified(token).await;
        match self.load_profile().await {
            Ok(session) => {
                self.store.replace(session).await?;
                log::info!("Restored account session from storage");
                Ok(true)
            }
            Err(ClientError::NetworkError(message)) => {
                log::warn!("Could not verify stored account token: {}", message);
                Err(ClientError::NetworkError(message))
            }
            Err(e) => {
                log::warn!("Discarding stored account token: {}", e);
                self.store.clear().await?;
                Ok(false)
            }
        }
    }

    /// Verified session, restoring from storage when only a raw token is held.
    pub async fn ensure_verified(&self) -> ClientResult<bool> {
        let session = self.store.snapshot().await;
        if session.is_verified() {
            return Ok(true);
        }
        self.restore_from_storage().await
    }

    pub async fn update_profile(&self, request: UpdateProfileRequest) -> ClientResult<User> {
        request.validate()?;

        let user: User = self
            .http
            .put("/user/profile/", &request, RequestScope::Account)
            .await?;

        let updated = user.clone();
        self.store
            .update(move |session| session.user = Some(updated))
            .await;
        Ok(user)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.store.clear().await
    }

    async fn load_profile(&self) -> ClientResult<AccountSession> {
        let user: User = self
            .http
            .get("/user/profile/", RequestScope::Account)
            .await?;

        let account = match user.account.as_deref() {
            Some(account_id) => self.load_account(account_id).await?,
            None => None,
        };

        // A 401 during the fetches above has already cleared the store.
        let token = self.store.bearer().await.ok_or_else(|| ClientError::AuthExpired {
            kind: SessionKind::Account,
            message: "session cleared while loading profile".to_string(),
        })?;

        Ok(AccountSession::verified(token, user, account))
    }

    async fn load_account(&self, account_id: &str) -> ClientResult<Option<Account>> {
        let path = format!("/accounts/{}/", account_id);
        match self.http.get::<Account>(&path, RequestScope::Account).await {
            Ok(account) => Ok(Some(account)),
            Err(ClientError::NotFound(_)) => {
                log::warn!("Account {} referenced by profile does not exist", account_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Rejections of a credential exchange are bad credentials, not expired sessions.
pub(crate) fn credential_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Unauthorized(message) => ClientError::AuthError(message),
        ClientError::Http { status: 400, message } => ClientError::AuthError(message),
        other => other,
    }
}
