use reqwest::{header::AUTHORIZATION, Method};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{ClientError, ClientResult},
    services::http_helpers::{decode_body, error_message, join_url},
    session::{BearerToken, SessionKind, Sessions},
};

/// Which identity an endpoint expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestScope {
    /// No credential attached.
    Public,
    /// Account-holder token only.
    Account,
    /// Participant token when present, otherwise the account token.
    Participant,
}

/// Backend client that injects the right bearer token and clears the owning
/// session when the backend answers 401. Failures are returned as-is; no
/// retries, no redirects.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    sessions: Sessions,
}

impl HttpClient {
    pub fn new(config: &Config, sessions: Sessions) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            sessions,
        })
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential attached for `scope`, tagged with the session that owns it.
    pub async fn credentials(&self, scope: RequestScope) -> Option<(SessionKind, BearerToken)> {
        match scope {
            RequestScope::Public => None,
            RequestScope::Account => self
                .sessions
                .account
                .bearer()
                .await
                .map(|t| (SessionKind::Account, t)),
            RequestScope::Participant => match self.sessions.participant.bearer().await {
                Some(token) => Some((SessionKind::Participant, token)),
                None => self
                    .sessions
                    .account
                    .bearer()
                    .await
                    .map(|t| (SessionKind::Account, t)),
            },
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, scope: RequestScope) -> ClientResult<T> {
        let body = self.execute(Method::GET, path, None, scope).await?;
        decode_body(&body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B, scope: RequestScope) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let body = self.execute(Method::POST, path, Some(payload), scope).await?;
        decode_body(&body)
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B, scope: RequestScope) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let body = self.execute(Method::PUT, path, Some(payload), scope).await?;
        decode_body(&body)
    }

    /// Like [`HttpClient::put`] for endpoints whose response body carries nothing useful.
    pub async fn put_unit<B>(&self, path: &str, payload: &B, scope: RequestScope) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)?;
        self.execute(Method::PUT, path, Some(payload), scope).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str, scope: RequestScope) -> ClientResult<()> {
        self.execute(Method::DELETE, path, None, scope).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Option<serde_json::Value>,
        scope: RequestScope,
    ) -> ClientResult<String> {
        let url = join_url(&self.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        let credentials = self.credentials(scope).await;

        log::debug!(
            "{} {} [request_id={}, scope={:?}, identity={}]",
            method,
            url,
            request_id,
            scope,
            credentials
                .as_ref()
                .map(|(kind, _)| kind.to_string())
                .unwrap_or_else(|| "anonymous".to_string())
        );

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.as_str());
        if let Some((_, token)) = &credentials {
            request = request.header(AUTHORIZATION, token.header_value());
        }
        if let Some(payload) = &payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("{} {} failed [request_id={}]: {}", method, url, request_id, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::from)?;

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(status, &body);
        log::warn!(
            "{} {} returned {} [request_id={}]: {}",
            method,
            url,
            status.as_u16(),
            request_id,
            message
        );

        if status == reqwest::StatusCode::UNAUTHORIZED {
            if let Some((kind, token)) = &credentials {
                self.clear_owner(*kind, token).await;
            }
        }

        Err(ClientError::from_status(
            status,
            message,
            credentials.map(|(kind, _)| kind),
        ))
    }

    async fn clear_owner(&self, kind: SessionKind, token: &BearerToken) {
        let cleared = match kind {
            SessionKind::Account => self.sessions.account.clear_if_current(token).await,
            SessionKind::Participant => self.sessions.participant.clear_if_current(token).await,
        };
        if let Err(e) = cleared {
            log::error!("Failed to clear {} session after 401: {}", kind, e);
        }
    }
}
