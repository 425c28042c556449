use std::sync::Arc;

use crate::{
    errors::ClientResult,
    models::domain::Member,
    services::http_client::{HttpClient, RequestScope},
};

/// Endpoints about the signed-in user's account rather than the user.
pub struct AccountService {
    http: Arc<HttpClient>,
}

impl AccountService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn list_members(&self, account_id: &str) -> ClientResult<Vec<Member>> {
        let path = format!("/accounts/{}/members/", account_id);
        self.http.get(&path, RequestScope::Account).await
    }

    /// Members of the account the current session belongs to. Empty when
    /// the session has no account.
    pub async fn current_members(&self) -> ClientResult<Vec<Member>> {
        let session = self.http.sessions().account.snapshot().await;
        match session.account_id() {
            Some(account_id) => self.list_members(account_id).await,
            None => Ok(Vec::new()),
        }
    }
}
