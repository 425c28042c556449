use chrono::{DateTime, Utc};

use crate::models::domain::{Account, User};
use crate::session::{BearerToken, SessionData, SessionKind};

/// Snapshot of the account-holder identity.
#[derive(Clone, Debug, Default)]
pub struct AccountSession {
    pub token: Option<BearerToken>,
    pub user: Option<User>,
    pub account: Option<Account>,
    /// Set once the token has been checked against the backend since load.
    pub verified_at: Option<DateTime<Utc>>,
}

impl AccountSession {
    pub fn verified(token: BearerToken, user: User, account: Option<Account>) -> Self {
        AccountSession {
            token: Some(token),
            user: Some(user),
            account,
            verified_at: Some(Utc::now()),
        }
    }

    /// Owning account id, from the fetched account or the profile's reference.
    pub fn account_id(&self) -> Option<&str> {
        self.account
            .as_ref()
            .map(|a| a.id.as_str())
            .or_else(|| self.user.as_ref().and_then(|u| u.account.as_deref()))
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(User::is_admin).unwrap_or(false)
    }

    /// True when a verified session belongs to `account_id` or is an admin.
    pub fn owns_or_administers(&self, account_id: Option<&str>) -> bool {
        if !self.is_verified() {
            return false;
        }
        if self.is_admin() {
            return true;
        }
        match (self.account_id(), account_id) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }
}

impl SessionData for AccountSession {
    const KIND: SessionKind = SessionKind::Account;

    fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    fn unverified(token: BearerToken) -> Self {
        AccountSession {
            token: Some(token),
            ..Default::default()
        }
    }

    fn is_verified(&self) -> bool {
        self.token.is_some() && self.verified_at.is_some()
    }
}
