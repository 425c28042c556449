//! Identity contexts held by the client.
//!
//! Two independent sessions exist side by side: the account holder (quiz
//! authors and admins) and the participant (quiz takers). Each lives in its
//! own [`SessionStore`] with its own durable storage key, so a single client
//! can hold both at once, e.g. an author previewing their own quiz.
//!
//! Readers only ever see cloned snapshots. Mutation goes through the store,
//! and the setters are crate-private so that only the auth services and the
//! HTTP client's 401 handling can change a session.

pub mod account;
pub mod participant;
pub mod storage;

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::errors::ClientResult;

pub use account::AccountSession;
pub use participant::ParticipantSession;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Account,
    Participant,
}

impl SessionKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKind::Account => "jwt",
            SessionKind::Participant => "participant_token",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Account => write!(f, "account"),
            SessionKind::Participant => write!(f, "participant"),
        }
    }
}

/// Opaque bearer credential. Only exposed to build the `Authorization`
/// header or to persist it.
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        BearerToken(SecretString::from(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.expose())
    }

    pub fn same_as(&self, other: &BearerToken) -> bool {
        self.expose() == other.expose()
    }
}

impl Clone for BearerToken {
    fn clone(&self) -> Self {
        BearerToken::new(self.expose().to_string())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

pub trait SessionData: Clone + Default + Send + Sync + 'static {
    const KIND: SessionKind;

    fn token(&self) -> Option<&BearerToken>;

    /// A token restored from storage that has not been checked yet.
    fn unverified(token: BearerToken) -> Self;

    fn is_verified(&self) -> bool;

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

pub struct SessionStore<S: SessionData> {
    state: RwLock<S>,
    /// Bumped on every change while the write lock is held.
    revision: AtomicU64,
    storage: Arc<dyn TokenStorage>,
}

pub type AccountStore = SessionStore<AccountSession>;
pub type ParticipantStore = SessionStore<ParticipantSession>;

impl<S: SessionData> SessionStore<S> {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            state: RwLock::new(S::default()),
            revision: AtomicU64::new(0),
            storage,
        }
    }

    pub fn kind(&self) -> SessionKind {
        S::KIND
    }

    pub async fn snapshot(&self) -> S {
        self.state.read().await.clone()
    }

    /// Snapshot together with the revision it was taken at.
    pub async fn versioned_snapshot(&self) -> (S, u64) {
        let state = self.state.read().await;
        (state.clone(), self.revision.load(Ordering::SeqCst))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn bearer(&self) -> Option<BearerToken> {
        self.state.read().await.token().cloned()
    }

    /// Token left in durable storage by a previous run, if any.
    pub fn persisted_token(&self) -> ClientResult<Option<BearerToken>> {
        Ok(self
            .storage
            .get(S::KIND.storage_key())?
            .filter(|raw| !raw.is_empty())
            .map(BearerToken::new))
    }

    /// Loads the persisted token into memory without verifying it.
    pub(crate) async fn load_unverified(&self, token: BearerToken) {
        let mut state = self.state.write().await;
        *state = S::unverified(token);
        self.bump();
    }

    pub(crate) async fn replace(&self, session: S) -> ClientResult<()> {
        match session.token() {
            Some(token) => self.storage.set(S::KIND.storage_key(), token.expose())?,
            None => self.storage.remove(S::KIND.storage_key())?,
        }
        let mut state = self.state.write().await;
        *state = session;
        self.bump();
        Ok(())
    }

    pub(crate) async fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut S),
    {
        let mut state = self.state.write().await;
        apply(&mut state);
        self.bump();
    }

    /// Wipes memory and durable storage.
    pub async fn clear(&self) -> ClientResult<()> {
        let mut state = self.state.write().await;
        *state = S::default();
        self.bump();
        self.storage.remove(S::KIND.storage_key())?;
        log::info!("Cleared {} session", S::KIND);
        Ok(())
    }

    /// Clears only if the session still holds `token`, so a failure on a stale
    /// request cannot wipe a session established afterwards.
    pub async fn clear_if_current(&self, token: &BearerToken) -> ClientResult<bool> {
        let mut state = self.state.write().await;
        let current = state.token().map(|t| t.same_as(token)).unwrap_or(false);
        if !current {
            return Ok(false);
        }

        *state = S::default();
        self.bump();
        self.storage.remove(S::KIND.storage_key())?;
        log::warn!("Cleared {} session after authorization failure", S::KIND);
        Ok(true)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

/// Revisions of both stores at the time a pair of snapshots was taken. Two
/// equal revisions mean the sessions did not change in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionRevision {
    pub account: u64,
    pub participant: u64,
}

/// Both identity contexts, shared by the HTTP client and the auth services.
#[derive(Clone)]
pub struct Sessions {
    pub account: Arc<AccountStore>,
    pub participant: Arc<ParticipantStore>,
}

impl Sessions {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            account: Arc::new(SessionStore::new(Arc::clone(&storage))),
            participant: Arc::new(SessionStore::new(storage)),
        }
    }

    pub async fn snapshots(&self) -> (AccountSession, ParticipantSession) {
        (self.account.snapshot().await, self.participant.snapshot().await)
    }

    pub async fn versioned_snapshots(
        &self,
    ) -> (AccountSession, ParticipantSession, SessionRevision) {
        let (account, account_rev) = self.account.versioned_snapshot().await;
        let (participant, participant_rev) = self.participant.versioned_snapshot().await;
        let revision = SessionRevision {
            account: account_rev,
            participant: participant_rev,
        };
        (account, participant, revision)
    }

    pub async fn clear(&self, kind: SessionKind) -> ClientResult<()> {
        match kind {
            SessionKind::Account => self.account.clear().await,
            SessionKind::Participant => self.participant.clear().await,
        }
    }
}
