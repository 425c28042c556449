use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::{
    access::{decision::AccessDecision, resolver::AccessResolver},
    session::{SessionRevision, Sessions},
};

type PendingDecision = Shared<BoxFuture<'static, AccessDecision>>;

/// A check is only shared between callers that saw the same sessions.
type InFlightKey = (String, SessionRevision);

type InFlight = Arc<Mutex<HashMap<InFlightKey, PendingDecision>>>;

/// Identifies one navigation attempt. Only the most recently issued ticket
/// may act on a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NavigationTicket(u64);

impl NavigationTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Serializes access checks: one in-flight resolution per quiz id and
/// session state, and results that arrive after a newer navigation started
/// are dropped.
///
/// Each resolution runs as its own task and removes its entry when it
/// finishes, whether or not anyone is still waiting for it.
pub struct NavigationCoordinator {
    resolver: AccessResolver,
    sessions: Sessions,
    latest: AtomicU64,
    in_flight: InFlight,
}

impl NavigationCoordinator {
    pub fn new(resolver: AccessResolver, sessions: Sessions) -> Self {
        Self {
            resolver,
            sessions,
            latest: AtomicU64::new(0),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts a navigation, superseding every earlier ticket.
    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Resolves access to `quiz_id` for the navigation holding `ticket`.
    /// Returns `None` when the ticket went stale while waiting.
    pub async fn resolve(&self, ticket: NavigationTicket, quiz_id: &str) -> Option<AccessDecision> {
        let decision = self.resolve_shared(quiz_id).await;

        if !self.is_current(ticket) {
            log::warn!(
                "Discarding stale access decision for quiz {} (navigation {} superseded by {})",
                quiz_id,
                ticket.0,
                self.latest.load(Ordering::SeqCst)
            );
            return None;
        }
        Some(decision)
    }

    /// Joins the in-flight resolution for `quiz_id` under the current
    /// sessions or starts one.
    pub async fn resolve_shared(&self, quiz_id: &str) -> AccessDecision {
        self.pending(quiz_id).await.await
    }

    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    async fn pending(&self, quiz_id: &str) -> PendingDecision {
        let (account, participant, revision) = self.sessions.versioned_snapshots().await;
        let key = (quiz_id.to_string(), revision);

        let mut in_flight = self.in_flight.lock().await;
        if let Some(existing) = in_flight.get(&key) {
            log::debug!("Joining in-flight access check for quiz {}", quiz_id);
            return existing.clone();
        }

        let resolver = self.resolver.clone();
        let registry = Arc::clone(&self.in_flight);
        let entry = key.clone();
        // Cannot remove its entry before the insert below: the map is locked.
        let task = tokio::spawn(async move {
            let decision = resolver.resolve(&entry.0, &account, &participant).await;
            registry.lock().await.remove(&entry);
            decision
        });

        let id = quiz_id.to_string();
        let pending = async move {
            task.await.unwrap_or_else(|e| {
                log::error!("Access check for quiz {} did not complete: {}", id, e);
                AccessDecision::network_error()
            })
        }
        .boxed()
        .shared();

        in_flight.insert(key, pending.clone());
        pending
    }
}
