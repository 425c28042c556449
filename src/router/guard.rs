use std::{collections::BTreeMap, sync::Arc};

use crate::{
    access::{AccessDecision, AccessReason, NavigationCoordinator, NavigationTicket},
    models::domain::Member,
    router::routes::{RouteGuard, RouteMatch, RouteTable, View},
    services::{AccountAuthService, AccountService, ParticipantAuthService},
    session::SessionData,
};

/// Data a view needs on entry, loaded while its guards run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RouteData {
    #[default]
    None,
    /// Members of the signed-in account, for the Users page. Empty when the
    /// listing could not be loaded.
    Members(Vec<Member>),
}

/// Result of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render {
        view: View,
        params: BTreeMap<String, String>,
        data: RouteData,
    },
    Redirect {
        to: View,
        path: String,
        reason: AccessReason,
        /// Where to come back to once the visitor has remedied the denial.
        return_to: Option<String>,
    },
    /// A newer navigation started before this one finished.
    Superseded,
}

impl Navigation {
    pub fn view(&self) -> Option<View> {
        match self {
            Navigation::Render { view, .. } => Some(*view),
            Navigation::Redirect { to, .. } => Some(*to),
            Navigation::Superseded => None,
        }
    }
}

/// Runs route guards. Every guard finishes (or fails) before a view is
/// returned for rendering.
pub struct Router {
    routes: RouteTable,
    coordinator: Arc<NavigationCoordinator>,
    account_auth: Arc<AccountAuthService>,
    participant_auth: Arc<ParticipantAuthService>,
    accounts: Arc<AccountService>,
}

impl Router {
    pub fn new(
        routes: RouteTable,
        coordinator: Arc<NavigationCoordinator>,
        account_auth: Arc<AccountAuthService>,
        participant_auth: Arc<ParticipantAuthService>,
        accounts: Arc<AccountService>,
    ) -> Self {
        Self {
            routes,
            coordinator,
            account_auth,
            participant_auth,
            accounts,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub async fn navigate(&self, path: &str) -> Navigation {
        let ticket = self.coordinator.begin();
        let Some(route) = self.routes.resolve(path) else {
            log::debug!("No route for {}", path);
            return Navigation::Render {
                view: View::NotFound,
                params: BTreeMap::new(),
                data: RouteData::None,
            };
        };

        let outcome = match route.guard {
            RouteGuard::None => Ok(()),
            RouteGuard::AccountRequired => self.require_account(path).await,
            RouteGuard::QuizAccess => self.require_quiz_access(ticket, &route, path).await,
            RouteGuard::QuizOwner => match self.require_account(path).await {
                Ok(()) => self.require_quiz_owner(ticket, &route, path).await,
                Err(redirect) => Err(redirect),
            },
        };

        let data = if outcome.is_ok() {
            self.prefetch(route.view).await
        } else {
            RouteData::None
        };

        if !self.coordinator.is_current(ticket) {
            log::warn!("Navigation to {} superseded", path);
            return Navigation::Superseded;
        }

        match outcome {
            Ok(()) => Navigation::Render {
                view: route.view,
                params: route.params,
                data,
            },
            Err(navigation) => navigation,
        }
    }

    async fn require_account(&self, path: &str) -> Result<(), Navigation> {
        match self.account_auth.ensure_verified().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(self.redirect(View::Auth, None, AccessReason::AccountRequired, path)),
            Err(e) => {
                log::error!("Could not verify account session for {}: {}", path, e);
                Err(self.redirect(View::Error, None, AccessReason::NetworkError, path))
            }
        }
    }

    async fn require_quiz_access(
        &self,
        ticket: NavigationTicket,
        route: &RouteMatch,
        path: &str,
    ) -> Result<(), Navigation> {
        let quiz_id = route.param("id").unwrap_or_default();
        self.verify_restored_tokens().await;

        let decision = self.decide(ticket, quiz_id).await?;
        if decision.allowed {
            return Ok(());
        }
        Err(self.denied(decision, quiz_id, path))
    }

    async fn require_quiz_owner(
        &self,
        ticket: NavigationTicket,
        route: &RouteMatch,
        path: &str,
    ) -> Result<(), Navigation> {
        let quiz_id = route.param("id").unwrap_or_default();
        let decision = self.decide(ticket, quiz_id).await?;

        if decision.is_owner_bypass() {
            Ok(())
        } else if decision.reason == AccessReason::NetworkError {
            Err(self.redirect(View::Error, None, AccessReason::NetworkError, path))
        } else {
            Err(self.redirect(View::QuizDashboard, None, AccessReason::NotOwner, path))
        }
    }

    async fn decide(&self, ticket: NavigationTicket, quiz_id: &str) -> Result<AccessDecision, Navigation> {
        self.coordinator
            .resolve(ticket, quiz_id)
            .await
            .ok_or(Navigation::Superseded)
    }

    /// Tokens restored at start-up are only trusted once the backend has
    /// confirmed them. Either may still be unverified if start-up could not
    /// reach the backend.
    async fn verify_restored_tokens(&self) {
        let verify_account = async {
            let session = self.account_auth.session().await;
            if session.is_authenticated() && !session.is_verified() {
                if let Err(e) = self.account_auth.ensure_verified().await {
                    log::warn!("Account token could not be verified: {}", e);
                }
            }
        };
        let verify_participant = async {
            let session = self.participant_auth.session().await;
            if session.is_authenticated() && !session.is_verified() {
                if let Err(e) = self.participant_auth.ensure_verified().await {
                    log::warn!("Participant token could not be verified: {}", e);
                }
            }
        };
        tokio::join!(verify_account, verify_participant);
    }

    async fn prefetch(&self, view: View) -> RouteData {
        match view {
            View::Users => match self.accounts.current_members().await {
                Ok(members) => RouteData::Members(members),
                Err(e) => {
                    log::error!("Failed to fetch account members: {}", e);
                    RouteData::Members(Vec::new())
                }
            },
            _ => RouteData::None,
        }
    }

    fn denied(&self, decision: AccessDecision, quiz_id: &str, path: &str) -> Navigation {
        match decision.redirect_target {
            Some(target) => self.redirect(target, Some(quiz_id), decision.reason, path),
            None => self.redirect(View::Error, None, decision.reason, path),
        }
    }

    fn redirect(&self, to: View, id: Option<&str>, reason: AccessReason, from: &str) -> Navigation {
        let path = self
            .routes
            .path_for(to, id)
            .unwrap_or_else(|| "/error".to_string());
        log::debug!("Redirecting {} -> {} ({})", from, path, reason);

        Navigation::Redirect {
            to,
            path,
            reason,
            return_to: Some(from.to_string()),
        }
    }
}
