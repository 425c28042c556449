use std::fmt;

use serde::Serialize;

use crate::router::View;

/// Why a navigation was allowed or denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessReason {
    Public,
    OwnerOrAdminBypass,
    ParticipantAuthenticated,
    InvitationVerified,
    AuthRequired,
    NotInvited,
    NetworkError,
    /// Guard-only: the view needs a signed-in account holder.
    AccountRequired,
    /// Guard-only: the view is reserved to the quiz's owner or an admin.
    NotOwner,
}

impl AccessReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessReason::Public => "Public",
            AccessReason::OwnerOrAdminBypass => "OwnerOrAdminBypass",
            AccessReason::ParticipantAuthenticated => "ParticipantAuthenticated",
            AccessReason::InvitationVerified => "InvitationVerified",
            AccessReason::AuthRequired => "AuthRequired",
            AccessReason::NotInvited => "NotInvited",
            AccessReason::NetworkError => "NetworkError",
            AccessReason::AccountRequired => "AccountRequired",
            AccessReason::NotOwner => "NotOwner",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one access check. Computed per navigation and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub redirect_target: Option<View>,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub fn allow(reason: AccessReason) -> Self {
        AccessDecision {
            allowed: true,
            redirect_target: None,
            reason,
        }
    }

    pub fn deny(reason: AccessReason, redirect_target: View) -> Self {
        AccessDecision {
            allowed: false,
            redirect_target: Some(redirect_target),
            reason,
        }
    }

    /// Metadata could not be fetched; the caller maps this to its error view.
    pub fn network_error() -> Self {
        AccessDecision {
            allowed: false,
            redirect_target: None,
            reason: AccessReason::NetworkError,
        }
    }

    pub fn is_owner_bypass(&self) -> bool {
        self.allowed && self.reason == AccessReason::OwnerOrAdminBypass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let allowed = AccessDecision::allow(AccessReason::Public);
        assert!(allowed.allowed);
        assert!(allowed.redirect_target.is_none());

        let denied = AccessDecision::deny(AccessReason::NotInvited, View::AccessGate);
        assert!(!denied.allowed);
        assert_eq!(denied.redirect_target, Some(View::AccessGate));

        let failed = AccessDecision::network_error();
        assert!(!failed.allowed);
        assert_eq!(failed.reason, AccessReason::NetworkError);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(AccessReason::OwnerOrAdminBypass.to_string(), "OwnerOrAdminBypass");
        assert_eq!(
            serde_json::to_string(&AccessReason::AuthRequired).unwrap(),
            "\"AuthRequired\""
        );
    }
}
