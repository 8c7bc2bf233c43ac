//! Shell visibility policy.
//!
//! Decides which chrome wraps a page. Pure: the decision depends only on the
//! session and path passed in, never on earlier calls.

use crate::config::ShellConfig;
use serde::Serialize;
use tender_shell_core::Session;

/// Which chrome elements are visible for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShellDecision {
    /// Whether the primary navigation is mounted.
    pub show_navigation: bool,
}

impl ShellDecision {
    /// Navigation hidden.
    pub const HIDDEN: Self = Self {
        show_navigation: false,
    };

    /// Navigation shown.
    pub const SHOWN: Self = Self {
        show_navigation: true,
    };
}

/// Why the navigation is hidden, or that it is shown. Useful in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Nobody is signed in (or the session is unresolved).
    NoSession,
    /// The current page is onboarding.
    Onboarding,
    /// The current page belongs to an auth flow.
    AuthFlow,
    /// Signed-in page with regular chrome.
    Default,
}

/// Chrome visibility rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellVisibilityPolicy {
    onboarding_path: String,
    auth_prefix: String,
}

impl ShellVisibilityPolicy {
    /// Policy with explicit onboarding path and auth-flow prefix.
    #[must_use]
    pub fn new(onboarding_path: impl Into<String>, auth_prefix: impl Into<String>) -> Self {
        Self {
            onboarding_path: onboarding_path.into(),
            auth_prefix: auth_prefix.into(),
        }
    }

    /// Policy built from shell configuration.
    #[must_use]
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.onboarding_path.clone(), config.auth_prefix.clone())
    }

    /// Decide chrome visibility for `(session, path)`.
    ///
    /// Rules, first match wins:
    /// 1. no signed-in user (`Absent` or `Unknown`) → hidden
    /// 2. path equals the onboarding path → hidden
    /// 3. path starts with the auth-flow prefix → hidden
    /// 4. otherwise → shown
    ///
    /// A missing path never matches rules 2 and 3.
    #[must_use]
    pub fn decide(&self, session: &Session, path: Option<&str>) -> ShellDecision {
        match self.reason(session, path) {
            DecisionReason::Default => ShellDecision::SHOWN,
            DecisionReason::NoSession | DecisionReason::Onboarding | DecisionReason::AuthFlow => {
                ShellDecision::HIDDEN
            },
        }
    }

    /// The rule that decided `(session, path)`.
    #[must_use]
    pub fn reason(&self, session: &Session, path: Option<&str>) -> DecisionReason {
        if !session.is_present() {
            return DecisionReason::NoSession;
        }
        match path {
            Some(path) if path == self.onboarding_path => DecisionReason::Onboarding,
            Some(path) if path.starts_with(&self.auth_prefix) => DecisionReason::AuthFlow,
            Some(_) | None => DecisionReason::Default,
        }
    }
}

impl Default for ShellVisibilityPolicy {
    fn default() -> Self {
        Self::from_config(&ShellConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tender_shell_core::User;

    fn signed_in() -> Session {
        Session::Present(User::new("u-1"))
    }

    #[test]
    fn test_absent_session_hides_navigation() {
        let policy = ShellVisibilityPolicy::default();
        assert_eq!(policy.decide(&Session::Absent, Some("/app/dashboard")), ShellDecision::HIDDEN);
        assert_eq!(policy.reason(&Session::Absent, None), DecisionReason::NoSession);
    }

    #[test]
    fn test_unknown_session_behaves_like_absent() {
        let policy = ShellVisibilityPolicy::default();
        for path in [None, Some("/app/dashboard"), Some("/onboarding")] {
            assert_eq!(
                policy.decide(&Session::Unknown, path),
                policy.decide(&Session::Absent, path)
            );
        }
    }

    #[test]
    fn test_onboarding_is_exact_match() {
        let policy = ShellVisibilityPolicy::default();
        assert_eq!(policy.reason(&signed_in(), Some("/onboarding")), DecisionReason::Onboarding);
        assert_eq!(policy.decide(&signed_in(), Some("/onboarding/step-2")), ShellDecision::SHOWN);
    }

    #[test]
    fn test_auth_prefix_hides_navigation() {
        let policy = ShellVisibilityPolicy::default();
        assert_eq!(policy.reason(&signed_in(), Some("/auth/login")), DecisionReason::AuthFlow);
        assert_eq!(policy.decide(&signed_in(), Some("/auth")), ShellDecision::HIDDEN);
    }

    #[test]
    fn test_missing_path_falls_through_to_session() {
        let policy = ShellVisibilityPolicy::default();
        assert_eq!(policy.decide(&signed_in(), None), ShellDecision::SHOWN);
    }

    #[test]
    fn test_signed_in_regular_page_shows_navigation() {
        let policy = ShellVisibilityPolicy::new("/welcome", "/sso");
        assert_eq!(policy.decide(&signed_in(), Some("/app/dashboard")), ShellDecision::SHOWN);
        assert_eq!(policy.decide(&signed_in(), Some("/welcome")), ShellDecision::HIDDEN);
        assert_eq!(policy.decide(&signed_in(), Some("/sso/callback")), ShellDecision::HIDDEN);
    }
}
