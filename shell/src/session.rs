//! Shared session handle.
//!
//! The auth client owns one [`SharedSession`] and drives its lifecycle;
//! shells and the redirect driver only see it as a [`SessionSource`].

use std::sync::Arc;
use tender_shell_core::{Session, SessionSource, User};
use tokio::sync::watch;

/// Watch-backed session handle. Cloning shares the same underlying value.
#[derive(Debug, Clone)]
pub struct SharedSession {
    tx: Arc<watch::Sender<Session>>,
}

/// The session handle under the name application code uses for it.
pub type AuthContext = SharedSession;

impl SharedSession {
    /// Handle in the `Unknown` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Session::Unknown);
        Self { tx: Arc::new(tx) }
    }

    /// Publish the first definitive answer from the auth client.
    ///
    /// Ignored once resolved; use [`login`](Self::login) or
    /// [`logout`](Self::logout) after that.
    pub fn resolve(&self, session: Session) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_resolved() || !session.is_resolved() {
                return false;
            }
            tracing::debug!(present = session.is_present(), "Session resolved");
            *current = session;
            true
        })
    }

    /// Sign `user` in.
    pub fn login(&self, user: User) {
        tracing::debug!(user_id = %user.id, "Signed in");
        self.tx.send_replace(Session::Present(user));
    }

    /// Sign out. Returns whether somebody was signed in.
    pub fn logout(&self) -> bool {
        let previous = self.tx.send_replace(Session::Absent);
        if previous.is_present() {
            tracing::debug!("Signed out");
        }
        previous.is_present()
    }

    /// Update the signed-in user's record after a token refresh.
    ///
    /// No-op unless somebody is signed in with the same id. Subscribers are
    /// only notified when the record changed.
    pub fn refresh(&self, user: User) -> bool {
        self.tx.send_if_modified(|current| match current {
            Session::Present(existing) if existing.id == user.id && *existing != user => {
                *existing = user;
                true
            },
            Session::Present(_) | Session::Absent | Session::Unknown => false,
        })
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSource for SharedSession {
    fn current_session(&self) -> Session {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown_and_resolves_once() {
        let session = SharedSession::new();
        assert_eq!(session.current_session(), Session::Unknown);

        assert!(session.resolve(Session::Absent));
        assert!(!session.resolve(Session::Present(User::new("late"))));
        assert_eq!(session.current_session(), Session::Absent);
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        let session = SharedSession::new();
        assert!(!session.resolve(Session::Unknown));
        assert!(!session.current_session().is_resolved());
    }

    #[test]
    fn test_login_logout_notify_subscribers() {
        let session = AuthContext::default();
        let mut rx = session.subscribe();

        session.login(User::new("u-1"));
        assert!(rx.has_changed().unwrap_or(false));
        assert!(rx.borrow_and_update().is_present());

        assert!(session.logout());
        assert!(!session.logout());
        assert_eq!(*rx.borrow_and_update(), Session::Absent);
    }

    #[test]
    fn test_refresh_only_touches_same_user() {
        let session = SharedSession::new();
        session.login(User::new("u-1"));
        let mut rx = session.subscribe();

        assert!(!session.refresh(User::new("u-2").with_email("x@example.com")));
        assert!(!session.refresh(User::new("u-1")));
        assert!(!rx.has_changed().unwrap_or(true));

        assert!(session.refresh(User::new("u-1").with_display_name("Ada")));
        let current = session.current_session();
        assert_eq!(current.user().and_then(|u| u.display_name.as_deref()), Some("Ada"));
    }
}
