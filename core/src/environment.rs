//! Environment module - Collaborator traits
//!
//! Everything outside the shell core is reached through these traits and
//! injected via a reducer's Environment or passed to a shell explicitly.
//! There is no ambient global lookup.

use crate::{RoutePath, Session};
use tokio::sync::watch;

/// Supplies the current authenticated-user presence.
///
/// Read-only from the shell's perspective. Implementations own the session
/// lifecycle (login, logout, refresh).
///
/// # Examples
///
/// ```ignore
/// // Production - backed by the auth client
/// let sessions = SharedSession::new();
/// sessions.resolve(Session::Absent);
///
/// // Test - fixed answer
/// let sessions = StaticSessionSource::present(test_user());
/// ```
pub trait SessionSource: Send + Sync {
    /// Current session snapshot
    fn current_session(&self) -> Session;

    /// Subscribe to session changes
    ///
    /// The receiver yields whenever the session value changes.
    fn subscribe(&self) -> watch::Receiver<Session>;
}

/// Supplies the current location and a navigation command.
pub trait RouteSource: Send + Sync {
    /// Current path snapshot
    fn current_path(&self) -> RoutePath;

    /// Value of a named parameter extracted from the current path
    fn route_param(&self, name: &str) -> Option<String>;

    /// Replace the current history entry with `path`
    ///
    /// Fire-and-forget: no confirmation, no error.
    fn replace(&self, path: &str);

    /// Subscribe to path changes
    fn subscribe(&self) -> watch::Receiver<RoutePath>;
}
