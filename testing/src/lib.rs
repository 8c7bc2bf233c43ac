//! # Tender Shell Testing
//!
//! Testing utilities and helpers for the tender application shell.
//!
//! This crate provides:
//! - Mock implementations of the collaborator traits
//! - [`ReducerTest`] for Given-When-Then reducer tests
//! - [`TestStore`] for scenarios that need control over when effects run
//!
//! ## Example
//!
//! ```ignore
//! use tender_shell_testing::{RecordingRouteSource, TestStore};
//!
//! #[tokio::test]
//! async fn test_redirect_fires_once() {
//!     let router = RecordingRouteSource::at("/tenders/T1");
//!     let mut store = TestStore::new(RedirectState::default(), RedirectReducer::new(), env(&router));
//!
//!     store.send(RedirectAction::IdentifierObserved(Some("T1".into())));
//!     store.run_effects().await;
//!
//!     assert_eq!(router.replace_calls().len(), 1);
//! }
//! ```

use tender_shell_core::{RoutePath, RouteSource, Session, SessionSource, User};


/// Deterministic effect-queue store
pub mod test_store;

/// Mock implementations of collaborator traits
pub mod mocks {
    use super::{RoutePath, RouteSource, Session, SessionSource, User};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, PoisonError};
    use tokio::sync::watch;

    /// Session source with a fixed (but settable) answer
    ///
    /// # Example
    ///
    /// ```
    /// use tender_shell_testing::mocks::StaticSessionSource;
    /// use tender_shell_core::{Session, SessionSource};
    ///
    /// let sessions = StaticSessionSource::absent();
    /// assert_eq!(sessions.current_session(), Session::Absent);
    /// ```
    #[derive(Debug, Clone)]
    pub struct StaticSessionSource {
        tx: Arc<watch::Sender<Session>>,
    }

    impl StaticSessionSource {
        /// Source reporting `session`
        #[must_use]
        pub fn new(session: Session) -> Self {
            let (tx, _) = watch::channel(session);
            Self { tx: Arc::new(tx) }
        }

        /// Source reporting a signed-in `user`
        #[must_use]
        pub fn present(user: User) -> Self {
            Self::new(Session::Present(user))
        }

        /// Source reporting a confirmed signed-out client
        #[must_use]
        pub fn absent() -> Self {
            Self::new(Session::Absent)
        }

        /// Source that has not resolved yet
        #[must_use]
        pub fn unknown() -> Self {
            Self::new(Session::Unknown)
        }

        /// Change the reported session, notifying subscribers
        pub fn set(&self, session: Session) {
            self.tx.send_replace(session);
        }
    }

    impl SessionSource for StaticSessionSource {
        fn current_session(&self) -> Session {
            self.tx.borrow().clone()
        }

        fn subscribe(&self) -> watch::Receiver<Session> {
            self.tx.subscribe()
        }
    }

    #[derive(Debug)]
    struct RouteRecord {
        params: HashMap<String, String>,
        replaced: Vec<String>,
    }

    /// Route source that records every `replace` call
    ///
    /// `replace` also moves the current path, like a real history would.
    /// Params are set explicitly by the test and are not derived from the path.
    #[derive(Debug, Clone)]
    pub struct RecordingRouteSource {
        path: Arc<watch::Sender<RoutePath>>,
        record: Arc<Mutex<RouteRecord>>,
    }

    impl RecordingRouteSource {
        /// Route source positioned at `path` with no params
        #[must_use]
        pub fn at(path: &str) -> Self {
            let (tx, _) = watch::channel(RoutePath::new(path));
            Self {
                path: Arc::new(tx),
                record: Arc::new(Mutex::new(RouteRecord {
                    params: HashMap::new(),
                    replaced: Vec::new(),
                })),
            }
        }

        /// Set a route param
        #[must_use]
        pub fn with_param(self, name: &str, value: &str) -> Self {
            self.set_param(name, Some(value));
            self
        }

        /// Set or clear a route param without notifying subscribers
        pub fn set_param(&self, name: &str, value: Option<&str>) {
            let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
            match value {
                Some(value) => record.params.insert(name.to_string(), value.to_string()),
                None => record.params.remove(name),
            };
        }

        /// Simulate client-side navigation: new path and param, subscribers notified
        pub fn navigate(&self, path: &str, param: (&str, Option<&str>)) {
            self.set_param(param.0, param.1);
            self.path.send_replace(RoutePath::new(path));
        }

        /// Every path passed to `replace`, in order
        #[must_use]
        pub fn replace_calls(&self) -> Vec<String> {
            self.record
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .replaced
                .clone()
        }
    }

    impl RouteSource for RecordingRouteSource {
        fn current_path(&self) -> RoutePath {
            self.path.borrow().clone()
        }

        fn route_param(&self, name: &str) -> Option<String> {
            self.record
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .params
                .get(name)
                .cloned()
        }

        fn replace(&self, path: &str) {
            self.record
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .replaced
                .push(path.to_string());
            self.path.send_replace(RoutePath::new(path));
        }

        fn subscribe(&self) -> watch::Receiver<RoutePath> {
            self.path.subscribe()
        }
    }

    /// A signed-in user for tests
    #[must_use]
    pub fn test_user() -> User {
        User::new("user-1")
            .with_email("buyer@example.com")
            .with_display_name("Test Buyer")
    }
}

// Re-export commonly used items
pub use mocks::{RecordingRouteSource, StaticSessionSource, test_user};
pub use reducer_test::{ReducerTest, assertions};
pub use test_store::TestStore;
