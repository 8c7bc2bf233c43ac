//! # Tender Shell Core
//!
//! Core traits and types for the tender application shell.
//!
//! The shell is built the same way every feature of the application is: a
//! pure reducer decides, and a runtime performs the side effects the reducer
//! describes. This crate holds the vocabulary shared by every layer:
//!
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators ([`SessionSource`], [`RouteSource`])
//! - **Session** / **`RoutePath`**: the two inputs every shell decision reads
//!
//! ## Example
//!
//! ```ignore
//! use tender_shell_core::*;
//!
//! impl Reducer for RedirectReducer {
//!     type State = RedirectState;
//!     type Action = RedirectAction;
//!     type Environment = RedirectEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut RedirectState,
//!         action: RedirectAction,
//!         env: &RedirectEnvironment,
//!     ) -> SmallVec<[Effect<RedirectAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Collaborator traits injected into reducers and shells
pub mod environment;

/// Current-location snapshots
pub mod route;

/// Authenticated-user presence
pub mod session;

pub use environment::{RouteSource, SessionSource};
pub use route::RoutePath;
pub use session::{Session, User};

/// Reducer module - The core trait for decision logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They hold all decision logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for decision logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected collaborators
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions for the
        /// runtime to execute. Must not perform I/O itself.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Side effects a reducer asks the runtime to perform.
///
/// An effect is a value. Nothing happens until a store executes it.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Boxed future an effect runs; its output, if any, goes back to the reducer.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// A side effect description returned by a reducer.
    pub enum Effect<Action> {
        /// Nothing to do.
        None,

        /// Feed `action` back after `duration` (deferred commits).
        Delay {
            /// Wait before feeding back
            duration: Duration,
            /// Action fed back
            action: Box<Action>,
        },

        /// Run a future; a `Some` output is fed back.
        Future(EffectFuture<Action>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => f.write_str("Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => f.write_str("Effect::Future(..)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Feed `action` back once `duration` has elapsed.
        #[must_use]
        pub fn after(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Run a command whose outcome the reducer does not need, such as
        /// a navigation.
        #[must_use]
        pub fn fire_and_forget<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                fut.await;
                None
            }))
        }

        /// Whether executing this effect does nothing.
        #[must_use]
        pub const fn is_noop(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}
