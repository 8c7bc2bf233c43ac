//! Legacy `/tenders/{id}` redirect.
//!
//! A one-shot state machine: the first identifier observed on the legacy
//! route schedules a deferred commit; the commit replaces the current history
//! entry with the canonical sub-route and the machine stops for good.
//!
//! Every scheduled commit carries the generation it was scheduled under. A
//! newer observation (another identifier, or none) bumps the generation, so a
//! superseded commit arrives stale and is dropped. At most one `replace` is
//! issued, for the latest identifier observed before its commit fires.

use crate::config::LegacyRedirectConfig;
use crate::tree::Node;
use std::sync::Arc;
use tender_shell_core::effect::Effect;
use tender_shell_core::reducer::Reducer;
use tender_shell_core::{RouteSource, SmallVec, smallvec};
use tender_shell_runtime::{EffectHandle, Store, StoreError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Redirect lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RedirectPhase {
    /// Waiting for an identifier to commit.
    #[default]
    Pending,
    /// The replace command was issued. Terminal.
    Redirected {
        /// Path passed to `replace`
        target: String,
    },
}

/// Redirect state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectState {
    /// Lifecycle phase
    pub phase: RedirectPhase,
    /// Identifier waiting for its commit, if any
    pub scheduled: Option<String>,
    /// Bumped on every change of `scheduled`
    pub generation: u64,
}

impl RedirectState {
    /// Whether the machine can still redirect.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.phase, RedirectPhase::Pending)
    }

    /// Whether the replace command was issued.
    #[must_use]
    pub const fn is_redirected(&self) -> bool {
        matches!(self.phase, RedirectPhase::Redirected { .. })
    }

    /// Committed target, once redirected.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.phase {
            RedirectPhase::Redirected { target } => Some(target),
            RedirectPhase::Pending => None,
        }
    }
}

/// Redirect actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectAction {
    /// The route param was read. `None` (or blank) means no identifier yet.
    IdentifierObserved(Option<String>),
    /// A scheduled commit came due.
    CommitRedirect {
        /// Generation the commit was scheduled under
        generation: u64,
    },
}

/// Collaborators of the redirect reducer.
#[derive(Clone)]
pub struct RedirectEnvironment {
    /// Receives the `replace` command
    pub router: Arc<dyn RouteSource>,
    /// Target shape and commit delay
    pub config: LegacyRedirectConfig,
}

impl RedirectEnvironment {
    /// Environment over `router`.
    #[must_use]
    pub fn new(router: Arc<dyn RouteSource>, config: LegacyRedirectConfig) -> Self {
        Self { router, config }
    }
}

impl std::fmt::Debug for RedirectEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The redirect state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectReducer;

impl RedirectReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for RedirectReducer {
    type State = RedirectState;
    type Action = RedirectAction;
    type Environment = RedirectEnvironment;

    fn reduce(
        &self,
        state: &mut RedirectState,
        action: RedirectAction,
        env: &RedirectEnvironment,
    ) -> SmallVec<[Effect<RedirectAction>; 4]> {
        if state.is_redirected() {
            tracing::trace!(?action, "Redirect already committed, ignoring");
            return smallvec![Effect::None];
        }

        match action {
            RedirectAction::IdentifierObserved(identifier) => {
                let identifier = identifier.filter(|id| !id.trim().is_empty());
                if identifier == state.scheduled {
                    return smallvec![Effect::None];
                }

                state.generation += 1;
                state.scheduled.clone_from(&identifier);

                let Some(identifier) = identifier else {
                    tracing::debug!(generation = state.generation, "Scheduled redirect cancelled");
                    return smallvec![Effect::None];
                };

                tracing::debug!(%identifier, generation = state.generation, "Redirect scheduled");
                smallvec![Effect::after(
                    env.config.commit_delay(),
                    RedirectAction::CommitRedirect {
                        generation: state.generation,
                    },
                )]
            },

            RedirectAction::CommitRedirect { generation } => {
                let identifier = match &state.scheduled {
                    Some(identifier) if generation == state.generation => identifier,
                    Some(_) | None => {
                        tracing::trace!(generation, current = state.generation, "Stale commit dropped");
                        return smallvec![Effect::None];
                    },
                };

                let target = env.config.target_for(identifier);
                tracing::debug!(%target, "Redirect committed");
                state.phase = RedirectPhase::Redirected {
                    target: target.clone(),
                };
                state.scheduled = None;

                let router = Arc::clone(&env.router);
                smallvec![Effect::fire_and_forget(async move {
                    router.replace(&target);
                })]
            },
        }
    }
}

type RedirectStore = Store<RedirectReducer>;

/// Redirect component for the legacy tender page.
///
/// Renders nothing. [`mount`](Self::mount) watches the route and feeds
/// each observed identifier to the state machine until it redirects or
/// [`unmount`](Self::unmount) is called.
#[derive(Clone)]
pub struct LegacyRouteRedirector {
    store: RedirectStore,
    router: Arc<dyn RouteSource>,
    param: String,
    unmounted: Arc<watch::Sender<bool>>,
}

impl LegacyRouteRedirector {
    /// Redirector reading `config.param` from `router`.
    #[must_use]
    pub fn new(router: Arc<dyn RouteSource>, config: LegacyRedirectConfig) -> Self {
        let param = config.param.clone();
        let environment = RedirectEnvironment::new(Arc::clone(&router), config);
        Self {
            store: Store::new(RedirectState::default(), RedirectReducer::new(), environment),
            router,
            param,
            unmounted: Arc::new(watch::channel(false).0),
        }
    }

    /// Feed one observation to the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`unmount`](Self::unmount).
    pub async fn observe(&self, identifier: Option<String>) -> Result<EffectHandle, StoreError> {
        self.store
            .send(RedirectAction::IdentifierObserved(identifier))
            .await
    }

    /// Read the identifier param from the router and observe it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`unmount`](Self::unmount).
    pub async fn observe_current(&self) -> Result<EffectHandle, StoreError> {
        self.observe(self.router.route_param(&self.param)).await
    }

    /// Current phase.
    pub async fn phase(&self) -> RedirectPhase {
        self.store.state(|s| s.phase.clone()).await
    }

    /// Whether the replace command was issued.
    pub async fn is_redirected(&self) -> bool {
        self.store.state(RedirectState::is_redirected).await
    }

    /// The redirector contributes nothing to the render tree.
    #[must_use]
    pub fn render(&self) -> Node {
        Node::Empty
    }

    /// Start observing the route.
    ///
    /// Observes the current param immediately, then again on every path
    /// change. Finishes once redirected, on [`unmount`](Self::unmount), or
    /// when the route source goes away.
    #[must_use]
    pub fn mount(&self) -> JoinHandle<()> {
        let redirector = self.clone();
        let mut paths = self.router.subscribe();
        let mut unmounted = self.unmounted.subscribe();

        tokio::spawn(async move {
            loop {
                let stop = *unmounted.borrow_and_update();
                if stop {
                    tracing::debug!("Redirector unmounted");
                    break;
                }
                if redirector.is_redirected().await {
                    tracing::debug!("Redirector finished");
                    break;
                }
                if let Err(error) = redirector.observe_current().await {
                    tracing::debug!(%error, "Redirector stopped");
                    break;
                }
                tokio::select! {
                    changed = paths.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    },
                    _ = unmounted.changed() => {},
                }
            }
        })
    }

    /// Stop every mounted observer, stop accepting observations and wait
    /// for an in-flight commit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// after `timeout`.
    pub async fn unmount(&self, timeout: std::time::Duration) -> Result<(), StoreError> {
        self.unmounted.send_replace(true);
        self.store.shutdown(timeout).await
    }
}

impl std::fmt::Debug for LegacyRouteRedirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyRouteRedirector")
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}
