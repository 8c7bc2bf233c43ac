//! # Tender Shell Runtime
//!
//! The [`Store`] owns a reducer's state, runs the reducer for every action
//! and executes the effects it returns on tokio tasks. An action produced by
//! an effect is sent back into the same store.
//!
//! ## Example
//!
//! ```ignore
//! use tender_shell_runtime::Store;
//!
//! let store = Store::new(RedirectState::default(), RedirectReducer, environment);
//!
//! let mut handle = store.send(RedirectAction::IdentifierObserved(Some("T1".into()))).await?;
//! handle.wait().await;
//!
//! let redirected = store.state(|s| s.is_redirected()).await;
//! ```

use std::sync::Arc;
use tokio::sync::watch;

/// Store errors
pub mod error {
    use thiserror::Error;

    /// Errors returned by [`Store`](crate::Store) and
    /// [`EffectHandle`](crate::EffectHandle)
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// `shutdown` was called; no further actions are accepted
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Effects were still running when the shutdown deadline passed
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Effects were still running when a wait deadline passed
        #[error("Timed out waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Completion of the effects started by one [`Store::send`].
///
/// Actions fed back by those effects are reduced before the effect that
/// produced them counts as finished, so after [`wait`](Self::wait) their
/// state changes are visible. Effects *they* start are tracked by their own
/// handles.
#[derive(Debug, Clone)]
pub struct EffectHandle {
    running: watch::Receiver<usize>,
}

impl EffectHandle {
    fn tracked() -> (Self, Tracker) {
        let (tx, running) = watch::channel(0);
        (Self { running }, Tracker(Arc::new(tx)))
    }

    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        let (_, running) = watch::channel(0);
        Self { running }
    }

    /// Effects of this send still running
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.running.borrow()
    }

    /// Wait until every effect of this send has finished
    pub async fn wait(&mut self) {
        // A closed channel means every tracker is gone, so nothing is running.
        let _ = self.running.wait_for(|running| *running == 0).await;
    }

    /// [`wait`](Self::wait) with a deadline
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after `timeout`.
    pub async fn wait_with_timeout(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// Running-effect counter behind one [`EffectHandle`].
#[derive(Clone)]
struct Tracker(Arc<watch::Sender<usize>>);

/// Counts one running effect against its send and against the whole store.
///
/// Released on drop, so a panicking effect still settles its counters.
struct InFlight {
    send: Tracker,
    store: Arc<watch::Sender<usize>>,
}

impl InFlight {
    fn start(send: &Tracker, store: &Arc<watch::Sender<usize>>) -> Self {
        send.0.send_modify(|n| *n += 1);
        store.send_modify(|n| *n += 1);
        Self {
            send: send.clone(),
            store: Arc::clone(store),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.send.0.send_modify(|n| *n = n.saturating_sub(1));
        self.store.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// The store runtime
pub mod store {
    use super::{EffectHandle, InFlight, StoreError, Tracker};
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};
    use tender_shell_core::{effect::Effect, reducer::Reducer};
    use tokio::sync::{RwLock, watch};

    struct Inner<R: Reducer> {
        state: RwLock<R::State>,
        reducer: R,
        environment: R::Environment,
        closing: AtomicBool,
        in_flight: Arc<watch::Sender<usize>>,
    }

    /// Runs reducer `R` and executes its effects.
    ///
    /// Clones share state. Concurrent `send`s are serialized at the reducer;
    /// effects run concurrently on the tokio runtime.
    pub struct Store<R: Reducer> {
        inner: Arc<Inner<R>>,
    }

    impl<R: Reducer> Clone for Store<R> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<R> Store<R>
    where
        R: Reducer + Send + Sync + 'static,
        R::State: Send + Sync + 'static,
        R::Action: Send + 'static,
        R::Environment: Send + Sync + 'static,
    {
        /// Store over `initial_state`
        #[must_use]
        pub fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
            let (in_flight, _) = watch::channel(0);
            Self {
                inner: Arc::new(Inner {
                    state: RwLock::new(initial_state),
                    reducer,
                    environment,
                    closing: AtomicBool::new(false),
                    in_flight: Arc::new(in_flight),
                }),
            }
        }

        /// Whether [`shutdown`](Self::shutdown) has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.inner.closing.load(Ordering::Acquire)
        }

        /// Effects running across every send
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            *self.inner.in_flight.borrow()
        }

        /// Reduce `action` and start its effects
        ///
        /// Returns once the reducer has run and the effects are spawned.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] after [`shutdown`](Self::shutdown).
        #[tracing::instrument(skip_all, name = "store_send")]
        pub async fn send(&self, action: R::Action) -> Result<EffectHandle, StoreError> {
            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.actions.rejected").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.inner.state.write().await;
                let started = Instant::now();
                let effects =
                    self.inner
                        .reducer
                        .reduce(&mut state, action, &self.inner.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                effects
            };
            tracing::trace!(effects = effects.len(), "Reduced action");

            let (handle, tracker) = EffectHandle::tracked();
            for effect in effects {
                self.execute(effect, &tracker);
            }
            Ok(handle)
        }

        /// Read state through `f`
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            f(&*self.inner.state.read().await)
        }

        /// Stop accepting actions and wait for running effects
        ///
        /// Actions fed back by effects after this point are dropped.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] with the number of effects
        /// still running if they outlive `timeout`.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Store shutting down");
            self.inner.closing.store(true, Ordering::Release);

            let mut idle = self.inner.in_flight.subscribe();
            let drained = tokio::time::timeout(timeout, async move {
                let _ = idle.wait_for(|running| *running == 0).await;
            })
            .await;

            if drained.is_ok() {
                tracing::info!("Store shut down");
                metrics::counter!("store.shutdown.completed").increment(1);
                Ok(())
            } else {
                let running = self.pending_effects();
                tracing::error!(running, "Store shutdown timed out");
                metrics::counter!("store.shutdown.timeout").increment(1);
                Err(StoreError::ShutdownTimeout(running))
            }
        }

        fn execute(&self, effect: Effect<R::Action>, tracker: &Tracker) {
            match effect {
                Effect::None => {},
                Effect::Delay { duration, action } => {
                    self.spawn_effect(tracker, "delay", async move {
                        tokio::time::sleep(duration).await;
                        Some(*action)
                    });
                },
                Effect::Future(fut) => self.spawn_effect(tracker, "future", fut),
            }
        }

        /// Run `fut` on its own task and reduce whatever it yields.
        fn spawn_effect<F>(&self, tracker: &Tracker, kind: &'static str, fut: F)
        where
            F: Future<Output = Option<R::Action>> + Send + 'static,
        {
            metrics::counter!("store.effects.executed", "type" => kind).increment(1);
            let in_flight = InFlight::start(tracker, &self.inner.in_flight);
            let store = self.clone();

            tokio::spawn(async move {
                let _in_flight = in_flight;
                let Some(action) = fut.await else {
                    return;
                };
                if let Err(error) = store.send(action).await {
                    tracing::debug!(%error, kind, "Dropped action produced by effect");
                }
            });
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tender_shell_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

    #[derive(Debug, Default)]
    struct VisitState {
        visits: Vec<String>,
    }

    #[derive(Debug)]
    enum VisitAction {
        Visit(String),
        Ignore,
        VisitSoon(String),
        VisitLater(String),
        Stall,
        Crash,
    }

    struct VisitReducer;

    impl Reducer for VisitReducer {
        type State = VisitState;
        type Action = VisitAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut VisitState,
            action: VisitAction,
            _env: &(),
        ) -> SmallVec<[Effect<VisitAction>; 4]> {
            match action {
                VisitAction::Visit(path) => {
                    state.visits.push(path);
                    smallvec![Effect::None]
                },
                VisitAction::Ignore => smallvec![Effect::None],
                VisitAction::VisitSoon(path) => {
                    smallvec![Effect::Future(Box::pin(async move { Some(VisitAction::Visit(path)) }))]
                },
                VisitAction::VisitLater(path) => smallvec![Effect::after(
                    Duration::from_millis(10),
                    VisitAction::Visit(path)
                )],
                VisitAction::Stall => smallvec![Effect::fire_and_forget(tokio::time::sleep(
                    Duration::from_secs(3600)
                ))],
                VisitAction::Crash => {
                    #[allow(clippy::panic)]
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("effect failed");
                        }))]
                    }
                },
            }
        }
    }

    fn store() -> Store<VisitReducer> {
        Store::new(VisitState::default(), VisitReducer, ())
    }

    #[tokio::test]
    async fn test_send_applies_action() -> Result<(), StoreError> {
        let store = store();
        store.send(VisitAction::Visit("/app".into())).await?;
        store.send(VisitAction::Ignore).await?;

        assert_eq!(store.state(|s| s.visits.clone()).await, vec!["/app"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_future_output_reduced_before_handle_completes() -> Result<(), StoreError> {
        let store = store();
        let mut handle = store.send(VisitAction::VisitSoon("/a".into())).await?;
        handle.wait().await;

        assert_eq!(handle.pending(), 0);
        assert_eq!(store.state(|s| s.visits.clone()).await, vec!["/a"]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_defers_action() -> Result<(), StoreError> {
        let store = store();
        let mut handle = store.send(VisitAction::VisitLater("/later".into())).await?;
        assert_eq!(store.state(|s| s.visits.len()).await, 0);
        assert_eq!(store.pending_effects(), 1);

        handle.wait().await;
        assert_eq!(store.state(|s| s.visits.len()).await, 1);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_panicking_effect_settles() -> Result<(), StoreError> {
        let store = store();
        let mut handle = store.send(VisitAction::Crash).await?;
        handle.wait().await;

        assert_eq!(store.pending_effects(), 0);
        store.send(VisitAction::Visit("/after".into())).await?;
        assert_eq!(store.state(|s| s.visits.len()).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = store();
        store.shutdown(Duration::from_secs(1)).await?;
        assert!(store.is_shutting_down());

        let result = store.send(VisitAction::Ignore).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_late_feedback() -> Result<(), StoreError> {
        let store = store();
        store.send(VisitAction::VisitLater("/late".into())).await?;
        store.shutdown(Duration::from_secs(1)).await?;

        assert!(store.state(|s| s.visits.is_empty()).await);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_times_out_on_stalled_effect() -> Result<(), StoreError> {
        let store = store();
        store.send(VisitAction::Stall).await?;

        let result = store.shutdown(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_with_timeout() -> Result<(), StoreError> {
        let store = store();
        let mut stalled = store.send(VisitAction::Stall).await?;
        assert!(matches!(
            stalled.wait_with_timeout(Duration::from_millis(10)).await,
            Err(StoreError::Timeout)
        ));

        let mut done = EffectHandle::completed();
        assert!(done.wait_with_timeout(Duration::from_millis(10)).await.is_ok());
        Ok(())
    }
}
