//! Deterministic store for reducer scenarios.
//!
//! [`TestStore`] runs the reducer exactly like the runtime `Store` does but
//! never spawns. Effects are queued and only executed when the test calls
//! [`TestStore::run_effects`], so a test can interleave actions with effect
//! execution in any order it needs (for example: several observations land
//! before any deferred commit fires).

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;
use tender_shell_core::{effect::Effect, reducer::Reducer};

/// A single-threaded store with a manually drained effect queue.
///
/// `Delay` effects ignore their duration: draining the queue is the moment
/// the delay elapses.
pub struct TestStore<R>
where
    R: Reducer,
{
    reducer: R,
    environment: R::Environment,
    state: R::State,
    queue: VecDeque<Effect<R::Action>>,
    received: Vec<R::Action>,
}

impl<R> TestStore<R>
where
    R: Reducer,
    R::Action: Clone,
{
    /// Create a test store
    pub fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self {
            reducer,
            environment,
            state: initial_state,
            queue: VecDeque::new(),
            received: Vec::new(),
        }
    }

    /// Reduce an action and queue its effects without running them
    pub fn send(&mut self, action: R::Action) -> &mut Self {
        let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
        self.queue.extend(effects);
        self
    }

    /// Current state
    pub const fn state(&self) -> &R::State {
        &self.state
    }

    /// Number of queued effects that would do work
    pub fn pending_effects(&self) -> usize {
        self.queue.iter().filter(|e| !e.is_noop()).count()
    }

    /// Actions fed back into the reducer by effects, in order
    pub fn received(&self) -> &[R::Action] {
        &self.received
    }

    /// Drain the effect queue, feeding produced actions back, until idle
    ///
    /// Effects run in FIFO order. Returns the number of actions fed back.
    pub async fn run_effects(&mut self) -> usize {
        let mut fed_back = 0;

        while let Some(effect) = self.queue.pop_front() {
            match effect {
                Effect::None => {},
                Effect::Delay { action, .. } => {
                    self.feed_back(*action);
                    fed_back += 1;
                },
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        self.feed_back(action);
                        fed_back += 1;
                    }
                },
            }
        }

        fed_back
    }

    fn feed_back(&mut self, action: R::Action) {
        self.received.push(action.clone());
        self.send(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tender_shell_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, PartialEq)]
    enum PageAction {
        Load(u32),
        Loaded(u32),
        Preload(Vec<u32>),
    }

    #[derive(Debug, Default)]
    struct PageState {
        loaded: Vec<u32>,
    }

    struct PageReducer;

    impl Reducer for PageReducer {
        type State = PageState;
        type Action = PageAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PageAction::Load(page) => smallvec![Effect::Future(Box::pin(async move {
                    Some(PageAction::Loaded(page))
                }))],
                PageAction::Loaded(page) => {
                    state.loaded.push(page);
                    smallvec![Effect::None]
                },
                PageAction::Preload(pages) => pages
                    .into_iter()
                    .map(|p| Effect::after(Duration::from_secs(60), PageAction::Load(p)))
                    .collect(),
            }
        }
    }

    #[tokio::test]
    async fn test_effects_wait_for_explicit_drain() {
        let mut store = TestStore::new(PageState::default(), PageReducer, ());
        store.send(PageAction::Load(1)).send(PageAction::Load(2));

        assert!(store.state().loaded.is_empty());
        assert_eq!(store.pending_effects(), 2);

        let fed_back = store.run_effects().await;
        assert_eq!(fed_back, 2);
        assert_eq!(store.state().loaded, vec![1, 2]);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_delays_fire_without_waiting() {
        let mut store = TestStore::new(PageState::default(), PageReducer, ());
        store.send(PageAction::Preload(vec![3, 4]));

        store.run_effects().await;

        assert_eq!(store.state().loaded, vec![3, 4]);
        assert_eq!(
            store.received(),
            &[
                PageAction::Load(3),
                PageAction::Load(4),
                PageAction::Loaded(3),
                PageAction::Loaded(4),
            ]
        );
    }
}
