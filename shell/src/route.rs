//! In-memory routing.
//!
//! [`MemoryRouter`] keeps a history stack and derives route params by
//! matching the current path against registered [`RoutePattern`]s.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tender_shell_core::{RoutePath, RouteSource};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern with `:name` parameter segments, e.g. `/tenders/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse `pattern`. Empty segments are ignored.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameter segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `path` segment by segment. Returns the extracted params on a
    /// full match.
    #[must_use]
    pub fn matches(&self, path: &RoutePath) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.segments().collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {},
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                },
            }
        }
        Some(params)
    }
}

#[derive(Debug)]
struct History {
    entries: Vec<RoutePath>,
    patterns: Vec<RoutePattern>,
}

impl History {
    fn params(&self) -> HashMap<String, String> {
        let Some(current) = self.entries.last() else {
            return HashMap::new();
        };
        self.patterns
            .iter()
            .find_map(|p| p.matches(current))
            .unwrap_or_default()
    }
}

/// Route source backed by an in-memory history stack.
///
/// Clones share the same history.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    history: Arc<Mutex<History>>,
    tx: Arc<watch::Sender<RoutePath>>,
}

impl MemoryRouter {
    /// Router positioned at `path`.
    #[must_use]
    pub fn new(path: impl Into<RoutePath>) -> Self {
        let path = path.into();
        let (tx, _) = watch::channel(path.clone());
        Self {
            history: Arc::new(Mutex::new(History {
                entries: vec![path],
                patterns: Vec::new(),
            })),
            tx: Arc::new(tx),
        }
    }

    /// Register a pattern used to derive route params. First match wins.
    #[must_use]
    pub fn with_pattern(self, pattern: &str) -> Self {
        self.lock().patterns.push(RoutePattern::parse(pattern));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigate to `path`, adding a history entry.
    pub fn push(&self, path: &str) {
        let path = RoutePath::new(path);
        self.lock().entries.push(path.clone());
        tracing::trace!(%path, "Route pushed");
        self.tx.send_replace(path);
    }

    /// Go back one entry. Returns `false` at the first entry.
    pub fn back(&self) -> bool {
        let previous = {
            let mut history = self.lock();
            if history.entries.len() < 2 {
                return false;
            }
            history.entries.pop();
            history.entries.last().cloned()
        };
        if let Some(path) = previous {
            self.tx.send_replace(path);
        }
        true
    }

    /// Number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.lock().entries.len()
    }

    /// All route params for the current path.
    #[must_use]
    pub fn params(&self) -> HashMap<String, String> {
        self.lock().params()
    }
}

impl RouteSource for MemoryRouter {
    fn current_path(&self) -> RoutePath {
        self.tx.borrow().clone()
    }

    fn route_param(&self, name: &str) -> Option<String> {
        self.lock().params().remove(name)
    }

    fn replace(&self, path: &str) {
        let path = RoutePath::new(path);
        {
            let mut history = self.lock();
            match history.entries.last_mut() {
                Some(last) => *last = path.clone(),
                None => history.entries.push(path.clone()),
            }
        }
        tracing::debug!(%path, "Route replaced");
        self.tx.send_replace(path);
    }

    fn subscribe(&self) -> watch::Receiver<RoutePath> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_extracts_params() {
        let pattern = RoutePattern::parse("/tenders/:id");
        let params = pattern.matches(&RoutePath::new("/tenders/T123"));
        assert_eq!(params.and_then(|p| p.get("id").cloned()).as_deref(), Some("T123"));
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_pattern_rejects_other_shapes() {
        let pattern = RoutePattern::parse("/tenders/:id");
        assert!(pattern.matches(&RoutePath::new("/tenders")).is_none());
        assert!(pattern.matches(&RoutePath::new("/tenders/T1/extra")).is_none());
        assert!(pattern.matches(&RoutePath::new("/orders/T1")).is_none());
    }

    #[test]
    fn test_replace_overwrites_current_entry() {
        let router = MemoryRouter::new("/app").with_pattern("/tenders/:id");
        router.push("/tenders/T1");
        assert_eq!(router.route_param("id").as_deref(), Some("T1"));

        router.replace("/app/tenders/T1/ai-summary");
        assert_eq!(router.history_len(), 2);
        assert_eq!(router.route_param("id"), None);

        assert!(router.back());
        assert_eq!(router.current_path().as_str(), "/app");
        assert!(!router.back());
    }

    #[test]
    fn test_subscribers_see_navigation() {
        let router = MemoryRouter::new("/");
        let mut rx = router.subscribe();
        router.push("/tenders/T9");
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().as_str(), "/tenders/T9");
    }
}
