//! Route path snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable snapshot of the current location path.
///
/// A new snapshot is produced on every navigation; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    /// Wrap a path string.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path begins with `prefix` (plain string prefix).
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_skip_empty() {
        let path = RoutePath::new("/app//tenders/T1/");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["app", "tenders", "T1"]);
    }

    #[test]
    fn test_prefix_is_plain_string_prefix() {
        let path = RoutePath::from("/auth/login");
        assert!(path.starts_with("/auth"));
        assert!(!path.starts_with("/app"));
    }
}
