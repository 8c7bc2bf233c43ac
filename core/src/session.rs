//! Session types.
//!
//! The shell only ever asks one question of a session: is somebody signed
//! in? The user record is carried through so chrome collaborators can show a
//! name, but nothing in the decision core inspects it.

use serde::{Deserialize, Serialize};

/// An authenticated user as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier assigned by the identity provider.
    pub id: String,

    /// Primary email address, if the provider shared one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Human-readable name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Create a user with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Authenticated-user presence for the current client.
///
/// `Unknown` is the state before the session collaborator has resolved.
/// It is distinct from `Absent` (confirmed signed out) so callers can choose
/// how to present the loading window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum Session {
    /// Not yet resolved.
    #[default]
    Unknown,
    /// Confirmed: nobody is signed in.
    Absent,
    /// Somebody is signed in.
    Present(User),
}

impl Session {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Whether the collaborator has produced a definitive answer.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Present(user) => Some(user),
            Self::Unknown | Self::Absent => None,
        }
    }
}

impl From<Option<User>> for Session {
    fn from(user: Option<User>) -> Self {
        user.map_or(Self::Absent, Self::Present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        let session = Session::default();
        assert!(!session.is_resolved());
        assert!(!session.is_present());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Session::from(None), Session::Absent);
        let session = Session::from(Some(User::new("u-1")));
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("u-1"));
    }

    #[test]
    fn test_serde_shape() {
        let session = Session::Present(User::new("u-7").with_email("a@b.c"));
        let json = serde_json::to_value(&session).unwrap_or_default();
        assert_eq!(json["status"], "present");
        assert_eq!(json["user"]["id"], "u-7");

        let absent = serde_json::to_value(Session::Absent).unwrap_or_default();
        assert_eq!(absent["status"], "absent");
    }
}
