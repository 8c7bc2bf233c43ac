//! # Tender Shell
//!
//! Application shell for the tender app: which chrome wraps a page, how the
//! two page shells lay themselves out, and the one-shot redirect from legacy
//! `/tenders/{id}` links to the canonical AI summary page.
//!
//! - [`ShellVisibilityPolicy`]: pure `(session, path) → ShellDecision`
//! - [`AppShell`] / [`AuthShell`]: layouts producing a [`Node`] tree
//! - [`LegacyRouteRedirector`]: redirect state machine on the runtime `Store`
//! - [`SharedSession`] / [`MemoryRouter`]: collaborator implementations
//! - [`primitives`]: button, input and checkbox with explicit options
//! - [`ShellConfig`]: TOML + environment configuration
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tender_shell::*;
//!
//! let config = ShellConfig::from_env()?;
//! let sessions = SharedSession::new();
//! let router = MemoryRouter::new("/app/dashboard");
//!
//! let shell = AppShell::new(&config, Arc::new(nav), Arc::new(header));
//! let page = shell.render_from(&sessions, &router, Node::text("Dashboard"));
//! ```

/// Shell configuration
pub mod config;

/// Page shells and chrome
pub mod layout;

/// Chrome visibility rules
pub mod policy;

/// UI primitives with explicit options
pub mod primitives;

/// Legacy tender route redirect
pub mod redirect;

/// In-memory routing
pub mod route;

/// Shared session handle
pub mod session;

/// Render tree
pub mod tree;

pub use config::{ConfigError, LegacyRedirectConfig, LoadingMode, ShellConfig};
pub use layout::{AppShell, AuthShell, Chrome, ContentMargin, StaticChrome, Viewport};
pub use policy::{DecisionReason, ShellDecision, ShellVisibilityPolicy};
pub use redirect::{
    LegacyRouteRedirector, RedirectAction, RedirectEnvironment, RedirectPhase, RedirectReducer,
    RedirectState,
};
pub use route::{MemoryRouter, RoutePattern};
pub use session::{AuthContext, SharedSession};
pub use tree::{Element, Node};

pub use tender_shell_core::{RoutePath, RouteSource, Session, SessionSource, User};
