//! Page shells.
//!
//! [`AppShell`] wraps authenticated pages: it asks the visibility policy once
//! per render and mounts navigation accordingly, the header always, and the
//! page content always. [`AuthShell`] wraps auth-flow pages and never mounts
//! chrome at all.

use crate::config::{LoadingMode, ShellConfig};
use crate::policy::{ShellDecision, ShellVisibilityPolicy};
use crate::tree::{Element, Node};
use std::sync::Arc;
use tender_shell_core::{RouteSource, Session, SessionSource};

/// Marker attribute carried by shell roots.
pub const SHELL_ATTR: &str = "data-shell";
/// Marker attribute carried by chrome wrappers.
pub const CHROME_ATTR: &str = "data-chrome";
/// Marker attribute carried by layout regions.
pub const REGION_ATTR: &str = "data-region";

/// A chrome element (navigation, header) supplied by the application.
pub trait Chrome: Send + Sync {
    /// Render the element.
    fn render(&self) -> Node;
}

impl<F> Chrome for F
where
    F: Fn() -> Node + Send + Sync,
{
    fn render(&self) -> Node {
        self()
    }
}

/// Chrome that always renders the same tree.
#[derive(Debug, Clone)]
pub struct StaticChrome(pub Node);

impl Chrome for StaticChrome {
    fn render(&self) -> Node {
        self.0.clone()
    }
}

/// The two layout states of the responsive shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// Below the wide breakpoint.
    Narrow,
    /// At or above the wide breakpoint.
    Wide,
}

impl Viewport {
    /// Classify a viewport width against `breakpoint_px`.
    #[must_use]
    pub const fn from_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px >= breakpoint_px {
            Self::Wide
        } else {
            Self::Narrow
        }
    }
}

/// Leading margin of the main content region, per viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentMargin {
    /// Margin at wide viewports
    pub wide_px: u32,
    /// Margin at narrow viewports
    pub narrow_px: u32,
}

impl ContentMargin {
    /// No margin at any width.
    pub const NONE: Self = Self {
        wide_px: 0,
        narrow_px: 0,
    };

    /// Margin reserving room for a fixed navigation of `width_px` at wide
    /// viewports; the navigation overlays content at narrow ones.
    #[must_use]
    pub const fn for_navigation(width_px: u32) -> Self {
        Self {
            wide_px: width_px,
            narrow_px: 0,
        }
    }

    /// Margin in effect for `viewport`.
    #[must_use]
    pub const fn for_viewport(self, viewport: Viewport) -> u32 {
        match viewport {
            Viewport::Wide => self.wide_px,
            Viewport::Narrow => self.narrow_px,
        }
    }

    /// Read the margin back from a rendered content region.
    #[must_use]
    pub fn from_element(element: &Element) -> Option<Self> {
        Some(Self {
            wide_px: element.get("data-margin-wide")?.parse().ok()?,
            narrow_px: element.get("data-margin-narrow")?.parse().ok()?,
        })
    }

    fn apply(self, element: Element) -> Element {
        element
            .attr("data-margin-wide", self.wide_px.to_string())
            .attr("data-margin-narrow", self.narrow_px.to_string())
            .attr(
                "class",
                format!("ml-[{}px] md:ml-[{}px] transition-[margin]", self.narrow_px, self.wide_px),
            )
    }
}

/// Layout for authenticated application pages.
#[derive(Clone)]
pub struct AppShell {
    policy: ShellVisibilityPolicy,
    navigation: Arc<dyn Chrome>,
    header: Arc<dyn Chrome>,
    navigation_width_px: u32,
    wide_breakpoint_px: u32,
    loading_mode: LoadingMode,
}

impl AppShell {
    /// Shell with the given configuration and chrome.
    #[must_use]
    pub fn new(config: &ShellConfig, navigation: Arc<dyn Chrome>, header: Arc<dyn Chrome>) -> Self {
        Self {
            policy: ShellVisibilityPolicy::from_config(config),
            navigation,
            header,
            navigation_width_px: config.navigation_width_px,
            wide_breakpoint_px: config.wide_breakpoint_px,
            loading_mode: config.loading_mode,
        }
    }

    /// Layout state at a viewport `width_px` wide.
    #[must_use]
    pub const fn viewport(&self, width_px: u32) -> Viewport {
        Viewport::from_width(width_px, self.wide_breakpoint_px)
    }

    /// The policy this shell decides with.
    #[must_use]
    pub const fn policy(&self) -> &ShellVisibilityPolicy {
        &self.policy
    }

    /// Content margin that goes with `decision`.
    #[must_use]
    pub const fn content_margin(&self, decision: ShellDecision) -> ContentMargin {
        if decision.show_navigation {
            ContentMargin::for_navigation(self.navigation_width_px)
        } else {
            ContentMargin::NONE
        }
    }

    /// Render the shell around `children` for `(session, path)`.
    #[must_use]
    pub fn render(&self, session: &Session, path: Option<&str>, children: Node) -> Node {
        if !session.is_resolved() && self.loading_mode == LoadingMode::SuppressShell {
            tracing::trace!("Session unresolved, suppressing shell");
            return Element::new("div")
                .attr(SHELL_ATTR, "app")
                .attr("data-state", "loading")
                .attr("aria-busy", "true")
                .into();
        }

        let decision = self.policy.decide(session, path);
        tracing::trace!(
            path = path.unwrap_or_default(),
            show_navigation = decision.show_navigation,
            "Rendering app shell"
        );

        let mut root = Element::new("div")
            .attr(SHELL_ATTR, "app")
            .attr("class", "flex min-h-screen");

        if decision.show_navigation {
            root = root.child(
                Element::new("aside")
                    .attr(CHROME_ATTR, "navigation")
                    .attr("data-breakpoint", self.wide_breakpoint_px.to_string())
                    .attr("class", format!("fixed inset-y-0 w-[{}px]", self.navigation_width_px))
                    .child(self.navigation.render()),
            );
        }

        let content = self
            .content_margin(decision)
            .apply(Element::new("main").attr(REGION_ATTR, "content"))
            .child(children);

        root.child(
            Element::new("div")
                .attr(REGION_ATTR, "column")
                .attr("class", "flex flex-1 flex-col")
                .child(
                    Element::new("div")
                        .attr(CHROME_ATTR, "header")
                        .child(self.header.render()),
                )
                .child(content),
        )
        .into()
    }

    /// Render reading the session and path from their sources once each.
    #[must_use]
    pub fn render_from(
        &self,
        sessions: &dyn SessionSource,
        routes: &dyn RouteSource,
        children: Node,
    ) -> Node {
        let session = sessions.current_session();
        let path = routes.current_path();
        self.render(&session, Some(path.as_str()), children)
    }
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("policy", &self.policy)
            .field("navigation_width_px", &self.navigation_width_px)
            .field("wide_breakpoint_px", &self.wide_breakpoint_px)
            .field("loading_mode", &self.loading_mode)
            .finish_non_exhaustive()
    }
}

/// Layout for sign-in, sign-up and other auth-flow pages.
///
/// Takes no session or path: it cannot mount chrome even when composed
/// around a page that would otherwise qualify for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthShell;

impl AuthShell {
    /// Render a bare full-height container around `children`.
    #[must_use]
    pub fn render(self, children: Node) -> Node {
        Element::new("div")
            .attr(SHELL_ATTR, "auth")
            .attr("class", "min-h-screen")
            .child(children)
            .into()
    }
}
