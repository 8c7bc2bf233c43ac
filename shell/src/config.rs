//! Shell configuration.
//!
//! Every path and size the shell decides with comes from [`ShellConfig`].
//! Values can be built in code, loaded from TOML, and overridden from the
//! environment (`TENDER_SHELL_*`).
//!
//! ```toml
//! onboarding_path = "/onboarding"
//! auth_prefix = "/auth"
//! navigation_width_px = 256
//! wide_breakpoint_px = 768
//! loading_mode = "treat_as_absent"
//!
//! [legacy_redirect]
//! pattern = "/tenders/:id"
//! param = "id"
//! base_path = "/app/tenders"
//! suffix = "ai-summary"
//! commit_delay_ms = 0
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override held an unusable value
    #[error("invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },

    /// A value failed validation
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// How the shell presents itself while the session is still unresolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingMode {
    /// Render the signed-out chrome: header and content, no navigation.
    #[default]
    TreatAsAbsent,
    /// Render an empty shell until the session resolves.
    SuppressShell,
}

/// Legacy `/tenders/{id}` redirect configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LegacyRedirectConfig {
    /// Route pattern of the legacy page, `:name` marks a param.
    pub pattern: String,

    /// Name of the param carrying the tender identifier.
    pub param: String,

    /// Base path of the canonical tender pages.
    pub base_path: String,

    /// Sub-route appended after the identifier.
    pub suffix: String,

    /// How long an observed identifier waits before its redirect commits.
    ///
    /// A newer identifier observed within this window supersedes it.
    /// Default: 0 (commit on the next scheduler turn)
    pub commit_delay_ms: u64,
}

impl LegacyRedirectConfig {
    /// Set the canonical base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the commit delay.
    #[must_use]
    pub const fn with_commit_delay_ms(mut self, ms: u64) -> Self {
        self.commit_delay_ms = ms;
        self
    }

    /// Commit delay as a [`Duration`].
    #[must_use]
    pub const fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Canonical target for `identifier`: `{base_path}/{identifier}/{suffix}`.
    #[must_use]
    pub fn target_for(&self, identifier: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_path.trim_end_matches('/'),
            identifier,
            self.suffix.trim_matches('/')
        )
    }
}

impl Default for LegacyRedirectConfig {
    fn default() -> Self {
        Self {
            pattern: "/tenders/:id".to_string(),
            param: "id".to_string(),
            base_path: "/app/tenders".to_string(),
            suffix: "ai-summary".to_string(),
            commit_delay_ms: 0,
        }
    }
}

/// Application shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Path of the onboarding page (exact match hides navigation).
    ///
    /// Default: `/onboarding`
    pub onboarding_path: String,

    /// Prefix of auth-flow pages (prefix match hides navigation).
    ///
    /// Default: `/auth`
    pub auth_prefix: String,

    /// Fixed width of the primary navigation at wide viewports.
    ///
    /// Default: 256
    pub navigation_width_px: u32,

    /// Viewport width from which the layout is considered wide.
    ///
    /// Default: 768
    pub wide_breakpoint_px: u32,

    /// Presentation while the session is unresolved.
    pub loading_mode: LoadingMode,

    /// Legacy tender route redirect.
    pub legacy_redirect: LegacyRedirectConfig,
}

impl ShellConfig {
    /// Set the onboarding path.
    #[must_use]
    pub fn with_onboarding_path(mut self, path: impl Into<String>) -> Self {
        self.onboarding_path = path.into();
        self
    }

    /// Set the auth-flow prefix.
    #[must_use]
    pub fn with_auth_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_prefix = prefix.into();
        self
    }

    /// Set the navigation width.
    #[must_use]
    pub const fn with_navigation_width(mut self, px: u32) -> Self {
        self.navigation_width_px = px;
        self
    }

    /// Set the wide-viewport breakpoint.
    #[must_use]
    pub const fn with_wide_breakpoint(mut self, px: u32) -> Self {
        self.wide_breakpoint_px = px;
        self
    }

    /// Set the loading-session presentation.
    #[must_use]
    pub const fn with_loading_mode(mut self, mode: LoadingMode) -> Self {
        self.loading_mode = mode;
        self
    }

    /// Set the legacy redirect configuration.
    #[must_use]
    pub fn with_legacy_redirect(mut self, legacy: LegacyRedirectConfig) -> Self {
        self.legacy_redirect = legacy;
        self
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for unusable values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`from_toml_str`](Self::from_toml_str) and
    /// [`apply_env`](Self::apply_env).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&input)?;
        config.apply_env(|var| std::env::var(var).ok())?;
        tracing::debug!(path = %path.display(), "Loaded shell configuration");
        Ok(config)
    }

    /// Defaults plus environment overrides.
    ///
    /// # Errors
    ///
    /// See [`apply_env`](Self::apply_env).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply `TENDER_SHELL_*` overrides read through `lookup`, then validate.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `TENDER_SHELL_ONBOARDING_PATH` | `onboarding_path` |
    /// | `TENDER_SHELL_AUTH_PREFIX` | `auth_prefix` |
    /// | `TENDER_SHELL_NAV_WIDTH_PX` | `navigation_width_px` |
    /// | `TENDER_SHELL_WIDE_BREAKPOINT_PX` | `wide_breakpoint_px` |
    /// | `TENDER_SHELL_LOADING_MODE` | `loading_mode` |
    /// | `TENDER_SHELL_LEGACY_PATTERN` | `legacy_redirect.pattern` |
    /// | `TENDER_SHELL_LEGACY_PARAM` | `legacy_redirect.param` |
    /// | `TENDER_SHELL_TENDERS_BASE_PATH` | `legacy_redirect.base_path` |
    /// | `TENDER_SHELL_TENDERS_SUFFIX` | `legacy_redirect.suffix` |
    /// | `TENDER_SHELL_REDIRECT_DELAY_MS` | `legacy_redirect.commit_delay_ms` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for unparsable values and
    /// [`ConfigError::Validation`] if the result is invalid.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TENDER_SHELL_ONBOARDING_PATH") {
            self.onboarding_path = path;
        }
        if let Some(prefix) = lookup("TENDER_SHELL_AUTH_PREFIX") {
            self.auth_prefix = prefix;
        }
        if let Some(width) = parse_env(&lookup, "TENDER_SHELL_NAV_WIDTH_PX")? {
            self.navigation_width_px = width;
        }
        if let Some(breakpoint) = parse_env(&lookup, "TENDER_SHELL_WIDE_BREAKPOINT_PX")? {
            self.wide_breakpoint_px = breakpoint;
        }
        if let Some(mode) = lookup("TENDER_SHELL_LOADING_MODE") {
            self.loading_mode = match mode.as_str() {
                "treat_as_absent" => LoadingMode::TreatAsAbsent,
                "suppress_shell" => LoadingMode::SuppressShell,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "TENDER_SHELL_LOADING_MODE".to_string(),
                        value: mode,
                    });
                },
            };
        }
        let legacy = &mut self.legacy_redirect;
        if let Some(pattern) = lookup("TENDER_SHELL_LEGACY_PATTERN") {
            legacy.pattern = pattern;
        }
        if let Some(param) = lookup("TENDER_SHELL_LEGACY_PARAM") {
            legacy.param = param;
        }
        if let Some(base) = lookup("TENDER_SHELL_TENDERS_BASE_PATH") {
            legacy.base_path = base;
        }
        if let Some(suffix) = lookup("TENDER_SHELL_TENDERS_SUFFIX") {
            legacy.suffix = suffix;
        }
        if let Some(delay) = parse_env(&lookup, "TENDER_SHELL_REDIRECT_DELAY_MS")? {
            legacy.commit_delay_ms = delay;
        }
        self.validate()
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let absolute = [
            ("onboarding_path", &self.onboarding_path),
            ("auth_prefix", &self.auth_prefix),
            ("legacy_redirect.pattern", &self.legacy_redirect.pattern),
            ("legacy_redirect.base_path", &self.legacy_redirect.base_path),
        ];
        for (name, value) in absolute {
            if !value.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{name} must start with '/', got {value:?}"
                )));
            }
        }
        for (name, px) in [
            ("navigation_width_px", self.navigation_width_px),
            ("wide_breakpoint_px", self.wide_breakpoint_px),
        ] {
            if px == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        if self.legacy_redirect.param.is_empty() {
            return Err(ConfigError::Validation(
                "legacy_redirect.param must not be empty".to_string(),
            ));
        }
        let marker = format!(":{}", self.legacy_redirect.param);
        if !self.legacy_redirect.pattern.split('/').any(|s| s == marker) {
            return Err(ConfigError::Validation(format!(
                "legacy_redirect.pattern {:?} has no {marker} segment",
                self.legacy_redirect.pattern
            )));
        }
        if self.legacy_redirect.suffix.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "legacy_redirect.suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Numeric override: `Ok(None)` when unset.
fn parse_env<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value,
            })
        })
        .transpose()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            onboarding_path: "/onboarding".to_string(),
            auth_prefix: "/auth".to_string(),
            navigation_width_px: 256,
            wide_breakpoint_px: 768,
            loading_mode: LoadingMode::default(),
            legacy_redirect: LegacyRedirectConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.navigation_width_px, 256);
        assert_eq!(config.loading_mode, LoadingMode::TreatAsAbsent);
    }

    #[test]
    fn test_target_for() {
        let legacy = LegacyRedirectConfig::default();
        assert_eq!(legacy.target_for("T123"), "/app/tenders/T123/ai-summary");

        let trailing = legacy.with_base_path("/app/tenders/");
        assert_eq!(trailing.target_for("T1"), "/app/tenders/T1/ai-summary");
    }

    #[test]
    #[allow(clippy::panic)]
    fn test_partial_toml_keeps_defaults() {
        let config = ShellConfig::from_toml_str(
            r#"
            auth_prefix = "/login"
            loading_mode = "suppress_shell"

            [legacy_redirect]
            commit_delay_ms = 25
            "#,
        );
        let config = match config {
            Ok(config) => config,
            Err(e) => panic!("config should parse: {e}"),
        };

        assert_eq!(config.auth_prefix, "/login");
        assert_eq!(config.onboarding_path, "/onboarding");
        assert_eq!(config.loading_mode, LoadingMode::SuppressShell);
        assert_eq!(config.legacy_redirect.commit_delay(), Duration::from_millis(25));
        assert_eq!(config.legacy_redirect.param, "id");
    }

    #[test]
    fn test_malformed_toml() {
        let result = ShellConfig::from_toml_str("navigation_width_px = \"wide\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_relative_path_rejected() {
        let result = ShellConfig::from_toml_str("onboarding_path = \"onboarding\"");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_pattern_must_carry_param() {
        let config = ShellConfig::default().with_legacy_redirect(LegacyRedirectConfig {
            pattern: "/tenders/:tenderId".to_string(),
            ..LegacyRedirectConfig::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TENDER_SHELL_NAV_WIDTH_PX", "288"),
            ("TENDER_SHELL_LOADING_MODE", "suppress_shell"),
            ("TENDER_SHELL_TENDERS_BASE_PATH", "/workspace/tenders"),
        ]);
        let mut config = ShellConfig::default();
        let result = config.apply_env(|var| vars.get(var).map(ToString::to_string));

        assert!(result.is_ok());
        assert_eq!(config.navigation_width_px, 288);
        assert_eq!(config.loading_mode, LoadingMode::SuppressShell);
        assert_eq!(
            config.legacy_redirect.target_for("T9"),
            "/workspace/tenders/T9/ai-summary"
        );
    }

    #[test]
    fn test_env_overrides_legacy_redirect_and_breakpoint() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TENDER_SHELL_WIDE_BREAKPOINT_PX", "1024"),
            ("TENDER_SHELL_LEGACY_PATTERN", "/t/:tenderId"),
            ("TENDER_SHELL_LEGACY_PARAM", "tenderId"),
            ("TENDER_SHELL_TENDERS_SUFFIX", "overview"),
            ("TENDER_SHELL_REDIRECT_DELAY_MS", "40"),
        ]);
        let mut config = ShellConfig::default();
        let result = config.apply_env(|var| vars.get(var).map(ToString::to_string));

        assert!(result.is_ok());
        assert_eq!(config.wide_breakpoint_px, 1024);
        assert_eq!(config.legacy_redirect.param, "tenderId");
        assert_eq!(config.legacy_redirect.commit_delay(), Duration::from_millis(40));
        assert_eq!(
            config.legacy_redirect.target_for("T9"),
            "/app/tenders/T9/overview"
        );
    }

    #[test]
    fn test_env_rejects_unparsable_delay() {
        let mut config = ShellConfig::default();
        let result = config.apply_env(|var| {
            (var == "TENDER_SHELL_REDIRECT_DELAY_MS").then(|| "soon".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv { var, .. }) if var == "TENDER_SHELL_REDIRECT_DELAY_MS"
        ));
    }

    #[test]
    fn test_zero_breakpoint_rejected() {
        let config = ShellConfig::default().with_wide_breakpoint(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let from_env = ShellConfig::default().apply_env(|var| {
            (var == "TENDER_SHELL_WIDE_BREAKPOINT_PX").then(|| "0".to_string())
        });
        assert!(matches!(from_env, Err(ConfigError::Validation(_))));

        assert!(ShellConfig::default().with_wide_breakpoint(1280).validate().is_ok());
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = ShellConfig::default();
        let result = config.apply_env(|var| {
            (var == "TENDER_SHELL_NAV_WIDTH_PX").then(|| "wide".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }
}
