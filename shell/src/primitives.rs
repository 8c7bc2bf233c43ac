//! UI primitives.
//!
//! Each primitive takes an explicit options record. Every option has a
//! documented default; there is no pass-through bag of extra attributes.

use crate::tree::{Element, Node};
use serde::{Deserialize, Serialize};

/// Visual emphasis of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    /// Filled primary action
    #[default]
    Primary,
    /// Muted secondary action
    Secondary,
    /// Bordered, transparent fill
    Outline,
    /// Text-only
    Ghost,
    /// Irreversible action
    Destructive,
}

impl ButtonVariant {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Outline => "outline",
            Self::Ghost => "ghost",
            Self::Destructive => "destructive",
        }
    }
}

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSize {
    /// Compact
    Small,
    /// Standard
    #[default]
    Medium,
    /// Prominent
    Large,
    /// Square, for a lone icon
    Icon,
}

impl ButtonSize {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
            Self::Icon => "icon",
        }
    }
}

/// HTML `type` of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Plain button; does not submit forms
    #[default]
    Button,
    /// Submits the enclosing form
    Submit,
    /// Resets the enclosing form
    Reset,
}

impl ButtonKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }
}

/// Button options.
///
/// Defaults: `Primary`, `Medium`, `Button`, enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonOptions {
    /// Visual emphasis
    pub variant: ButtonVariant,
    /// Size
    pub size: ButtonSize,
    /// HTML type
    pub kind: ButtonKind,
    /// Whether the button ignores input
    pub disabled: bool,
}

impl ButtonOptions {
    /// Set the variant.
    #[must_use]
    pub const fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the size.
    #[must_use]
    pub const fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    /// Set the HTML type.
    #[must_use]
    pub const fn kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    /// Disable the button.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Render a button around `label`.
#[must_use]
pub fn button(options: ButtonOptions, label: impl Into<Node>) -> Node {
    Element::new("button")
        .attr("type", options.kind.as_str())
        .attr("data-variant", options.variant.as_str())
        .attr("data-size", options.size.as_str())
        .flag("disabled", options.disabled)
        .child(label)
        .into()
}

/// HTML `type` of a text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Free text
    #[default]
    Text,
    /// Email address
    Email,
    /// Masked secret
    Password,
    /// Numeric
    Number,
    /// Search box
    Search,
}

impl InputKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Search => "search",
        }
    }
}

/// Input options.
///
/// Defaults: `Text`, no placeholder, no name, enabled, optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    /// HTML type
    pub kind: InputKind,
    /// Hint shown while empty
    pub placeholder: Option<String>,
    /// Form field name
    pub name: Option<String>,
    /// Whether the input ignores input
    pub disabled: bool,
    /// Whether the form requires a value
    pub required: bool,
}

impl InputOptions {
    /// Set the HTML type.
    #[must_use]
    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the form field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Disable the input.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark the input required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Render a text input.
#[must_use]
pub fn input(options: &InputOptions) -> Node {
    let mut element = Element::new("input").attr("type", options.kind.as_str());
    if let Some(placeholder) = &options.placeholder {
        element = element.attr("placeholder", placeholder.clone());
    }
    if let Some(name) = &options.name {
        element = element.attr("name", name.clone());
    }
    element
        .flag("disabled", options.disabled)
        .flag("required", options.required)
        .into()
}

/// Tri-state checkbox value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Not checked
    #[default]
    Unchecked,
    /// Checked
    Checked,
    /// Partially checked, e.g. a "select all" over a mixed selection
    Indeterminate,
}

/// Checkbox options.
///
/// Defaults: `Unchecked`, enabled, no name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxOptions {
    /// Current value
    pub state: CheckState,
    /// Whether the checkbox ignores input
    pub disabled: bool,
    /// Form field name
    pub name: Option<String>,
}

impl CheckboxOptions {
    /// Set the value.
    #[must_use]
    pub fn state(mut self, state: CheckState) -> Self {
        self.state = state;
        self
    }

    /// Disable the checkbox.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the form field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Render a checkbox.
///
/// Indeterminate renders as unchecked with `aria-checked="mixed"`.
#[must_use]
pub fn checkbox(options: &CheckboxOptions) -> Node {
    let aria = match options.state {
        CheckState::Unchecked => "false",
        CheckState::Checked => "true",
        CheckState::Indeterminate => "mixed",
    };
    let mut element = Element::new("input")
        .attr("type", "checkbox")
        .attr("aria-checked", aria)
        .flag("checked", options.state == CheckState::Checked)
        .flag("disabled", options.disabled);
    if let Some(name) = &options.name {
        element = element.attr("name", name.clone());
    }
    element.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_defaults() {
        let html = button(ButtonOptions::default(), "Save").to_html();
        assert_eq!(
            html,
            "<button data-size=\"md\" data-variant=\"primary\" type=\"button\">Save</button>"
        );
    }

    #[test]
    fn test_button_options() {
        let options = ButtonOptions::default()
            .variant(ButtonVariant::Destructive)
            .size(ButtonSize::Small)
            .kind(ButtonKind::Submit)
            .disabled(true);
        let node = button(options, "Delete");
        let element = node.find_by_tag("button");
        assert_eq!(element.and_then(|e| e.get("type")), Some("submit"));
        assert_eq!(element.and_then(|e| e.get("data-variant")), Some("destructive"));
        assert_eq!(element.and_then(|e| e.get("disabled")), Some(""));
    }

    #[test]
    fn test_input_renders_only_set_options() {
        let plain = input(&InputOptions::default()).to_html();
        assert_eq!(plain, "<input type=\"text\">");

        let email = input(
            &InputOptions::default()
                .kind(InputKind::Email)
                .name("email")
                .placeholder("you@example.com")
                .required(true),
        );
        assert_eq!(
            email.to_html(),
            "<input name=\"email\" placeholder=\"you@example.com\" required type=\"email\">"
        );
    }

    #[test]
    fn test_checkbox_states() {
        let checked = checkbox(&CheckboxOptions::default().state(CheckState::Checked));
        assert_eq!(checked.find_by_tag("input").and_then(|e| e.get("checked")), Some(""));

        let mixed = checkbox(&CheckboxOptions::default().state(CheckState::Indeterminate));
        let element = mixed.find_by_tag("input");
        assert_eq!(element.and_then(|e| e.get("aria-checked")), Some("mixed"));
        assert_eq!(element.and_then(|e| e.get("checked")), None);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ButtonOptions =
            serde_json::from_str(r#"{"variant":"ghost"}"#).unwrap_or_default();
        assert_eq!(options.variant, ButtonVariant::Ghost);
        assert_eq!(options.size, ButtonSize::Medium);
        assert!(!options.disabled);
    }
}
