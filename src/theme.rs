//! Two-valued theme resolution
//!
//! The host page passes an arbitrary theme token. Only one token is recognized
//! as dark; everything else resolves to the light theme. The resolved theme
//! drives both the option set and the custom theme definition registered with
//! the widget.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token the widget uses for its built-in dark theme
pub const DARK_THEME_TOKEN: &str = "vs-dark";

/// Id of the custom theme definition registered on mount
pub const CUSTOM_THEME_ID: &str = "overlay-localized";

/// One of exactly two resolved themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CanonicalTheme {
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "vs")]
    Light,
}

impl CanonicalTheme {
    /// Widget id of the built-in theme this resolves to
    pub fn base_id(self) -> &'static str {
        match self {
            CanonicalTheme::Dark => "vs-dark",
            CanonicalTheme::Light => "vs",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, CanonicalTheme::Dark)
    }
}

impl std::fmt::Display for CanonicalTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_id())
    }
}

/// A single token color rule of a theme definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRule {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

/// Payload for the widget's theme-definition call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThemeDefinition {
    /// Id the theme is registered under
    pub id: String,
    /// Built-in theme to derive from
    pub base: String,
    /// Inherit the base theme's rules and colors
    pub inherit: bool,
    pub rules: Vec<TokenRule>,
    /// Color overrides keyed by widget color id (e.g. "editor.background")
    pub colors: BTreeMap<String, String>,
}

/// Maps raw theme tokens onto [`CanonicalTheme`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResolver {
    dark_token: String,
    theme_id: String,
}

impl Default for ThemeResolver {
    fn default() -> Self {
        Self::new(DARK_THEME_TOKEN, CUSTOM_THEME_ID)
    }
}

impl ThemeResolver {
    pub fn new(dark_token: impl Into<String>, theme_id: impl Into<String>) -> Self {
        Self {
            dark_token: dark_token.into(),
            theme_id: theme_id.into(),
        }
    }

    /// Resolve a raw token. Exact match only: anything else is light.
    pub fn resolve(&self, token: &str) -> CanonicalTheme {
        if token == self.dark_token {
            CanonicalTheme::Dark
        } else {
            CanonicalTheme::Light
        }
    }

    /// Theme definition to register with the widget for `theme`
    pub fn palette_for(&self, theme: CanonicalTheme) -> ThemeDefinition {
        ThemeDefinition {
            id: self.theme_id.clone(),
            base: theme.base_id().to_string(),
            inherit: true,
            rules: Vec::new(),
            colors: BTreeMap::new(),
        }
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }
}
