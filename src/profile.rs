//! Baseline editor options merged with the language and resolved theme
//!
//! A [`ConfigurationProfile`] is pure data. It is rebuilt from `(language, theme)`
//! on every render and never edited in place; the widget receives it through
//! [`ConfigurationProfile::to_update`].

use crate::theme::CanonicalTheme;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options block with a single `enabled` flag (minimap, hover, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    pub const ON: Toggle = Toggle { enabled: true };
    pub const OFF: Toggle = Toggle { enabled: false };
}

/// Find widget behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindOptions {
    pub add_extra_space_on_top: bool,
    /// "never" | "always" | "multiline"
    pub auto_find_in_selection: String,
    /// "never" | "always" | "selection"
    pub seed_search_string_from_selection: String,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            add_extra_space_on_top: false,
            auto_find_in_selection: "never".to_string(),
            seed_search_string_from_selection: "never".to_string(),
        }
    }
}

/// Option set understood by the widget's options-update call.
///
/// Field names serialize to the widget's camelCase option names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    // Appearance
    pub minimap: Toggle,
    pub scroll_beyond_last_line: bool,
    pub font_size: u32,
    pub line_height: u32,
    pub word_wrap: String,
    pub automatic_layout: bool,

    // Suggestions
    pub suggest_on_trigger_characters: bool,
    pub quick_suggestions: bool,
    pub parameter_hints: Toggle,
    pub hover: Toggle,

    // Folding
    pub folding: bool,
    pub folding_strategy: String,

    pub line_numbers: String,
    pub select_on_line_numbers: bool,

    // Cursor
    pub cursor_blinking: String,
    pub cursor_smooth_caret_animation: String,

    // Indentation
    pub tab_size: u32,
    pub insert_spaces: bool,
    pub detect_indentation: bool,

    pub bracket_pair_colorization: Toggle,
    pub read_only: bool,
    pub contextmenu: bool,
    pub render_line_highlight: String,
    pub multi_cursor_modifier: String,
    pub find: FindOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            minimap: Toggle::OFF,
            scroll_beyond_last_line: false,
            font_size: 14,
            line_height: 20,
            word_wrap: "on".to_string(),
            automatic_layout: true,
            suggest_on_trigger_characters: true,
            quick_suggestions: true,
            parameter_hints: Toggle::ON,
            hover: Toggle::ON,
            folding: true,
            folding_strategy: "indentation".to_string(),
            line_numbers: "on".to_string(),
            select_on_line_numbers: true,
            cursor_blinking: "blink".to_string(),
            cursor_smooth_caret_animation: "on".to_string(),
            tab_size: 2,
            insert_spaces: true,
            detect_indentation: true,
            bracket_pair_colorization: Toggle::ON,
            read_only: false,
            contextmenu: true,
            render_line_highlight: "all".to_string(),
            multi_cursor_modifier: "alt".to_string(),
            find: FindOptions::default(),
        }
    }
}

/// Fully merged option set ready to hand to a session
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationProfile {
    options: EditorOptions,
    language: String,
    theme: CanonicalTheme,
}

/// Flattened payload for the options-update call: the baseline plus the
/// `language` and `theme` overlay.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProfileUpdate {
    #[serde(flatten)]
    pub options: EditorOptions,
    pub language: String,
    pub theme: CanonicalTheme,
}

impl ConfigurationProfile {
    pub fn build(language: &str, theme: CanonicalTheme) -> Self {
        Self {
            options: EditorOptions::default(),
            language: language.to_string(),
            theme,
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn theme(&self) -> CanonicalTheme {
        self.theme
    }

    /// Payload for the session's options-update call
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            options: self.options.clone(),
            language: self.language.clone(),
            theme: self.theme,
        }
    }

    /// The update payload as widget JSON
    pub fn to_json(&self) -> serde_json::Value {
        // Every field is a plain string, number or bool
        serde_json::to_value(self.to_update()).unwrap_or(serde_json::Value::Null)
    }
}
