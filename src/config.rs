use crate::theme::{ThemeResolver, CUSTOM_THEME_ID, DARK_THEME_TOKEN};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Overlay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayConfig {
    /// Locale for context-menu labels (e.g. "en", "zh-CN").
    /// Detected from the environment when unset.
    #[serde(default)]
    pub locale: Option<String>,

    /// Language used when the host page passes none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Theme token recognized as dark; every other token is light
    #[serde(default = "default_dark_theme_token")]
    pub dark_theme_token: String,

    /// Id the custom theme definition is registered under
    #[serde(default = "default_custom_theme_id")]
    pub custom_theme_id: String,

    /// Log filter directive (e.g. "info", "editor_overlay=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_language() -> String {
    "text".to_string()
}

fn default_dark_theme_token() -> String {
    DARK_THEME_TOKEN.to_string()
}

fn default_custom_theme_id() -> String {
    CUSTOM_THEME_ID.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            locale: None,
            default_language: default_language(),
            dark_theme_token: default_dark_theme_token(),
            custom_theme_id: default_custom_theme_id(),
            log_filter: default_log_filter(),
        }
    }
}

impl OverlayConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: OverlayConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_language cannot be empty".to_string(),
            ));
        }
        if self.dark_theme_token.is_empty() {
            return Err(ConfigError::ValidationError(
                "dark_theme_token cannot be empty".to_string(),
            ));
        }
        if self.custom_theme_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "custom_theme_id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Theme resolver honoring the configured dark token and theme id
    pub fn theme_resolver(&self) -> ThemeResolver {
        ThemeResolver::new(&self.dark_theme_token, &self.custom_theme_id)
    }

    /// Configured locale matched against the shipped ones, or the detected one
    pub fn effective_locale(&self) -> String {
        match &self.locale {
            Some(locale) => crate::i18n::resolve_locale(locale),
            None => crate::i18n::detect_locale().unwrap_or_else(|| "en".to_string()),
        }
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
