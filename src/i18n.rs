//! Internationalization (i18n) support
//!
//! Context-menu labels come from the JSON files in `locales/`, embedded at
//! compile time by rust-i18n. Labels are looked up with an explicit locale
//! (see [`crate::commands::CommandDescriptor::label`]); the process-wide
//! locale set here is only the default for callers that don't pass one.

/// Initialize i18n from the environment.
///
/// Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in order and falls back to "en".
pub fn init() {
    let locale = detect_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(&locale);
}

/// Initialize i18n with the configured locale, or detect it when unset.
pub fn init_with_config(config_locale: Option<&str>) {
    let locale = match config_locale {
        Some(requested) => resolve_locale(requested),
        None => detect_locale().unwrap_or_else(|| "en".to_string()),
    };

    rust_i18n::set_locale(&locale);
}

/// Match a requested locale against the shipped ones, ignoring case and
/// treating `_` as `-` ("zh_cn" -> "zh-CN"). Unmatched requests are returned
/// unchanged; lookups for them fall back to English.
pub fn resolve_locale(requested: &str) -> String {
    let req_lower = requested.replace('_', "-").to_lowercase();
    available_locales()
        .into_iter()
        .find(|loc| loc.to_lowercase() == req_lower)
        .map(str::to_string)
        .unwrap_or_else(|| requested.to_string())
}

/// Detect the user's preferred locale from environment variables.
pub fn detect_locale() -> Option<String> {
    let env_locale = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_MESSAGES"))
        .or_else(|_| std::env::var("LANG"))
        .ok()?;
    parse_env_locale(&env_locale)
}

/// Parse an environment locale string such as "zh_CN.UTF-8".
///
/// Region-specific shipped locales win ("zh_CN.UTF-8" -> "zh-CN"); otherwise
/// the primary language code is returned ("en_US.UTF-8" -> "en").
fn parse_env_locale(env_locale: &str) -> Option<String> {
    if env_locale.is_empty() || env_locale == "C" || env_locale == "POSIX" {
        return None;
    }

    let normalized = env_locale.replace('_', "-").to_lowercase();
    if let Some(loc) = available_locales()
        .into_iter()
        .find(|loc| normalized.starts_with(&loc.to_lowercase()))
    {
        return Some(loc.to_string());
    }

    let lang = env_locale.split(['_', '-', '.']).next()?;
    if lang.is_empty() {
        None
    } else {
        Some(lang.to_lowercase())
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Locales that have translation files in `locales/`
pub fn available_locales() -> Vec<&'static str> {
    rust_i18n::available_locales!()
}

/// (English name, native name) of a shipped locale
pub fn locale_display_name(locale: &str) -> Option<(&'static str, &'static str)> {
    match locale {
        "en" => Some(("English", "English")),
        "zh-CN" => Some(("Chinese (Simplified)", "简体中文")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_locales() {
        let locales = available_locales();
        assert!(locales.contains(&"en"));
        assert!(locales.contains(&"zh-CN"));
    }

    #[test]
    fn test_parse_env_locale() {
        assert_eq!(parse_env_locale("zh_CN.UTF-8").as_deref(), Some("zh-CN"));
        assert_eq!(parse_env_locale("en_US.UTF-8").as_deref(), Some("en"));
        assert_eq!(parse_env_locale("de_DE.UTF-8").as_deref(), Some("de"));
        assert_eq!(parse_env_locale("C"), None);
        assert_eq!(parse_env_locale(""), None);
    }

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("ZH-cn"), "zh-CN");
        assert_eq!(resolve_locale("en"), "en");
        assert_eq!(resolve_locale("fr"), "fr");
    }

    // The only test that touches the process-wide locale
    #[test]
    fn test_global_locale_switching() {
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        init_with_config(Some("EN"));
        assert_eq!(current_locale(), "en");

        init_with_config(Some("zh_cn"));
        assert_eq!(current_locale(), "zh-CN");

        init();
        let expected = detect_locale().unwrap_or_else(|| "en".to_string());
        assert_eq!(current_locale(), expected);
    }

    #[test]
    fn test_locale_display_name() {
        assert_eq!(locale_display_name("zh-CN"), Some(("Chinese (Simplified)", "简体中文")));
        assert_eq!(locale_display_name("xx"), None);
    }
}
