// Embed locales/*.json for context-menu labels
rust_i18n::i18n!("locales", fallback = "en");

pub mod commands;
pub mod config;
pub mod host;
pub mod i18n;
pub mod keys;
#[cfg(feature = "runtime")]
pub mod logging;
pub mod profile;
pub mod theme;
pub mod widget;

pub use commands::{CommandDescriptor, CommandRegistry, CATALOG};
pub use config::OverlayConfig;
pub use host::{EditorHostAdapter, EditorProps, Phase};
pub use keys::{Document, KeyInterceptor, KeyListenerScope};
pub use profile::ConfigurationProfile;
pub use theme::{CanonicalTheme, ThemeResolver};
