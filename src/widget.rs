//! Capability surface consumed from the embedded editor widget
//!
//! The widget owns its editor instances and text models. The overlay only
//! talks to it through these two traits: [`EditorWidget`] for namespace-level
//! calls (themes, model language) and [`EditorSession`] for a single live
//! editor instance.

use crate::commands::ActionRef;
use crate::profile::ProfileUpdate;
use crate::theme::ThemeDefinition;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Source reported to the widget when a localized entry triggers a native action
pub const TRIGGER_SOURCE: &str = "keyboard";

/// Errors reported by the widget
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("widget API unavailable: {0}")]
    Unavailable(String),
    #[error("widget rejected {call}: {reason}")]
    Rejected { call: String, reason: String },
}

/// Reference to the text model attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    pub uri: String,
}

impl ModelHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// A context-menu action as handed to the widget's registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub id: String,
    pub label: String,
    pub context_menu_group_id: String,
    /// Native action run when the entry is invoked
    pub run: ActionRef,
}

impl ActionBinding {
    /// Run the bound native action on `session`
    pub fn run(&self, session: &mut dyn EditorSession) -> Result<(), WidgetError> {
        session.trigger(TRIGGER_SOURCE, self.run.native_id())
    }
}

/// Namespace-level widget calls
pub trait EditorWidget {
    /// Register (or replace) a custom theme definition
    fn define_theme(&mut self, definition: &ThemeDefinition) -> Result<(), WidgetError>;

    /// Assign a language to a text model
    fn set_model_language(&mut self, model: &ModelHandle, language: &str)
        -> Result<(), WidgetError>;
}

/// A live editor instance
pub trait EditorSession {
    /// Text model currently attached, if any
    fn model(&self) -> Option<ModelHandle>;

    /// Apply an option set. Applying the same set twice is a no-op.
    fn update_options(&mut self, update: &ProfileUpdate) -> Result<(), WidgetError>;

    /// Whether an action with this id is already registered
    fn has_action(&self, id: &str) -> bool;

    /// Register a context-menu action
    fn add_action(&mut self, binding: ActionBinding) -> Result<(), WidgetError>;

    /// Trigger a native widget action by id
    fn trigger(&mut self, source: &str, action_id: &str) -> Result<(), WidgetError>;
}

/// Session handle as produced by the widget on mount
pub type SessionHandle = Rc<RefCell<dyn EditorSession>>;

/// Non-owning reference kept by the host adapter
pub type SessionRef = Weak<RefCell<dyn EditorSession>>;
