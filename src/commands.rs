//! Localized context-menu commands
//!
//! The catalog is a fixed table of [`CommandDescriptor`]s. Each descriptor
//! mirrors one of the widget's native actions under a localized label, and
//! [`CommandRegistry::register_all`] attaches the whole table to a session.
//! Registration skips ids the session already knows, so running it twice on
//! the same session leaves exactly one entry per descriptor.

use crate::widget::{ActionBinding, EditorSession, WidgetError};
use rust_i18n::t;
use serde::Serialize;

/// Native widget action a localized command forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionRef {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Find,
    Replace,
    FindNext,
    FindPrevious,
    FormatDocument,
    FormatSelection,
    IndentLines,
    OutdentLines,
    MoveLinesUp,
    MoveLinesDown,
    CopyLinesUp,
    CopyLinesDown,
    DeleteLines,
    InsertLineAbove,
    InsertLineBelow,
}

impl ActionRef {
    /// Id of the native action inside the widget
    pub fn native_id(self) -> &'static str {
        match self {
            ActionRef::Undo => "undo",
            ActionRef::Redo => "redo",
            ActionRef::Cut => "editor.action.clipboardCutAction",
            ActionRef::Copy => "editor.action.clipboardCopyAction",
            ActionRef::Paste => "editor.action.clipboardPasteAction",
            ActionRef::SelectAll => "editor.action.selectAll",
            ActionRef::Find => "actions.find",
            ActionRef::Replace => "editor.action.startFindReplaceAction",
            ActionRef::FindNext => "editor.action.nextMatchFindAction",
            ActionRef::FindPrevious => "editor.action.previousMatchFindAction",
            ActionRef::FormatDocument => "editor.action.formatDocument",
            ActionRef::FormatSelection => "editor.action.formatSelection",
            ActionRef::IndentLines => "editor.action.indentLines",
            ActionRef::OutdentLines => "editor.action.outdentLines",
            ActionRef::MoveLinesUp => "editor.action.moveLinesUpAction",
            ActionRef::MoveLinesDown => "editor.action.moveLinesDownAction",
            ActionRef::CopyLinesUp => "editor.action.copyLinesUpAction",
            ActionRef::CopyLinesDown => "editor.action.copyLinesDownAction",
            ActionRef::DeleteLines => "editor.action.deleteLines",
            ActionRef::InsertLineAbove => "editor.action.insertLineBefore",
            ActionRef::InsertLineBelow => "editor.action.insertLineAfter",
        }
    }
}

/// Context-menu section a command is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MenuGroup {
    Modification,
    Selection,
    Find,
    Formatting,
    LineEditing,
}

impl MenuGroup {
    /// Widget context-menu group id. Sections sort by their numeric prefix.
    pub fn group_id(self) -> &'static str {
        match self {
            MenuGroup::Modification => "1_modification",
            MenuGroup::LineEditing => "2_cc",
            MenuGroup::Find => "4_find",
            MenuGroup::Formatting => "6_cc",
            MenuGroup::Selection => "9_cutcopypaste",
        }
    }
}

/// A localized menu entry bound to a native action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub id: &'static str,
    /// Translation key of the label (see `locales/`)
    pub label_key: &'static str,
    pub action: ActionRef,
    pub group: MenuGroup,
}

impl CommandDescriptor {
    const fn new(
        id: &'static str,
        label_key: &'static str,
        action: ActionRef,
        group: MenuGroup,
    ) -> Self {
        Self {
            id,
            label_key,
            action,
            group,
        }
    }

    /// Label in the given locale, falling back to English
    pub fn label(&self, locale: &str) -> String {
        let key = self.label_key;
        t!(key, locale = locale).to_string()
    }

    /// Binding handed to the widget's registration call
    pub fn binding(&self, locale: &str) -> ActionBinding {
        ActionBinding {
            id: self.id.to_string(),
            label: self.label(locale),
            context_menu_group_id: self.group.group_id().to_string(),
            run: self.action,
        }
    }
}

use ActionRef as A;
use MenuGroup as G;

/// The built-in catalog, in registration order
pub static CATALOG: [CommandDescriptor; 21] = [
    CommandDescriptor::new("localized-undo", "command.undo", A::Undo, G::Modification),
    CommandDescriptor::new("localized-cut", "command.cut", A::Cut, G::Modification),
    CommandDescriptor::new("localized-copy", "command.copy", A::Copy, G::Modification),
    CommandDescriptor::new("localized-paste", "command.paste", A::Paste, G::Modification),
    CommandDescriptor::new("localized-select-all", "command.select_all", A::SelectAll, G::Selection),
    CommandDescriptor::new("localized-redo", "command.redo", A::Redo, G::Modification),
    // Find / replace
    CommandDescriptor::new("localized-find", "command.find", A::Find, G::Find),
    CommandDescriptor::new("localized-replace", "command.replace", A::Replace, G::Find),
    CommandDescriptor::new("localized-find-next", "command.find_next", A::FindNext, G::Find),
    CommandDescriptor::new("localized-find-prev", "command.find_prev", A::FindPrevious, G::Find),
    // Formatting
    CommandDescriptor::new("localized-format", "command.format", A::FormatDocument, G::Formatting),
    CommandDescriptor::new(
        "localized-format-selection",
        "command.format_selection",
        A::FormatSelection,
        G::Formatting,
    ),
    // Line and code manipulation
    CommandDescriptor::new("localized-indent", "command.indent", A::IndentLines, G::LineEditing),
    CommandDescriptor::new("localized-outdent", "command.outdent", A::OutdentLines, G::LineEditing),
    CommandDescriptor::new(
        "localized-move-line-up",
        "command.move_line_up",
        A::MoveLinesUp,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-move-line-down",
        "command.move_line_down",
        A::MoveLinesDown,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-copy-line-up",
        "command.copy_line_up",
        A::CopyLinesUp,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-copy-line-down",
        "command.copy_line_down",
        A::CopyLinesDown,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-delete-line",
        "command.delete_line",
        A::DeleteLines,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-insert-line-below",
        "command.insert_line_below",
        A::InsertLineBelow,
        G::LineEditing,
    ),
    CommandDescriptor::new(
        "localized-insert-line-above",
        "command.insert_line_above",
        A::InsertLineAbove,
        G::LineEditing,
    ),
];

/// Outcome of a [`CommandRegistry::register_all`] pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Ids newly attached to the session
    pub registered: Vec<&'static str>,
    /// Ids the session already had
    pub skipped: Vec<&'static str>,
    /// Ids the widget refused, with its error
    pub failed: Vec<(&'static str, WidgetError)>,
}

impl RegistrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Attaches a command catalog to editor sessions
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    catalog: &'static [CommandDescriptor],
    locale: String,
}

impl CommandRegistry {
    /// Registry over the built-in catalog with labels in `locale`
    pub fn new(locale: impl Into<String>) -> Self {
        Self::with_catalog(&CATALOG, locale)
    }

    pub fn with_catalog(catalog: &'static [CommandDescriptor], locale: impl Into<String>) -> Self {
        Self {
            catalog,
            locale: locale.into(),
        }
    }

    pub fn catalog(&self) -> &'static [CommandDescriptor] {
        self.catalog
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Localized bindings for the whole catalog
    pub fn bindings(&self) -> Vec<ActionBinding> {
        self.catalog
            .iter()
            .map(|descriptor| descriptor.binding(&self.locale))
            .collect()
    }

    /// Attach every catalog entry to `session`.
    ///
    /// Ids already present on the session are skipped. A descriptor the
    /// widget refuses is logged and skipped; the rest are still attempted.
    pub fn register_all(&self, session: &mut dyn EditorSession) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for descriptor in self.catalog {
            if session.has_action(descriptor.id) {
                report.skipped.push(descriptor.id);
                continue;
            }

            match session.add_action(descriptor.binding(&self.locale)) {
                Ok(()) => report.registered.push(descriptor.id),
                Err(e) => {
                    tracing::warn!(
                        "EditorHostAdapter: failed to register command '{}': {}",
                        descriptor.id,
                        e
                    );
                    report.failed.push((descriptor.id, e));
                }
            }
        }

        tracing::debug!(
            "Registered {} commands ({} already present, {} failed) for locale {}",
            report.registered.len(),
            report.skipped.len(),
            report.failed.len(),
            self.locale
        );
        report
    }
}
