//! Fake editor widget for integration tests
//!
//! Records every call the overlay makes so tests can assert on ordering and
//! on what reached the widget. Individual calls can be made to fail.

use editor_overlay::keys::{Document, KeyEventTarget, KeyListener, ListenerError, ListenerId};
use editor_overlay::profile::ProfileUpdate;
use editor_overlay::theme::ThemeDefinition;
use editor_overlay::widget::{
    ActionBinding, EditorSession, EditorWidget, ModelHandle, SessionHandle, WidgetError,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Namespace-level fake
#[derive(Default)]
pub struct FakeWidget {
    pub themes: Vec<ThemeDefinition>,
    pub model_languages: Vec<(ModelHandle, String)>,
    pub fail_define_theme: bool,
    pub fail_set_language: bool,
}

impl FakeWidget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorWidget for FakeWidget {
    fn define_theme(&mut self, definition: &ThemeDefinition) -> Result<(), WidgetError> {
        if self.fail_define_theme {
            return Err(WidgetError::Unavailable("defineTheme".to_string()));
        }
        self.themes.push(definition.clone());
        Ok(())
    }

    fn set_model_language(
        &mut self,
        model: &ModelHandle,
        language: &str,
    ) -> Result<(), WidgetError> {
        if self.fail_set_language {
            return Err(WidgetError::Unavailable("setModelLanguage".to_string()));
        }
        self.model_languages
            .push((model.clone(), language.to_string()));
        Ok(())
    }
}

/// Instance-level fake
pub struct FakeSession {
    pub model: Option<ModelHandle>,
    pub option_updates: Vec<ProfileUpdate>,
    pub actions: Vec<ActionBinding>,
    pub add_action_calls: usize,
    pub triggered: Vec<(String, String)>,
    /// Native action ids the widget does not know
    pub unknown_actions: HashSet<&'static str>,
    /// Native ids the widget implements, for counting invocations
    pub native_runs: Rc<Cell<usize>>,
    /// Reason given when option updates are refused
    pub reject_options: Option<String>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            model: Some(ModelHandle::new("inmemory://model/1")),
            option_updates: Vec::new(),
            actions: Vec::new(),
            add_action_calls: 0,
            triggered: Vec::new(),
            unknown_actions: HashSet::new(),
            native_runs: Rc::new(Cell::new(0)),
            reject_options: None,
        }
    }

    pub fn without_model() -> Self {
        Self {
            model: None,
            ..Self::new()
        }
    }

    pub fn rejecting(native_ids: &[&'static str]) -> Self {
        Self {
            unknown_actions: native_ids.iter().copied().collect(),
            ..Self::new()
        }
    }

    /// Invoke a context-menu entry the way the widget does when clicked
    pub fn invoke(&mut self, id: &str) -> Result<(), WidgetError> {
        let binding = self
            .actions
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| WidgetError::UnknownAction(id.to_string()))?;
        binding.run(self)
    }

    pub fn action_ids(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.id.clone()).collect()
    }

    pub fn last_options(&self) -> Option<&ProfileUpdate> {
        self.option_updates.last()
    }
}

impl EditorSession for FakeSession {
    fn model(&self) -> Option<ModelHandle> {
        self.model.clone()
    }

    fn update_options(&mut self, update: &ProfileUpdate) -> Result<(), WidgetError> {
        if let Some(reason) = &self.reject_options {
            return Err(WidgetError::Rejected {
                call: "updateOptions".to_string(),
                reason: reason.clone(),
            });
        }
        self.option_updates.push(update.clone());
        Ok(())
    }

    fn has_action(&self, id: &str) -> bool {
        self.actions.iter().any(|a| a.id == id)
    }

    fn add_action(&mut self, binding: ActionBinding) -> Result<(), WidgetError> {
        self.add_action_calls += 1;
        let native = binding.run.native_id();
        if self.unknown_actions.contains(native) {
            return Err(WidgetError::UnknownAction(native.to_string()));
        }
        self.actions.push(binding);
        Ok(())
    }

    fn trigger(&mut self, source: &str, action_id: &str) -> Result<(), WidgetError> {
        self.triggered
            .push((source.to_string(), action_id.to_string()));
        self.native_runs.set(self.native_runs.get() + 1);
        Ok(())
    }
}

/// Document whose listener install or removal can be made to fail
#[derive(Default)]
pub struct FlakyDocument {
    pub inner: Document,
    pub fail_add: Cell<bool>,
    pub fail_remove: Cell<bool>,
}

impl FlakyDocument {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl KeyEventTarget for FlakyDocument {
    fn add_keydown_listener(&self, listener: KeyListener) -> Result<ListenerId, ListenerError> {
        if self.fail_add.get() {
            return Err(ListenerError::Install("document detached".to_string()));
        }
        self.inner.add_keydown_listener(listener)
    }

    fn remove_keydown_listener(&self, id: ListenerId) -> Result<(), ListenerError> {
        if self.fail_remove.get() {
            return Err(ListenerError::NotInstalled(id));
        }
        self.inner.remove_keydown_listener(id)
    }
}

/// A session wrapped the way the widget hands it over
pub fn session_handle(session: FakeSession) -> (Rc<RefCell<FakeSession>>, SessionHandle) {
    let concrete = Rc::new(RefCell::new(session));
    let handle: SessionHandle = concrete.clone();
    (concrete, handle)
}

/// Save callback that counts invocations
pub fn save_counter() -> (Rc<Cell<usize>>, Rc<dyn Fn()>) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, Rc::new(move || c.set(c.get() + 1)))
}

/// Route test logs through the test writer
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}
