//! Host adapter: drives the overlay through the widget's lifecycle
//!
//! ```text
//!   Unmounted --render--> Mounting --on_widget_ready--> Ready --unmount--> Unmounted
//!                                                        |  ^
//!                                                        +--+ render (prop update)
//! ```
//!
//! Entering `Ready` runs, in order: theme resolution, theme definition, model
//! language assignment, option update, command registration, and finally the
//! save listener. Commands and options are therefore always in place before a
//! save chord can arrive.

use crate::commands::{CommandRegistry, RegistrationReport};
use crate::config::OverlayConfig;
use crate::keys::{KeyEventTarget, KeyInterceptor, KeyListenerScope, ListenerError, SaveCallback};
use crate::profile::{ConfigurationProfile, ProfileUpdate};
use crate::theme::{CanonicalTheme, ThemeResolver};
use crate::widget::{EditorWidget, SessionHandle, SessionRef, WidgetError};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

/// Edit callback forwarded to the widget
pub type ChangeCallback = Rc<dyn Fn(&str)>;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("editor widget failed: {0}")]
    Widget(#[from] WidgetError),
    #[error("save shortcut unavailable: {0}")]
    Listener(#[from] ListenerError),
    #[error("{operation} is not valid while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

/// Width or height forwarded to the widget
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Pixels(u32),
    /// Any CSS length, e.g. "100%"
    Css(String),
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Css("100%".to_string())
    }
}

/// Props accepted from the host page
#[derive(Clone)]
pub struct EditorProps {
    pub value: String,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub width: Dimension,
    pub height: Dimension,
    pub on_change: Option<ChangeCallback>,
    pub on_save: SaveCallback,
    pub disabled: bool,
}

impl EditorProps {
    pub fn new(on_save: SaveCallback) -> Self {
        Self {
            value: String::new(),
            language: None,
            theme: None,
            width: Dimension::default(),
            height: Dimension::default(),
            on_change: None,
            on_save,
            disabled: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_size(mut self, width: Dimension, height: Dimension) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_on_change(mut self, on_change: ChangeCallback) -> Self {
        self.on_change = Some(on_change);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl std::fmt::Debug for EditorProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorProps")
            .field("value_len", &self.value.len())
            .field("language", &self.language)
            .field("theme", &self.theme)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// What the adapter forwards to the widget on each render
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetProps {
    pub value: String,
    pub language: String,
    pub width: Dimension,
    pub height: Dimension,
    pub theme: CanonicalTheme,
    pub options: ProfileUpdate,
}

/// Which prop facets differ between two renders
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PropChanges {
    value: bool,
    language: bool,
    theme: bool,
    dimensions: bool,
    on_save: bool,
    disabled: bool,
}

impl PropChanges {
    fn between(old: &EditorProps, new: &EditorProps) -> Self {
        Self {
            value: old.value != new.value,
            language: old.language != new.language,
            theme: old.theme != new.theme,
            dimensions: old.width != new.width || old.height != new.height,
            on_save: !Rc::ptr_eq(&old.on_save, &new.on_save),
            disabled: old.disabled != new.disabled,
        }
    }

    fn any(&self) -> bool {
        self.value
            || self.language
            || self.theme
            || self.dimensions
            || self.on_save
            || self.disabled
    }

    fn needs_listener_restart(&self) -> bool {
        self.on_save || self.disabled
    }
}

/// Live state held while `Ready`
struct ReadyState {
    session: SessionRef,
    scope: KeyListenerScope,
    registration: RegistrationReport,
}

enum AdapterState {
    Unmounted,
    Mounting,
    Ready(ReadyState),
}

impl AdapterState {
    fn name(&self) -> &'static str {
        match self {
            AdapterState::Unmounted => "unmounted",
            AdapterState::Mounting => "mounting",
            AdapterState::Ready(_) => "ready",
        }
    }
}

/// Coarse lifecycle phase, for callers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    Mounting,
    Ready,
}

/// Owns the overlay for one editor widget instance
pub struct EditorHostAdapter {
    resolver: ThemeResolver,
    registry: CommandRegistry,
    default_language: String,
    document: Rc<dyn KeyEventTarget>,
    props: Option<EditorProps>,
    disabled: Rc<Cell<bool>>,
    profile: Option<ConfigurationProfile>,
    state: AdapterState,
}

impl EditorHostAdapter {
    pub fn new(config: &OverlayConfig, document: Rc<dyn KeyEventTarget>) -> Self {
        Self {
            resolver: config.theme_resolver(),
            registry: CommandRegistry::new(config.effective_locale()),
            default_language: config.default_language.clone(),
            document,
            props: None,
            disabled: Rc::new(Cell::new(false)),
            profile: None,
            state: AdapterState::Unmounted,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            AdapterState::Unmounted => Phase::Unmounted,
            AdapterState::Mounting => Phase::Mounting,
            AdapterState::Ready(_) => Phase::Ready,
        }
    }

    /// Profile most recently applied or rendered
    pub fn profile(&self) -> Option<&ConfigurationProfile> {
        self.profile.as_ref()
    }

    /// Result of the last command registration pass
    pub fn registration(&self) -> Option<&RegistrationReport> {
        match &self.state {
            AdapterState::Ready(ready) => Some(&ready.registration),
            _ => None,
        }
    }

    /// Id of the installed save listener, if any
    pub fn listener(&self) -> Option<crate::keys::ListenerId> {
        match &self.state {
            AdapterState::Ready(ready) => ready.scope.id(),
            _ => None,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Render with new props.
    ///
    /// First render moves `Unmounted -> Mounting`. While `Ready`, changed
    /// props re-apply the option set and, when `on_save` or `disabled`
    /// changed, restart the save listener.
    pub fn render(&mut self, props: EditorProps) -> Result<WidgetProps, AdapterError> {
        let changes = self
            .props
            .as_ref()
            .map(|old| PropChanges::between(old, &props));
        self.disabled.set(props.disabled);

        let language = self.language_of(&props);
        let theme = self.resolver.resolve(props.theme.as_deref().unwrap_or(""));
        let profile = ConfigurationProfile::build(&language, theme);
        let widget_props = WidgetProps {
            value: props.value.clone(),
            language: language.clone(),
            width: props.width.clone(),
            height: props.height.clone(),
            theme,
            options: profile.to_update(),
        };

        let state = std::mem::replace(&mut self.state, AdapterState::Unmounted);
        let result = match state {
            AdapterState::Unmounted => {
                tracing::debug!("EditorHostAdapter: first render, waiting for widget");
                self.state = AdapterState::Mounting;
                Ok(())
            }
            AdapterState::Mounting => {
                self.state = AdapterState::Mounting;
                Ok(())
            }
            AdapterState::Ready(ready) => {
                let changes = changes.unwrap_or_default();
                self.update_ready(ready, changes, &profile, &props)
            }
        };

        self.profile = Some(profile);
        self.props = Some(props);
        result.map(|()| widget_props)
    }

    /// The widget reports a live session.
    ///
    /// Valid while `Mounting`, or while `Ready` when the widget remounted and
    /// produced a new session.
    pub fn on_widget_ready(
        &mut self,
        widget: &mut dyn EditorWidget,
        session: &SessionHandle,
    ) -> Result<(), AdapterError> {
        let props = match (&self.state, &self.props) {
            (AdapterState::Mounting | AdapterState::Ready(_), Some(props)) => props.clone(),
            _ => {
                return Err(AdapterError::InvalidState {
                    operation: "on_widget_ready",
                    state: self.state.name(),
                })
            }
        };

        // Remount: release the previous listener before anything else
        if let AdapterState::Ready(previous) =
            std::mem::replace(&mut self.state, AdapterState::Mounting)
        {
            tracing::debug!("EditorHostAdapter: widget remounted, releasing previous session");
            previous.scope.stop()?;
        }

        let language = self.language_of(&props);
        let theme = self.resolver.resolve(props.theme.as_deref().unwrap_or(""));

        widget.define_theme(&self.resolver.palette_for(theme))?;

        // Assigned explicitly even though the widget also receives `language`
        let model = session.borrow().model();
        match model {
            Some(model) => widget.set_model_language(&model, &language)?,
            None => tracing::debug!("EditorHostAdapter: session has no model yet"),
        }

        let profile = ConfigurationProfile::build(&language, theme);
        session.borrow_mut().update_options(&profile.to_update())?;

        let registration = self.registry.register_all(&mut *session.borrow_mut());

        let scope = KeyInterceptor::start(
            Rc::clone(&self.document),
            Rc::clone(&props.on_save),
            Rc::clone(&self.disabled),
        )?;

        tracing::info!(
            "EditorHostAdapter ready: language={}, theme={}, {} commands",
            language,
            theme,
            registration.registered.len() + registration.skipped.len()
        );

        self.profile = Some(profile);
        self.state = AdapterState::Ready(ReadyState {
            session: Rc::downgrade(session),
            scope,
            registration,
        });
        Ok(())
    }

    /// Forward an edit from the widget to the host page
    pub fn handle_change(&self, new_value: &str) {
        if let Some(on_change) = self.props.as_ref().and_then(|p| p.on_change.as_ref()) {
            on_change(new_value);
        }
    }

    /// Tear down: stop the save listener and drop the session reference.
    ///
    /// The adapter ends `Unmounted` even when removing the listener fails;
    /// the failure is returned afterwards.
    pub fn unmount(&mut self) -> Result<(), AdapterError> {
        let state = std::mem::replace(&mut self.state, AdapterState::Unmounted);
        self.props = None;
        self.profile = None;

        match state {
            AdapterState::Ready(ready) => {
                let ReadyState { session, scope, .. } = ready;
                drop(session);
                tracing::info!("EditorHostAdapter unmounted");
                scope.stop()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn update_ready(
        &mut self,
        ready: ReadyState,
        changes: PropChanges,
        profile: &ConfigurationProfile,
        props: &EditorProps,
    ) -> Result<(), AdapterError> {
        let ReadyState {
            session: session_ref,
            mut scope,
            registration,
        } = ready;

        let Some(session) = session_ref.upgrade() else {
            tracing::debug!("EditorHostAdapter: session dropped by widget, waiting for remount");
            self.state = AdapterState::Mounting;
            scope.stop()?;
            return Ok(());
        };

        if !changes.any() {
            self.state = AdapterState::Ready(ReadyState {
                session: session_ref,
                scope,
                registration,
            });
            return Ok(());
        }

        tracing::debug!("EditorHostAdapter: props changed {:?}", changes);
        let applied = session
            .borrow_mut()
            .update_options(&profile.to_update())
            .map_err(AdapterError::from);

        let restarted = if changes.needs_listener_restart() {
            KeyInterceptor::restart(
                &mut scope,
                Rc::clone(&props.on_save),
                Rc::clone(&self.disabled),
            )
            .map_err(AdapterError::from)
        } else {
            Ok(())
        };

        self.state = AdapterState::Ready(ReadyState {
            session: session_ref,
            scope,
            registration,
        });
        applied.and(restarted)
    }

    fn language_of(&self, props: &EditorProps) -> String {
        props
            .language
            .clone()
            .unwrap_or_else(|| self.default_language.clone())
    }
}

impl Drop for EditorHostAdapter {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            tracing::warn!("EditorHostAdapter: teardown on drop failed: {}", e);
        }
    }
}
