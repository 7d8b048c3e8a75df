//! Page-level save shortcut
//!
//! [`KeyInterceptor::start`] installs one keydown listener on a
//! [`KeyEventTarget`] and hands back a [`KeyListenerScope`] that owns it.
//! The listener swallows the browser's native save for Ctrl+S / Cmd+S and
//! forwards the chord to the caller unless the disabled flag is set at the
//! time the key arrives.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

/// Save callback supplied by the host page
pub type SaveCallback = Rc<dyn Fn()>;

/// Listener callback installed on a [`KeyEventTarget`]
pub type KeyListener = Rc<dyn Fn(&mut KeyDown)>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    #[error("failed to install keydown listener: {0}")]
    Install(String),
    #[error("keydown listener {0:?} is not installed")]
    NotInstalled(ListenerId),
}

/// A keydown event as dispatched at document level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDown {
    pub event: KeyEvent,
    default_prevented: bool,
}

impl KeyDown {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            event: KeyEvent::new(code, modifiers),
            default_prevented: false,
        }
    }

    /// Suppress the host's default handling of this key
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl From<KeyEvent> for KeyDown {
    fn from(event: KeyEvent) -> Self {
        Self {
            event,
            default_prevented: false,
        }
    }
}

/// Whether `event` is the save chord: Ctrl or Cmd held with a lowercase "s"
pub fn is_save_chord(event: &KeyEvent) -> bool {
    let primary = event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META);
    primary && event.code == KeyCode::Char('s')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Something that dispatches document-level keydown events
pub trait KeyEventTarget {
    fn add_keydown_listener(&self, listener: KeyListener) -> Result<ListenerId, ListenerError>;

    fn remove_keydown_listener(&self, id: ListenerId) -> Result<(), ListenerError>;
}

/// In-process document: holds keydown listeners and dispatches to them in
/// installation order.
#[derive(Default)]
pub struct Document {
    listeners: RefCell<Vec<(ListenerId, KeyListener)>>,
    next_id: Cell<u64>,
}

impl Document {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Deliver `key` to every installed listener
    pub fn dispatch(&self, key: &mut KeyDown) {
        // Listeners may add or remove listeners while running
        let snapshot: Vec<KeyListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(key);
        }
    }

    /// Build and deliver a keydown, returning it for inspection
    pub fn key_down(&self, code: KeyCode, modifiers: KeyModifiers) -> KeyDown {
        let mut key = KeyDown::new(code, modifiers);
        self.dispatch(&mut key);
        key
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl KeyEventTarget for Document {
    fn add_keydown_listener(&self, listener: KeyListener) -> Result<ListenerId, ListenerError> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_keydown_listener(&self, id: ListenerId) -> Result<(), ListenerError> {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        if listeners.len() == before {
            return Err(ListenerError::NotInstalled(id));
        }
        Ok(())
    }
}

/// Installs the save-chord listener
pub struct KeyInterceptor;

impl KeyInterceptor {
    /// Install a listener on `target`.
    ///
    /// `disabled` is read each time the chord arrives, so flipping it takes
    /// effect on the next keystroke without a restart.
    pub fn start(
        target: Rc<dyn KeyEventTarget>,
        on_save: SaveCallback,
        disabled: Rc<Cell<bool>>,
    ) -> Result<KeyListenerScope, ListenerError> {
        let id = target.add_keydown_listener(Self::listener(on_save, disabled))?;
        tracing::debug!("Installed save listener {:?}", id);
        Ok(KeyListenerScope {
            target,
            id: Some(id),
        })
    }

    /// Rebind `scope` to a new callback: the old listener is removed before
    /// the new one is installed.
    pub fn restart(
        scope: &mut KeyListenerScope,
        on_save: SaveCallback,
        disabled: Rc<Cell<bool>>,
    ) -> Result<(), ListenerError> {
        scope.release()?;
        let id = scope
            .target
            .add_keydown_listener(Self::listener(on_save, disabled))?;
        tracing::debug!("Reinstalled save listener {:?}", id);
        scope.id = Some(id);
        Ok(())
    }

    fn listener(on_save: SaveCallback, disabled: Rc<Cell<bool>>) -> KeyListener {
        Rc::new(move |key: &mut KeyDown| {
            if !is_save_chord(&key.event) {
                return;
            }
            key.prevent_default();
            if disabled.get() {
                tracing::debug!("Save chord ignored: editor is disabled");
                return;
            }
            on_save();
        })
    }
}

/// An installed keydown listener. Removed on [`stop`](Self::stop) or drop.
pub struct KeyListenerScope {
    target: Rc<dyn KeyEventTarget>,
    id: Option<ListenerId>,
}

impl KeyListenerScope {
    /// Remove the listener
    pub fn stop(mut self) -> Result<(), ListenerError> {
        self.release()
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    fn release(&mut self) -> Result<(), ListenerError> {
        match self.id.take() {
            Some(id) => {
                tracing::debug!("Removing save listener {:?}", id);
                self.target.remove_keydown_listener(id)
            }
            None => Ok(()),
        }
    }
}

impl Drop for KeyListenerScope {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("Failed to remove save listener on drop: {}", e);
        }
    }
}

impl std::fmt::Debug for KeyListenerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListenerScope")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<usize>>, SaveCallback) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, Rc::new(move || c.set(c.get() + 1)))
    }

    #[test]
    fn test_save_chord_detection() {
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let cmd_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::SUPER);
        let plain_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let alt_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT);
        assert!(is_save_chord(&ctrl_s));
        assert!(is_save_chord(&cmd_s));
        assert!(!is_save_chord(&plain_s));
        assert!(!is_save_chord(&ctrl_a));
        assert!(!is_save_chord(&alt_s));
    }

    #[test]
    fn test_enabled_chord_saves_once() {
        let doc = Document::new();
        let (count, on_save) = counter();
        let _scope =
            KeyInterceptor::start(doc.clone(), on_save, Rc::new(Cell::new(false))).unwrap();

        let key = doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(key.default_prevented());
        assert_eq!(count.get(), 1);

        doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_disabled_chord_still_prevents_default() {
        let doc = Document::new();
        let (count, on_save) = counter();
        let _scope =
            KeyInterceptor::start(doc.clone(), on_save, Rc::new(Cell::new(true))).unwrap();

        let key = doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(key.default_prevented());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_disabled_flag_read_per_keystroke() {
        let doc = Document::new();
        let (count, on_save) = counter();
        let disabled = Rc::new(Cell::new(true));
        let _scope = KeyInterceptor::start(doc.clone(), on_save, Rc::clone(&disabled)).unwrap();

        doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(count.get(), 0);

        disabled.set(false);
        doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let doc = Document::new();
        let (count, on_save) = counter();
        let _scope =
            KeyInterceptor::start(doc.clone(), on_save, Rc::new(Cell::new(false))).unwrap();

        let key = doc.key_down(KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(!key.default_prevented());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_stop_removes_listener() {
        let doc = Document::new();
        let (count, on_save) = counter();
        let scope =
            KeyInterceptor::start(doc.clone(), on_save, Rc::new(Cell::new(false))).unwrap();
        assert_eq!(doc.listener_count(), 1);

        scope.stop().unwrap();
        assert_eq!(doc.listener_count(), 0);

        let key = doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!key.default_prevented());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_restart_rebinds_callback() {
        let doc = Document::new();
        let (first, on_first) = counter();
        let (second, on_second) = counter();
        let disabled = Rc::new(Cell::new(false));
        let mut scope = KeyInterceptor::start(doc.clone(), on_first, Rc::clone(&disabled)).unwrap();
        let old_id = scope.id();

        KeyInterceptor::restart(&mut scope, on_second, disabled).unwrap();
        assert_ne!(scope.id(), old_id);
        assert_eq!(doc.listener_count(), 1);

        doc.key_down(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_drop_removes_listener() {
        let doc = Document::new();
        let (_count, on_save) = counter();
        {
            let _scope =
                KeyInterceptor::start(doc.clone(), on_save, Rc::new(Cell::new(false))).unwrap();
            assert_eq!(doc.listener_count(), 1);
        }
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_remove_unknown_listener_fails() {
        let doc = Document::new();
        assert_eq!(
            doc.remove_keydown_listener(ListenerId(7)),
            Err(ListenerError::NotInstalled(ListenerId(7)))
        );
    }
}
