// File: crates/bars-core/src/controls.rs
// Summary: Toggle control capability (checkbox / radio button) with a single change listener.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Payload delivered to change listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleEvent {
    pub checked: bool,
    /// The control's value attribute, e.g. `"grouped"` for a radio button.
    pub value: String,
}

type Listener = Rc<dyn Fn(&ToggleEvent)>;

struct ToggleInner {
    value: String,
    checked: Cell<bool>,
    listener: RefCell<Option<Listener>>,
}

/// Shared handle to a toggle control on the page. Cloning shares the control.
///
/// A control holds one change listener; registering a new one replaces the old,
/// so a chart that redraws never stacks duplicate handlers.
#[derive(Clone)]
pub struct ToggleControl {
    inner: Rc<ToggleInner>,
}

impl ToggleControl {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ToggleInner {
                value: value.into(),
                checked: Cell::new(false),
                listener: RefCell::new(None),
            }),
        }
    }

    pub fn value(&self) -> &str { &self.inner.value }
    pub fn checked(&self) -> bool { self.inner.checked.get() }

    /// Change the checked state without notifying the listener.
    pub fn set_checked(&self, checked: bool) {
        self.inner.checked.set(checked);
    }

    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&ToggleEvent) + 'static,
    {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn has_listener(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }

    /// User interaction: set the state and fire the change listener.
    pub fn activate(&self, checked: bool) {
        self.set_checked(checked);
        self.dispatch_change();
    }

    /// Fire the change listener with the current state.
    pub fn dispatch_change(&self) {
        // Clone out so the listener may re-register itself.
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            let event = ToggleEvent { checked: self.checked(), value: self.inner.value.clone() };
            listener(&event);
        }
    }
}

impl fmt::Debug for ToggleControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleControl")
            .field("value", &self.inner.value)
            .field("checked", &self.checked())
            .field("has_listener", &self.has_listener())
            .finish()
    }
}
