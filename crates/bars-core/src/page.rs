// File: crates/bars-core/src/page.rs
// Summary: Host page model: mount-point containers, toggle controls, clock and one-shot timers.
// Notes:
// - Everything here is single threaded; handles are `Rc`-shared and cheap to clone.
// - Time only moves when the host calls `advance`, which makes transitions and
//   timers deterministic.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::controls::ToggleControl;
use crate::scene::{SceneId, Svg};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: u64,
    callback: Box<dyn FnOnce()>,
}

struct PageInner {
    viewport_width: Cell<f64>,
    now: Cell<u64>,
    next_timer: Cell<u64>,
    containers: RefCell<HashMap<String, Container>>,
    controls: RefCell<HashMap<String, ToggleControl>>,
    timers: RefCell<Vec<Timer>>,
}

/// Shared handle to the host page.
#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

impl Page {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            inner: Rc::new(PageInner {
                viewport_width: Cell::new(viewport_width),
                now: Cell::new(0),
                next_timer: Cell::new(1),
                containers: RefCell::new(HashMap::new()),
                controls: RefCell::new(HashMap::new()),
                timers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn viewport_width(&self) -> f64 { self.inner.viewport_width.get() }

    pub fn set_viewport_width(&self, width: f64) {
        self.inner.viewport_width.set(width);
    }

    /// Register (or fetch) the container addressed by `selector`.
    pub fn add_container(&self, selector: &str) -> Container {
        self.inner
            .containers
            .borrow_mut()
            .entry(selector.to_string())
            .or_insert_with(|| Container::new(selector))
            .clone()
    }

    pub fn container(&self, selector: &str) -> Option<Container> {
        self.inner.containers.borrow().get(selector).cloned()
    }

    /// Register (or fetch) a toggle control addressed by `selector`.
    pub fn add_toggle(&self, selector: &str, value: &str) -> ToggleControl {
        self.inner
            .controls
            .borrow_mut()
            .entry(selector.to_string())
            .or_insert_with(|| ToggleControl::new(value))
            .clone()
    }

    pub fn toggle(&self, selector: &str) -> Option<ToggleControl> {
        self.inner.controls.borrow().get(selector).cloned()
    }

    /// Current clock in milliseconds.
    pub fn now(&self) -> u64 { self.inner.now.get() }

    /// Schedule `callback` to run once, `delay_ms` after now.
    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let id = TimerId(self.inner.next_timer.get());
        self.inner.next_timer.set(id.0 + 1);
        self.inner.timers.borrow_mut().push(Timer {
            id,
            due: self.now() + delay_ms,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cleared.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut timers = self.inner.timers.borrow_mut();
        let before = timers.len();
        timers.retain(|t| t.id != id);
        timers.len() != before
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Move the clock forward, firing due timers in due order. The clock reads
    /// each timer's due time while its callback runs.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut timers = self.inner.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id.0))
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.inner.now.set(timer.due.max(self.now()));
                    (timer.callback)();
                }
                None => break,
            }
        }
        self.inner.now.set(target);
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("viewport_width", &self.viewport_width())
            .field("now", &self.now())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}

struct ContainerInner {
    scenes: Vec<Svg>,
    next_id: SceneId,
}

/// A mount point: holds the rendered scenes appended under it.
#[derive(Clone)]
pub struct Container {
    selector: Rc<str>,
    inner: Rc<RefCell<ContainerInner>>,
}

impl Container {
    fn new(selector: &str) -> Self {
        Self {
            selector: Rc::from(selector),
            inner: Rc::new(RefCell::new(ContainerInner { scenes: Vec::new(), next_id: 1 })),
        }
    }

    pub fn selector(&self) -> &str { &self.selector }
    pub fn len(&self) -> usize { self.inner.borrow().scenes.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Remove every scene under this mount point.
    pub fn clear(&self) {
        self.inner.borrow_mut().scenes.clear();
    }

    /// Append a scene, assigning it a fresh id.
    pub fn append(&self, mut svg: Svg) -> SceneId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        svg.id = id;
        inner.scenes.push(svg);
        id
    }

    pub fn scenes(&self) -> Ref<'_, [Svg]> {
        Ref::map(self.inner.borrow(), |c| c.scenes.as_slice())
    }

    /// Copy of the most recently appended scene.
    pub fn snapshot(&self) -> Option<Svg> {
        self.inner.borrow().scenes.last().cloned()
    }

    pub fn with_scene<R>(&self, id: SceneId, f: impl FnOnce(&Svg) -> R) -> Option<R> {
        self.inner.borrow().scenes.iter().find(|s| s.id == id).map(f)
    }

    pub fn with_scene_mut<R>(&self, id: SceneId, f: impl FnOnce(&mut Svg) -> R) -> Option<R> {
        self.inner.borrow_mut().scenes.iter_mut().find(|s| s.id == id).map(f)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("selector", &self.selector)
            .field("scenes", &self.len())
            .finish()
    }
}
