//! Coordinator of linked views.
//!
//! The dashboard owns the shared [`InteractionCell`] and its views. It
//! routes each pointer event to the view owning the target mark and,
//! before returning, re-synchronizes every view the resulting writes
//! affected, so no view paints a stale emphasis.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};
use vizlink_core::{Key, PointerEvent};

use crate::interaction::{InteractionCell, SubscriptionId};
use crate::view::View;

/// A set of views sharing one interaction state.
///
/// Views are held as `Rc<RefCell<_>>` so the host keeps typed handles
/// to them; such a handle must not be borrowed while a dashboard method
/// runs.
pub struct Dashboard {
    cell: InteractionCell,
    views: Vec<Rc<RefCell<dyn View>>>,
    dirty: Rc<Cell<bool>>,
    subscription: SubscriptionId,
}

impl Dashboard {
    /// An empty dashboard with a fresh interaction state.
    pub fn new() -> Self {
        let cell = InteractionCell::new();
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = cell.subscribe(move |_| flag.set(true));
        Self {
            cell,
            views: Vec::new(),
            dirty,
            subscription,
        }
    }

    /// The shared interaction state. Pass it to linked views at
    /// construction.
    pub fn interaction(&self) -> &InteractionCell {
        &self.cell
    }

    /// Register `view` and return a typed handle to it.
    pub fn add_view<V: View + 'static>(&mut self, view: V) -> Rc<RefCell<V>> {
        let view = Rc::new(RefCell::new(view));
        debug!("dashboard: added view '{}'", view.borrow().name());
        self.views.push(Rc::clone(&view) as Rc<RefCell<dyn View>>);
        view
    }

    /// Registered views, in registration order.
    pub fn views(&self) -> &[Rc<RefCell<dyn View>>] {
        &self.views
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True when no view is registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Deliver `event` to the view owning its mark, then bring every view
    /// up to date. Returns whether some view handled it.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now_ms: f64) -> bool {
        let Some(owner) = self.views.iter().find(|v| v.borrow().owns(event.mark)) else {
            trace!("dashboard: no view owns {}, dropping {:?}", event.mark, event.kind);
            return false;
        };
        let delivered = owner.borrow_mut().handle_pointer(event, now_ms);
        self.sync(now_ms);
        delivered
    }

    /// Deliver `events` in order, as one input turn. Returns how many
    /// were handled.
    pub fn handle_pointer_events(&mut self, events: &[PointerEvent], now_ms: f64) -> usize {
        events
            .iter()
            .filter(|e| self.handle_pointer(e, now_ms))
            .count()
    }

    /// Write the hovered key from outside any view.
    pub fn set_hovered(&mut self, key: Option<Key>, now_ms: f64) -> bool {
        let changed = self.cell.set_hovered(key);
        self.sync(now_ms);
        changed
    }

    /// Write the selected key from outside any view.
    pub fn set_selected(&mut self, key: Option<Key>, now_ms: f64) -> bool {
        let changed = self.cell.set_selected(key);
        self.sync(now_ms);
        changed
    }

    /// Re-encode every view if the shared state changed since the last
    /// sync. Returns the number of marks retargeted.
    pub fn sync(&mut self, now_ms: f64) -> usize {
        if !self.dirty.replace(false) {
            return 0;
        }
        self.views
            .iter()
            .map(|v| v.borrow_mut().sync(now_ms))
            .sum()
    }

    /// The host window is now `width` x `height`: re-lay-out every view.
    /// Views with size presets pick their own size from it.
    pub fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
        for view in &self.views {
            view.borrow_mut().window_resized(width, height, now_ms);
        }
    }

    /// Apply pending interaction writes, then settle finished transitions
    /// in every view. Returns the number of marks destroyed.
    pub fn advance(&mut self, now_ms: f64) -> usize {
        self.sync(now_ms);
        self.views
            .iter()
            .map(|v| v.borrow_mut().advance(now_ms))
            .sum()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.cell.unsubscribe(self.subscription);
    }
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .views
            .iter()
            .map(|v| {
                v.try_borrow()
                    .map_or_else(|_| "<borrowed>".to_string(), |v| v.name().to_string())
            })
            .collect();
        f.debug_struct("Dashboard")
            .field("interaction", &self.cell)
            .field("views", &names)
            .finish()
    }
}
