//! Shared hover/selection state.
//!
//! [`InteractionCell`] is a single-threaded shared cell: every view holds
//! a clone, reads the current [`InteractionState`], and writes it
//! directly. Writes apply synchronously (last writer wins per slot) and
//! bump the [`Revision`]; writing the value already held is a no-op.
//!
//! Subscribers are notified once per effective write, in write order.
//! A write issued from inside a notification is applied immediately but
//! its notification is queued behind the one being delivered, so a
//! leave-then-enter pair is always observed as leave, then enter.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::rc::Rc;

use log::trace;
use vizlink_core::{Key, Revision};

/// The hover and selection values shared by all linked views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Category under the pointer, if any.
    pub hovered: Option<Key>,
    /// Sticky selection, if any.
    pub selected: Option<Key>,
}

impl InteractionState {
    /// The key that drives emphasis: the selection if set, else the hover.
    pub fn active(&self) -> Option<&Key> {
        self.selected.as_ref().or(self.hovered.as_ref())
    }

    /// True when nothing is hovered or selected.
    pub fn is_idle(&self) -> bool {
        self.hovered.is_none() && self.selected.is_none()
    }
}

/// Which slot of the state a write targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// [`InteractionState::hovered`].
    Hovered,
    /// [`InteractionState::selected`].
    Selected,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hovered => "hovered",
            Self::Selected => "selected",
        })
    }
}

/// One effective write, as delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Slot written.
    pub slot: Slot,
    /// Value before the write.
    pub previous: Option<Key>,
    /// Value after the write.
    pub current: Option<Key>,
    /// Revision produced by the write.
    pub revision: Revision,
}

/// Handle returned by [`InteractionCell::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Change)>;

#[derive(Default)]
struct Inner {
    state: InteractionState,
    revision: Revision,
    listeners: Vec<(SubscriptionId, Listener)>,
    /// Listeners taken out of `listeners` for the delivery in progress.
    in_flight: Vec<SubscriptionId>,
    removed: Vec<SubscriptionId>,
    next_subscription: u64,
    queue: VecDeque<Change>,
    delivering: bool,
}

impl Inner {
    fn subscriber_count(&self) -> usize {
        let in_flight = self
            .in_flight
            .iter()
            .filter(|id| !self.removed.contains(id))
            .count();
        self.listeners.len() + in_flight
    }
}

/// Shared, observable [`InteractionState`].
///
/// Cloning yields another handle to the same state.
#[derive(Clone, Default)]
pub struct InteractionCell {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for InteractionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("InteractionCell")
            .field("state", &inner.state)
            .field("revision", &inner.revision)
            .field("listeners", &inner.subscriber_count())
            .finish()
    }
}

impl InteractionCell {
    /// A fresh cell with nothing hovered or selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> InteractionState {
        self.inner.borrow().state.clone()
    }

    /// Revision of the current state. Starts at 0.
    pub fn revision(&self) -> Revision {
        self.inner.borrow().revision
    }

    /// Currently hovered key.
    pub fn hovered(&self) -> Option<Key> {
        self.inner.borrow().state.hovered.clone()
    }

    /// Currently selected key.
    pub fn selected(&self) -> Option<Key> {
        self.inner.borrow().state.selected.clone()
    }

    /// True if `self` and `other` are handles to the same state.
    pub fn same_cell(&self, other: &InteractionCell) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Set or clear the hovered key. Returns whether the state changed.
    pub fn set_hovered(&self, key: Option<Key>) -> bool {
        self.write(Slot::Hovered, key)
    }

    /// Set or clear the selected key. Returns whether the state changed.
    pub fn set_selected(&self, key: Option<Key>) -> bool {
        self.write(Slot::Selected, key)
    }

    /// Select `key`, or clear the selection if `key` is already selected.
    pub fn toggle_selected(&self, key: Key) -> bool {
        let next = if self.selected().as_ref() == Some(&key) {
            None
        } else {
            Some(key)
        };
        self.set_selected(next)
    }

    /// Register a listener called once per effective write.
    pub fn subscribe(&self, listener: impl FnMut(&Change) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Takes effect immediately, also mid-delivery.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        if inner.listeners.len() == before
            && inner.in_flight.contains(&id)
            && !inner.removed.contains(&id)
        {
            inner.removed.push(id);
        }
    }

    /// Number of registered listeners, including those being called by
    /// a delivery in progress.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscriber_count()
    }

    fn write(&self, slot: Slot, key: Option<Key>) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let target = match slot {
                Slot::Hovered => &mut inner.state.hovered,
                Slot::Selected => &mut inner.state.selected,
            };
            if *target == key {
                return false;
            }
            let previous = mem::replace(target, key.clone());
            inner.revision = inner.revision.bump();
            let change = Change {
                slot,
                previous,
                current: key,
                revision: inner.revision,
            };
            trace!(
                "interaction {slot}: {:?} -> {:?} ({})",
                change.previous,
                change.current,
                change.revision
            );
            inner.queue.push_back(change);
            if inner.delivering {
                return true;
            }
            inner.delivering = true;
        }
        self.deliver();
        true
    }

    /// Drain the notification queue. Listeners run without any borrow
    /// held, so they may read and write the cell.
    fn deliver(&self) {
        loop {
            let (change, mut listeners) = {
                let mut inner = self.inner.borrow_mut();
                match inner.queue.pop_front() {
                    Some(change) => {
                        let listeners = mem::take(&mut inner.listeners);
                        inner.in_flight = listeners.iter().map(|(id, _)| *id).collect();
                        (change, listeners)
                    }
                    None => {
                        inner.delivering = false;
                        inner.removed.clear();
                        return;
                    }
                }
            };
            for (id, listener) in listeners.iter_mut() {
                if self.inner.borrow().removed.contains(id) {
                    continue;
                }
                listener(&change);
            }
            let mut inner = self.inner.borrow_mut();
            let removed = mem::take(&mut inner.removed);
            listeners.retain(|(id, _)| !removed.contains(id));
            inner.in_flight.clear();
            let added = mem::replace(&mut inner.listeners, listeners);
            inner.listeners.extend(added);
            inner.removed = removed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_changes(cell: &InteractionCell) -> Rc<RefCell<Vec<Change>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        cell.subscribe(move |c| sink.borrow_mut().push(c.clone()));
        log
    }

    #[test]
    fn idempotent_hover_writes_notify_once() {
        let cell = InteractionCell::new();
        let log = log_changes(&cell);
        assert!(cell.set_hovered(Some("CA".into())));
        assert!(!cell.set_hovered(Some("CA".into())));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(cell.revision(), Revision(1));
        assert_eq!(cell.hovered(), Some(Key::new("CA")));
    }

    #[test]
    fn handles_share_state() {
        let a = InteractionCell::new();
        let b = a.clone();
        b.set_selected(Some("TX".into()));
        assert_eq!(a.selected(), Some(Key::new("TX")));
        assert!(a.same_cell(&b));
        assert!(!a.same_cell(&InteractionCell::new()));
    }

    #[test]
    fn active_prefers_selection() {
        let state = InteractionState {
            hovered: Some("TX".into()),
            selected: Some("CA".into()),
        };
        assert_eq!(state.active(), Some(&Key::new("CA")));
        assert!(InteractionState::default().is_idle());
    }

    #[test]
    fn toggle_clears_same_key() {
        let cell = InteractionCell::new();
        cell.toggle_selected("CA".into());
        assert_eq!(cell.selected(), Some(Key::new("CA")));
        cell.toggle_selected("TX".into());
        assert_eq!(cell.selected(), Some(Key::new("TX")));
        cell.toggle_selected("TX".into());
        assert_eq!(cell.selected(), None);
    }

    #[test]
    fn nested_writes_are_delivered_in_order() {
        let cell = InteractionCell::new();
        let handle = cell.clone();
        // A listener that reacts to a hover clear by hovering another key,
        // as a second view's enter handler firing in the same turn would.
        cell.subscribe(move |c| {
            if c.slot == Slot::Hovered && c.current.is_none() {
                handle.set_hovered(Some("TX".into()));
            }
        });
        let log = log_changes(&cell);
        cell.set_hovered(Some("CA".into()));
        cell.set_hovered(None);

        let seen: Vec<Option<Key>> = log.borrow().iter().map(|c| c.current.clone()).collect();
        assert_eq!(seen, [Some(Key::new("CA")), None, Some(Key::new("TX"))]);
        assert_eq!(cell.hovered(), Some(Key::new("TX")));
        let revisions: Vec<u64> = log.borrow().iter().map(|c| c.revision.0).collect();
        assert_eq!(revisions, [1, 2, 3]);
    }

    #[test]
    fn unsubscribe_during_delivery() {
        let cell = InteractionCell::new();
        let handle = cell.clone();
        let id = Rc::new(RefCell::new(None));
        let id_in = Rc::clone(&id);
        let calls = Rc::new(RefCell::new(0));
        let calls_in = Rc::clone(&calls);
        let sid = cell.subscribe(move |_| {
            *calls_in.borrow_mut() += 1;
            if let Some(sid) = *id_in.borrow() {
                handle.unsubscribe(sid);
            }
        });
        *id.borrow_mut() = Some(sid);
        cell.set_hovered(Some("CA".into()));
        cell.set_hovered(Some("TX".into()));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn count_includes_listeners_being_called() {
        let cell = InteractionCell::new();
        let handle = cell.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        cell.subscribe(move |_| seen_in.borrow_mut().push(handle.subscriber_count()));
        let other = cell.subscribe(|_| {});

        cell.set_hovered(Some("CA".into()));
        cell.unsubscribe(other);
        cell.set_hovered(None);
        assert_eq!(*seen.borrow(), [2, 1]);
        assert_eq!(cell.subscriber_count(), 1);
    }

    #[test]
    fn subscribe_during_delivery_sees_later_writes() {
        let cell = InteractionCell::new();
        let handle = cell.clone();
        let late = Rc::new(RefCell::new(0));
        let late_in = Rc::clone(&late);
        let mut armed = true;
        cell.subscribe(move |_| {
            if armed {
                armed = false;
                let counter = Rc::clone(&late_in);
                handle.subscribe(move |_| *counter.borrow_mut() += 1);
            }
        });
        cell.set_selected(Some("CA".into()));
        assert_eq!(*late.borrow(), 0);
        cell.set_selected(None);
        assert_eq!(*late.borrow(), 1);
        assert_eq!(cell.subscriber_count(), 2);
    }
}
