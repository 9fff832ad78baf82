//! Keyed reconciliation of datasets against on-screen marks.
//!
//! The [`Reconciler`] keeps an explicit map from identity key to [`Mark`]
//! (`id`, [`Phase`], bound datum, current [`Transition`]). Each
//! [`reconcile`](Reconciler::reconcile) pass diffs that map, including
//! marks still entering or exiting, against a new dataset:
//!
//! | Key in        | Action                                                |
//! |---------------|-------------------------------------------------------|
//! | new only      | create collapsed, animate to target (`enter_ms`)      |
//! | both          | keep the mark, animate to new target (`update_ms`)    |
//! | both, exiting | cancel the exit, animate back (`update_ms`)           |
//! | old only      | animate to collapsed (`exit_ms`), destroy on `advance`|
//!
//! A key that persists across passes always keeps its [`MarkId`].

use std::mem;

use indexmap::IndexMap;
use log::{debug, trace, warn};
use vizlink_core::{
    Datum, Dataset, Key, MarkId, MarkSink, MarkSpec, PointerEvent, PointerHandler, PointerKind,
    Shape, VisualAttributes,
};

use crate::config::TransitionConfig;
use crate::metrics::ReconcileMetrics;
use crate::transition::Transition;

/// Lifecycle phase of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created recently and still growing in, including when updated
    /// before the enter animation finished.
    Entering,
    /// Bound to a datum of the current dataset.
    Steady,
    /// Key left the dataset; dissolving until destroyed.
    Exiting,
}

/// How a view turns a datum into a mark.
pub trait MarkEncoder {
    /// Geometry of the mark for `datum`.
    fn shape(&self, datum: &Datum) -> Shape;

    /// Target attributes of the mark for `datum`.
    fn attrs(&self, datum: &Datum) -> VisualAttributes;

    /// Label text drawn with the mark.
    fn label(&self, _datum: &Datum) -> Option<String> {
        None
    }

    /// Vertical offset of labels from the mark position.
    fn label_dy(&self) -> f64 {
        0.0
    }
}

/// One on-screen mark owned by the reconciler.
#[derive(Clone, Debug)]
pub struct Mark {
    id: MarkId,
    key: Key,
    phase: Phase,
    datum: Datum,
    transition: Transition,
}

impl Mark {
    /// Substrate identity, stable for the mark's lifetime.
    pub fn id(&self) -> MarkId {
        self.id
    }

    /// Identity key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The bound datum (the last one seen for exiting marks).
    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// The running or last transition.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Attributes the mark is heading to.
    pub fn target(&self) -> &VisualAttributes {
        self.transition.target()
    }

    /// Attributes of the mark at `now_ms`.
    pub fn attrs_at(&self, now_ms: f64) -> VisualAttributes {
        self.transition.sample(now_ms)
    }

    /// Animate from wherever the mark is now to `target`. No-op if the
    /// mark is already heading there.
    fn retarget<S: MarkSink>(
        &mut self,
        target: VisualAttributes,
        sink: &mut S,
        now_ms: f64,
        duration_ms: f64,
    ) -> bool {
        if *self.transition.target() == target {
            return false;
        }
        let from = self.transition.sample(now_ms);
        sink.update_to(self.id, &target, duration_ms);
        self.transition = Transition::new(from, target, now_ms, duration_ms);
        true
    }
}

/// The keyed mark set of one view.
#[derive(Debug)]
pub struct Reconciler {
    marks: IndexMap<Key, Mark>,
    transitions: TransitionConfig,
    metrics: ReconcileMetrics,
}

impl Reconciler {
    /// An empty mark set animated with `transitions`.
    pub fn new(transitions: TransitionConfig) -> Self {
        Self {
            marks: IndexMap::new(),
            transitions,
            metrics: ReconcileMetrics::default(),
        }
    }

    /// Diff the current marks against `dataset` and issue the resulting
    /// creates and animations to `sink`.
    ///
    /// Live marks end up in dataset order, exiting marks after them. A
    /// key repeated within `dataset` is bound once, to its first row.
    pub fn reconcile<S: MarkSink, E: MarkEncoder>(
        &mut self,
        dataset: &Dataset,
        encoder: &E,
        sink: &mut S,
        now_ms: f64,
    ) -> &ReconcileMetrics {
        self.metrics.begin_pass();
        let t = &self.transitions;
        let mut previous = mem::take(&mut self.marks);
        let mut next = IndexMap::with_capacity(dataset.len() + previous.len());

        for datum in dataset {
            let key = datum.key();
            if next.contains_key(key) {
                warn!("duplicate key '{key}' in dataset, binding its first row only");
                continue;
            }
            let target = encoder.attrs(datum);
            let mark = match previous.swap_remove(key) {
                Some(mut mark) => {
                    match mark.phase {
                        Phase::Exiting => {
                            trace!("revive {key} ({})", mark.id);
                            self.metrics.revived += 1;
                            mark.phase = Phase::Steady;
                        }
                        // Still growing in: `advance` promotes it.
                        Phase::Entering if !mark.transition.is_finished(now_ms) => {
                            self.metrics.updated += 1;
                        }
                        _ => {
                            self.metrics.updated += 1;
                            mark.phase = Phase::Steady;
                        }
                    }
                    mark.datum = datum.clone();
                    mark.retarget(target, sink, now_ms, t.update_ms);
                    mark
                }
                None => {
                    let id = MarkId::next();
                    let initial = target.collapsed();
                    let shape = encoder.shape(datum);
                    let label = encoder.label(datum);
                    sink.create(
                        id,
                        MarkSpec {
                            key,
                            shape: &shape,
                            label: label.as_deref(),
                            label_dy: encoder.label_dy(),
                            attrs: &initial,
                        },
                    );
                    sink.update_to(id, &target, t.enter_ms);
                    trace!("enter {key} as {id}");
                    self.metrics.entered += 1;
                    Mark {
                        id,
                        key: key.clone(),
                        phase: Phase::Entering,
                        datum: datum.clone(),
                        transition: Transition::new(initial, target, now_ms, t.enter_ms),
                    }
                }
            };
            next.insert(key.clone(), mark);
        }

        for (key, mut mark) in previous {
            if mark.phase != Phase::Exiting {
                let from = mark.transition.sample(now_ms);
                let to = from.collapsed();
                sink.update_to(mark.id, &to, t.exit_ms);
                trace!("exit {key} ({})", mark.id);
                mark.transition = Transition::new(from, to, now_ms, t.exit_ms);
                mark.phase = Phase::Exiting;
                self.metrics.exited += 1;
            }
            next.insert(key, mark);
        }

        self.marks = next;
        self.metrics.end_pass();
        self.refresh_counts();
        debug!(
            "reconciled {} rows: {} entered, {} updated, {} revived, {} exited",
            dataset.len(),
            self.metrics.entered,
            self.metrics.updated,
            self.metrics.revived,
            self.metrics.exited
        );
        &self.metrics
    }

    /// Re-encode every non-exiting mark against its bound datum and
    /// animate the ones whose target changed. Returns how many changed.
    pub fn retarget<S: MarkSink, E: MarkEncoder>(
        &mut self,
        encoder: &E,
        sink: &mut S,
        now_ms: f64,
        duration_ms: f64,
    ) -> usize {
        let mut changed = 0;
        for mark in self.marks.values_mut() {
            if mark.phase == Phase::Exiting {
                continue;
            }
            let target = encoder.attrs(&mark.datum);
            if mark.retarget(target, sink, now_ms, duration_ms) {
                changed += 1;
            }
        }
        changed
    }

    /// Replace the geometry of every mark after a re-layout.
    pub fn reshape<S: MarkSink, E: MarkEncoder>(&mut self, encoder: &E, sink: &mut S) {
        for mark in self.marks.values() {
            sink.reshape(mark.id, &encoder.shape(&mark.datum));
        }
    }

    /// Settle finished transitions: entering marks become steady and
    /// exiting marks are destroyed. Returns the number destroyed.
    pub fn advance<S: MarkSink>(&mut self, sink: &mut S, now_ms: f64) -> usize {
        let before = self.marks.len();
        self.marks.retain(|key, mark| match mark.phase {
            Phase::Exiting if mark.transition.is_finished(now_ms) => {
                sink.destroy(mark.id);
                trace!("destroy {key} ({})", mark.id);
                false
            }
            Phase::Entering if mark.transition.is_finished(now_ms) => {
                mark.phase = Phase::Steady;
                true
            }
            _ => true,
        });
        let destroyed = before - self.marks.len();
        self.metrics.record_destroyed(destroyed as u32);
        self.refresh_counts();
        destroyed
    }

    /// Destroy every mark immediately.
    pub fn clear<S: MarkSink>(&mut self, sink: &mut S) {
        let count = self.marks.len();
        for (_, mark) in self.marks.drain(..) {
            sink.destroy(mark.id);
        }
        self.metrics.record_destroyed(count as u32);
        self.refresh_counts();
    }

    /// Route a pointer event to `handler` with the datum bound to the
    /// target mark. Events for unknown marks are dropped, as are all but
    /// `Leave` for exiting marks. Returns whether the event was delivered.
    pub fn dispatch<H: PointerHandler>(&self, event: &PointerEvent, handler: &mut H) -> bool {
        let Some(mark) = self.mark(event.mark) else {
            return false;
        };
        if mark.phase == Phase::Exiting && event.kind != PointerKind::Leave {
            return false;
        }
        match event.kind {
            PointerKind::Enter => handler.on_enter(&mark.datum, event),
            PointerKind::Move => handler.on_move(&mark.datum, event),
            PointerKind::Leave => handler.on_leave(&mark.datum, event),
            PointerKind::Click => handler.on_click(&mark.datum, event),
        }
        true
    }

    /// The mark bound to `key`, in any phase.
    pub fn get(&self, key: &str) -> Option<&Mark> {
        self.marks.get(key)
    }

    /// The mark with substrate id `id`.
    pub fn mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.values().find(|m| m.id == id)
    }

    /// True if `id` belongs to this reconciler.
    pub fn owns(&self, id: MarkId) -> bool {
        self.mark(id).is_some()
    }

    /// All marks: live ones in dataset order, then exiting ones.
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values()
    }

    /// Number of marks on screen, exiting ones included.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// True when no mark is on screen.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Number of non-exiting marks.
    pub fn live_count(&self) -> usize {
        self.marks
            .values()
            .filter(|m| m.phase != Phase::Exiting)
            .count()
    }

    /// True while any transition is still running at `now_ms`.
    pub fn is_animating(&self, now_ms: f64) -> bool {
        self.marks
            .values()
            .any(|m| !m.transition.is_finished(now_ms))
    }

    /// Counters of the latest pass.
    pub fn metrics(&self) -> &ReconcileMetrics {
        &self.metrics
    }

    /// Durations in use.
    pub fn transitions(&self) -> &TransitionConfig {
        &self.transitions
    }

    fn refresh_counts(&mut self) {
        let live = self.live_count();
        self.metrics.live = live as u32;
        self.metrics.exiting = (self.marks.len() - live) as u32;
    }
}
