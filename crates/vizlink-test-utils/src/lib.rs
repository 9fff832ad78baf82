//! Test utilities and mock types for vizlink development.
//!
//! Provides a [`RecordingSink`] implementation of [`MarkSink`] that keeps
//! a log of every substrate operation plus the set of live marks, a
//! [`RecordingHandler`] for [`PointerHandler`], and the dataset and
//! topology [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::BTreeMap;

use vizlink_core::{
    Datum, Key, MarkId, MarkSink, MarkSpec, PointerEvent, PointerHandler, PointerKind, Shape,
    VisualAttributes,
};

/// One recorded substrate call.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkOp {
    Create {
        mark: MarkId,
        key: Key,
        shape: Shape,
        label: Option<String>,
        label_dy: f64,
        attrs: VisualAttributes,
    },
    UpdateTo {
        mark: MarkId,
        target: VisualAttributes,
        duration_ms: f64,
    },
    Destroy {
        mark: MarkId,
    },
    Reshape {
        mark: MarkId,
        shape: Shape,
    },
    Raise {
        mark: MarkId,
    },
}

impl SinkOp {
    pub fn mark(&self) -> MarkId {
        match self {
            Self::Create { mark, .. }
            | Self::UpdateTo { mark, .. }
            | Self::Destroy { mark }
            | Self::Reshape { mark, .. }
            | Self::Raise { mark } => *mark,
        }
    }
}

/// State of one mark as the substrate sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveMark {
    pub key: Key,
    pub shape: Shape,
    pub label: Option<String>,
    /// Last attributes the mark was created with or animated towards.
    pub attrs: VisualAttributes,
}

/// Mock [`MarkSink`] recording every call.
///
/// Panics on lifetime violations (double create, update or destroy of an
/// unknown mark) so tests fail at the offending call.
#[derive(Default)]
pub struct RecordingSink {
    ops: Vec<SinkOp>,
    live: BTreeMap<MarkId, LiveMark>,
    order: Vec<MarkId>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    /// Forget the op log; live marks are kept.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn live(&self) -> &BTreeMap<MarkId, LiveMark> {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// The live mark bound to `key`. Panics if more than one exists.
    pub fn mark_for(&self, key: &str) -> Option<MarkId> {
        let mut found = self
            .live
            .iter()
            .filter(|(_, m)| m.key.as_str() == key)
            .map(|(id, _)| *id);
        let first = found.next();
        assert!(found.next().is_none(), "two live marks for key {key}");
        first
    }

    pub fn attrs_of(&self, key: &str) -> Option<&VisualAttributes> {
        let id = self.mark_for(key)?;
        self.live.get(&id).map(|m| &m.attrs)
    }

    /// Draw order, bottom first.
    pub fn draw_order(&self) -> &[MarkId] {
        &self.order
    }

    pub fn count(&self, pred: impl Fn(&SinkOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn creates(&self) -> usize {
        self.count(|op| matches!(op, SinkOp::Create { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|op| matches!(op, SinkOp::UpdateTo { .. }))
    }

    pub fn destroys(&self) -> usize {
        self.count(|op| matches!(op, SinkOp::Destroy { .. }))
    }
}

impl MarkSink for RecordingSink {
    fn create(&mut self, mark: MarkId, spec: MarkSpec<'_>) {
        let prev = self.live.insert(
            mark,
            LiveMark {
                key: spec.key.clone(),
                shape: spec.shape.clone(),
                label: spec.label.map(str::to_string),
                attrs: spec.attrs.clone(),
            },
        );
        assert!(prev.is_none(), "{mark} created twice");
        self.order.push(mark);
        self.ops.push(SinkOp::Create {
            mark,
            key: spec.key.clone(),
            shape: spec.shape.clone(),
            label: spec.label.map(str::to_string),
            label_dy: spec.label_dy,
            attrs: spec.attrs.clone(),
        });
    }

    fn update_to(&mut self, mark: MarkId, target: &VisualAttributes, duration_ms: f64) {
        let live = self
            .live
            .get_mut(&mark)
            .unwrap_or_else(|| panic!("update_to on dead {mark}"));
        live.attrs = target.clone();
        self.ops.push(SinkOp::UpdateTo {
            mark,
            target: target.clone(),
            duration_ms,
        });
    }

    fn destroy(&mut self, mark: MarkId) {
        assert!(self.live.remove(&mark).is_some(), "destroy of dead {mark}");
        self.order.retain(|m| *m != mark);
        self.ops.push(SinkOp::Destroy { mark });
    }

    fn reshape(&mut self, mark: MarkId, shape: &Shape) {
        let live = self
            .live
            .get_mut(&mark)
            .unwrap_or_else(|| panic!("reshape on dead {mark}"));
        live.shape = shape.clone();
        self.ops.push(SinkOp::Reshape {
            mark,
            shape: shape.clone(),
        });
    }

    fn raise(&mut self, mark: MarkId) {
        assert!(self.live.contains_key(&mark), "raise of dead {mark}");
        self.order.retain(|m| *m != mark);
        self.order.push(mark);
        self.ops.push(SinkOp::Raise { mark });
    }
}

/// Mock [`PointerHandler`] recording `(kind, key)` per callback.
#[derive(Default)]
pub struct RecordingHandler {
    pub calls: Vec<(PointerKind, Key)>,
}

impl RecordingHandler {
    fn record(&mut self, kind: PointerKind, datum: &Datum) {
        self.calls.push((kind, datum.key().clone()));
    }
}

impl PointerHandler for RecordingHandler {
    fn on_enter(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.record(PointerKind::Enter, datum);
    }

    fn on_move(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.record(PointerKind::Move, datum);
    }

    fn on_leave(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.record(PointerKind::Leave, datum);
    }

    fn on_click(&mut self, datum: &Datum, _event: &PointerEvent) {
        self.record(PointerKind::Click, datum);
    }
}
