//! Seams to the host rendering substrate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::attrs::{Shape, VisualAttributes};
use crate::datum::Datum;
use crate::id::{Key, MarkId};
use crate::pointer::PointerEvent;

/// Everything the substrate needs to create a mark.
#[derive(Clone, Copy, Debug)]
pub struct MarkSpec<'a> {
    /// Identity key the mark is bound to.
    pub key: &'a Key,
    /// Geometry of the mark.
    pub shape: &'a Shape,
    /// Text drawn with the mark, if any.
    pub label: Option<&'a str>,
    /// Vertical offset of the label from the mark position, in pixels.
    pub label_dy: f64,
    /// Attributes the mark starts with.
    pub attrs: &'a VisualAttributes,
}

/// Retained-mode scene graph operations issued by the reconciler.
///
/// Implemented by the host (an SVG-like scene graph). The reconciler owns
/// mark lifetimes: it is the only caller of `create` and `destroy`, and it
/// never calls `update_to` on a destroyed mark. The substrate interpolates
/// `update_to` over `duration_ms` with its own frame primitive and routes
/// pointer events for a mark back as [`PointerEvent`]s carrying its id.
pub trait MarkSink {
    /// Create a mark with its initial attributes.
    fn create(&mut self, mark: MarkId, spec: MarkSpec<'_>);

    /// Animate a live mark to `target` over `duration_ms` (0 = immediately).
    ///
    /// A call while a previous animation is running replaces it.
    fn update_to(&mut self, mark: MarkId, target: &VisualAttributes, duration_ms: f64);

    /// Remove a mark.
    fn destroy(&mut self, mark: MarkId);

    /// Replace the geometry of a live mark (re-layout after resize).
    fn reshape(&mut self, _mark: MarkId, _shape: &Shape) {}

    /// Move a mark to the top of the draw order.
    fn raise(&mut self, _mark: MarkId) {}
}

/// A shared sink, so the host can keep a handle to a sink a view owns.
impl<S: MarkSink> MarkSink for Rc<RefCell<S>> {
    fn create(&mut self, mark: MarkId, spec: MarkSpec<'_>) {
        self.borrow_mut().create(mark, spec);
    }

    fn update_to(&mut self, mark: MarkId, target: &VisualAttributes, duration_ms: f64) {
        self.borrow_mut().update_to(mark, target, duration_ms);
    }

    fn destroy(&mut self, mark: MarkId) {
        self.borrow_mut().destroy(mark);
    }

    fn reshape(&mut self, mark: MarkId, shape: &Shape) {
        self.borrow_mut().reshape(mark, shape);
    }

    fn raise(&mut self, mark: MarkId) {
        self.borrow_mut().raise(mark);
    }
}

/// Per-mark pointer callbacks, each receiving the bound datum.
///
/// [`PointerEvent`]s from the substrate are resolved to the datum bound to
/// the target mark and dispatched here.
pub trait PointerHandler {
    /// Pointer entered a mark.
    fn on_enter(&mut self, datum: &Datum, event: &PointerEvent);
    /// Pointer moved within a mark.
    fn on_move(&mut self, datum: &Datum, event: &PointerEvent);
    /// Pointer left a mark.
    fn on_leave(&mut self, datum: &Datum, event: &PointerEvent);
    /// Mark was clicked.
    fn on_click(&mut self, datum: &Datum, event: &PointerEvent);
}
