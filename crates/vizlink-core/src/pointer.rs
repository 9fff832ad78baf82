//! Pointer events delivered by the substrate.

use crate::attrs::Point;
use crate::id::MarkId;

/// Kind of pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Pointer entered the mark.
    Enter,
    /// Pointer moved within the mark.
    Move,
    /// Pointer left the mark.
    Leave,
    /// The mark was clicked.
    Click,
}

/// A pointer event targeting one mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Target mark.
    pub mark: MarkId,
    /// What happened.
    pub kind: PointerKind,
    /// Pointer location in view coordinates.
    pub at: Point,
}

impl PointerEvent {
    /// Construct an event.
    pub fn new(mark: MarkId, kind: PointerKind, at: Point) -> Self {
        Self { mark, kind, at }
    }
}
