//! The interface the [`Dashboard`](crate::Dashboard) drives views through.

use vizlink_core::{MarkId, PointerEvent};
use vizlink_scale::{format_si, LinearScale};

use crate::interaction::InteractionCell;

/// A rendered view over its own mark set.
///
/// All methods take the current time so animations are driven by the
/// host's frame clock rather than by the views.
pub trait View {
    /// Display name, used in logs.
    fn name(&self) -> &str;

    /// The interaction state the view reads and writes.
    fn interaction(&self) -> &InteractionCell;

    /// True if `mark` is one of this view's marks.
    fn owns(&self, mark: MarkId) -> bool;

    /// Handle a pointer event targeting one of this view's marks, then
    /// bring the view up to date. Returns whether it was delivered.
    fn handle_pointer(&mut self, event: &PointerEvent, now_ms: f64) -> bool;

    /// Re-encode marks if the interaction state or the mark under the
    /// pointer changed since the last encode. Returns the number of
    /// marks retargeted.
    fn sync(&mut self, now_ms: f64) -> usize;

    /// New outer size: full re-layout. Sizes that leave no drawable
    /// area skip the frame until a usable size arrives.
    fn resize(&mut self, width: f64, height: f64, now_ms: f64);

    /// The host window changed size. Views that size themselves from the
    /// window override this; the rest take the window size as is.
    fn window_resized(&mut self, width: f64, height: f64, now_ms: f64) {
        self.resize(width, height, now_ms);
    }

    /// Settle finished transitions. Returns the number of marks destroyed.
    fn advance(&mut self, now_ms: f64) -> usize;
}

/// One axis tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Domain value.
    pub value: f64,
    /// Pixel offset along the axis.
    pub offset: f64,
    /// Label with SI prefix and two significant digits.
    pub label: String,
}

/// Ticks of `scale`; none for a degenerate domain.
pub fn axis_ticks(scale: &LinearScale, count: usize) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|value| Tick {
            value,
            offset: scale.map(value),
            label: format_si(value, 2),
        })
        .collect()
}
