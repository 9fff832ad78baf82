//! Time-sliced attribute interpolation.
//!
//! The substrate animates marks itself (`MarkSink::update_to` takes a
//! duration); the engine mirrors each animation as a [`Transition`] so it
//! always knows a mark's attributes at any instant. That is what lets a
//! transition be retargeted mid-flight from where the mark actually is,
//! and what tells the reconciler when an exit has finished.

use vizlink_core::VisualAttributes;

/// Cubic ease-in-out on `t ∈ [0, 1]`, the default transition easing.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An interpolation between two attribute sets over a time window.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    from: VisualAttributes,
    to: VisualAttributes,
    start_ms: f64,
    duration_ms: f64,
}

impl Transition {
    /// Animate `from` → `to`, starting at `start_ms`.
    ///
    /// Non-positive or non-finite durations complete instantly.
    pub fn new(
        from: VisualAttributes,
        to: VisualAttributes,
        start_ms: f64,
        duration_ms: f64,
    ) -> Self {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// A finished transition resting at `attrs`.
    pub fn settled(attrs: VisualAttributes) -> Self {
        Self::new(attrs.clone(), attrs, 0.0, 0.0)
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// True once `now_ms` reaches the end of the window.
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Eased attributes at `now_ms`.
    pub fn sample(&self, now_ms: f64) -> VisualAttributes {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, ease_cubic_in_out(p))
    }

    /// Starting attributes.
    pub fn from(&self) -> &VisualAttributes {
        &self.from
    }

    /// Final attributes.
    pub fn target(&self) -> &VisualAttributes {
        &self.to
    }

    /// Start time.
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    /// Duration.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Time at which the transition completes.
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}
