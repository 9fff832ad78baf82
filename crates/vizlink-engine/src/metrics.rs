//! Reconciliation counters.
//!
//! [`ReconcileMetrics`] is refreshed by every [`Reconciler`] pass and
//! every `advance`, giving per-pass counts plus cumulative totals.
//!
//! [`Reconciler`]: crate::reconcile::Reconciler

/// Mark lifecycle counts for the latest pass and since construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileMetrics {
    /// Marks created by the latest pass.
    pub entered: u32,
    /// Marks kept by the latest pass (same key, same mark).
    pub updated: u32,
    /// Marks that started exiting in the latest pass.
    pub exited: u32,
    /// Exiting marks promoted back to steady in the latest pass.
    pub revived: u32,
    /// Marks destroyed by the latest `advance`.
    pub destroyed: u32,
    /// Non-exiting marks after the latest pass or advance.
    pub live: u32,
    /// Exiting marks still on screen after the latest pass or advance.
    pub exiting: u32,
    /// Cumulative number of reconciliation passes.
    pub passes: u64,
    /// Cumulative marks created.
    pub total_entered: u64,
    /// Cumulative exits started.
    pub total_exited: u64,
    /// Cumulative exits cancelled by re-entry.
    pub total_revived: u64,
    /// Cumulative marks destroyed.
    pub total_destroyed: u64,
}

impl ReconcileMetrics {
    /// Marks the substrate currently holds.
    pub fn on_screen(&self) -> u32 {
        self.live + self.exiting
    }

    pub(crate) fn begin_pass(&mut self) {
        self.entered = 0;
        self.updated = 0;
        self.exited = 0;
        self.revived = 0;
        self.passes += 1;
    }

    pub(crate) fn end_pass(&mut self) {
        self.total_entered += u64::from(self.entered);
        self.total_exited += u64::from(self.exited);
        self.total_revived += u64::from(self.revived);
    }

    pub(crate) fn record_destroyed(&mut self, count: u32) {
        self.destroyed = count;
        self.total_destroyed += u64::from(count);
    }
}
