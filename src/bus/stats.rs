use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::DispatchReport;

/// Running totals for one bus.
#[derive(Debug, Default)]
pub(crate) struct BusStats {
    published: AtomicU64,
    invoked: AtomicU64,
    queued: AtomicU64,
    retired: AtomicU64,
    pruned: AtomicU64,
}

impl BusStats {
    pub(crate) fn record(&self, report: &DispatchReport) {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.invoked.fetch_add(report.invoked as u64, Ordering::Relaxed);
        self.queued.fetch_add(report.queued as u64, Ordering::Relaxed);
        self.retired.fetch_add(report.retired as u64, Ordering::Relaxed);
        self.pruned.fetch_add(report.pruned as u64, Ordering::Relaxed);
    }

    pub(crate) fn add_pruned(&self, pruned: usize) {
        self.pruned.fetch_add(pruned as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            invoked: self.invoked.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            retired: self.retired.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a bus's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Events that went through dispatch.
    pub published: u64,
    /// Callbacks run inline.
    pub invoked: u64,
    /// Callbacks submitted to an execution queue.
    pub queued: u64,
    /// Once-subscriptions retired.
    pub retired: u64,
    /// Stale subscriptions removed.
    pub pruned: u64,
}
