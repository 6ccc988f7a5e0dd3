// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mediator statistics.

use crate::dispatch::fault::{Fault, FaultKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Lock-free dispatch counters.
#[derive(Debug)]
pub struct MediatorStats {
    /// Dispatches started.
    pub dispatched: AtomicU64,

    /// Dispatches delivered to the success continuation.
    pub succeeded: AtomicU64,

    /// Requests with no registered rule.
    pub not_registered: AtomicU64,

    /// Requests rejected by validators.
    pub validation_failed: AtomicU64,

    /// Dispatches abandoned through cancellation.
    pub cancelled: AtomicU64,

    /// Rule or validator errors and panics.
    pub unhandled: AtomicU64,

    /// Mediator creation time.
    pub created: Instant,
}

impl Default for MediatorStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MediatorStats {
    /// Create new stats.
    pub fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            not_registered: AtomicU64::new(0),
            validation_failed: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
            unhandled: AtomicU64::new(0),
            created: Instant::now(),
        }
    }

    pub(crate) fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_outcome<T>(&self, outcome: &Result<T, Fault>) {
        match outcome {
            Ok(_) => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(fault) => self.record_fault(fault.kind()),
        }
    }

    pub(crate) fn record_fault(&self, kind: FaultKind) {
        let counter = match kind {
            FaultKind::NotRegistered => &self.not_registered,
            FaultKind::Validation => &self.validation_failed,
            FaultKind::Cancelled => &self.cancelled,
            FaultKind::Unhandled => &self.unhandled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats.
    pub fn snapshot(&self) -> MediatorStatsSnapshot {
        MediatorStatsSnapshot {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            not_registered: self.not_registered.load(Ordering::Relaxed),
            validation_failed: self.validation_failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
            uptime_secs: self.created.elapsed().as_secs(),
        }
    }
}

/// Snapshot of mediator statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediatorStatsSnapshot {
    pub dispatched: u64,
    pub succeeded: u64,
    pub not_registered: u64,
    pub validation_failed: u64,
    pub cancelled: u64,
    pub unhandled: u64,
    pub uptime_secs: u64,
}

impl MediatorStatsSnapshot {
    /// Total faults of every kind.
    pub fn faults(&self) -> u64 {
        self.not_registered + self.validation_failed + self.cancelled + self.unhandled
    }

    /// Calculate dispatches per second.
    pub fn dispatches_per_second(&self) -> f64 {
        if self.uptime_secs > 0 {
            self.dispatched as f64 / self.uptime_secs as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let stats = MediatorStats::new();
        stats.record_dispatch();
        stats.record_outcome(&Ok::<_, Fault>(1));
        stats.record_dispatch();
        stats.record_outcome::<()>(&Err(Fault::Cancelled));
        stats.record_dispatch();
        stats.record_outcome::<()>(&Err(Fault::Validation(vec!["x".into()])));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.dispatched, 3);
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.cancelled, 1);
        assert_eq!(snapshot.validation_failed, 1);
        assert_eq!(snapshot.unhandled, 0);
        assert_eq!(snapshot.faults(), 2);
        assert_eq!(snapshot.dispatched, snapshot.succeeded + snapshot.faults());
    }

    #[test]
    fn test_dispatch_rate() {
        let mut snapshot = MediatorStats::new().snapshot();
        assert_eq!(snapshot.dispatches_per_second(), 0.0);

        snapshot.dispatched = 30;
        snapshot.uptime_secs = 10;
        assert_eq!(snapshot.dispatches_per_second(), 3.0);
    }
}
