//! Process-wide, opt-in parse metrics.
//!
//! Disabled by default (spec.md §6.4): nothing is recorded until
//! [`Metrics::enable`] is called, so a consumer that never asks for metrics
//! pays only an `AtomicBool` load per parse.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

static ENABLED: AtomicBool = AtomicBool::new(false);
static FILES_PROCESSED: AtomicU64 = AtomicU64::new(0);
static PARSE_TIME_TOTAL_NANOS: AtomicU64 = AtomicU64::new(0);
static NODES_ALLOCATED_TOTAL: AtomicU64 = AtomicU64::new(0);
static PARSE_ERRORS: AtomicU64 = AtomicU64::new(0);

/// An immutable snapshot of the process-wide counters at the moment it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub files_processed: u64,
    pub parse_time_total: Duration,
    pub nodes_allocated_total: u64,
    pub parse_errors: u64,
}

/// Handle onto the process-wide metrics counters.
///
/// There is no instance state: every method reads or writes the same
/// statics, matching spec.md §4.8/§9.1's "global mutable metrics ... expose
/// as a process-wide, opt-in counter object" guidance.
pub struct Metrics;

impl Metrics {
    pub fn enable() {
        ENABLED.store(true, Ordering::Relaxed);
    }

    pub fn disable() {
        ENABLED.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    /// Called once per completed parse by the public facade. A no-op unless
    /// metrics collection is enabled.
    pub(crate) fn record_parse(nodes_allocated: u64, errors: u64, duration: Duration) {
        if !Self::is_enabled() {
            return;
        }
        FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
        PARSE_TIME_TOTAL_NANOS.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        NODES_ALLOCATED_TOTAL.fetch_add(nodes_allocated, Ordering::Relaxed);
        PARSE_ERRORS.fetch_add(errors, Ordering::Relaxed);
    }

    pub fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            files_processed: FILES_PROCESSED.load(Ordering::Relaxed),
            parse_time_total: Duration::from_nanos(PARSE_TIME_TOTAL_NANOS.load(Ordering::Relaxed)),
            nodes_allocated_total: NODES_ALLOCATED_TOTAL.load(Ordering::Relaxed),
            parse_errors: PARSE_ERRORS.load(Ordering::Relaxed),
        }
    }

    pub fn reset() {
        FILES_PROCESSED.store(0, Ordering::Relaxed);
        PARSE_TIME_TOTAL_NANOS.store(0, Ordering::Relaxed);
        NODES_ALLOCATED_TOTAL.store(0, Ordering::Relaxed);
        PARSE_ERRORS.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Metrics are process-wide statics; serialize the tests that touch them
    // so they don't observe each other's counters.
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn disabled_by_default_records_nothing() {
        let _guard = TEST_LOCK.lock().unwrap();
        Metrics::disable();
        Metrics::reset();
        Metrics::record_parse(10, 0, Duration::from_millis(1));
        assert_eq!(Metrics::snapshot().files_processed, 0);
    }

    #[test]
    fn enabled_accumulates_and_reset_clears() {
        let _guard = TEST_LOCK.lock().unwrap();
        Metrics::reset();
        Metrics::enable();
        Metrics::record_parse(10, 2, Duration::from_millis(1));
        Metrics::record_parse(5, 0, Duration::from_millis(1));
        let snap = Metrics::snapshot();
        assert_eq!(snap.files_processed, 2);
        assert_eq!(snap.nodes_allocated_total, 15);
        assert_eq!(snap.parse_errors, 2);
        Metrics::reset();
        assert_eq!(Metrics::snapshot().files_processed, 0);
        Metrics::disable();
    }
}
