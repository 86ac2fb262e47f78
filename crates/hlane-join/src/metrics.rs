//! Process-wide join gauges.
//!
//! Counters accumulate across every operator in the process; tests that
//! need exact values use the per-operator [`ProbeStats`] instead and
//! treat these as monotone.
//!
//! [`ProbeStats`]: crate::probe::ProbeStats

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static HLANE_BUILD_ROWS_TOTAL: AtomicU64 = AtomicU64::new(0);
static HLANE_PROBE_ROWS_TOTAL: AtomicU64 = AtomicU64::new(0);
static HLANE_PREFILTER_REJECTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static HLANE_OUTPUT_ROWS_TOTAL: AtomicU64 = AtomicU64::new(0);
static HLANE_OUTPUT_BATCHES_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Point-in-time snapshot of the join gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinMetricsSnapshot {
    /// Build rows appended to slab storage.
    pub hlane_build_rows_total: u64,
    /// Probe rows pushed (before null and pre-filter elimination).
    pub hlane_probe_rows_total: u64,
    /// Probe candidates eliminated by the pre-filter.
    pub hlane_prefilter_rejects_total: u64,
    /// Output rows emitted across all batches.
    pub hlane_output_rows_total: u64,
    /// Output batches emitted.
    pub hlane_output_batches_total: u64,
}

/// Read all join gauges.
#[must_use]
pub fn join_metrics_snapshot() -> JoinMetricsSnapshot {
    JoinMetricsSnapshot {
        hlane_build_rows_total: HLANE_BUILD_ROWS_TOTAL.load(AtomicOrdering::Relaxed),
        hlane_probe_rows_total: HLANE_PROBE_ROWS_TOTAL.load(AtomicOrdering::Relaxed),
        hlane_prefilter_rejects_total: HLANE_PREFILTER_REJECTS_TOTAL.load(AtomicOrdering::Relaxed),
        hlane_output_rows_total: HLANE_OUTPUT_ROWS_TOTAL.load(AtomicOrdering::Relaxed),
        hlane_output_batches_total: HLANE_OUTPUT_BATCHES_TOTAL.load(AtomicOrdering::Relaxed),
    }
}

/// Reset all join gauges (tests/diagnostics).
pub fn reset_join_metrics() {
    HLANE_BUILD_ROWS_TOTAL.store(0, AtomicOrdering::Relaxed);
    HLANE_PROBE_ROWS_TOTAL.store(0, AtomicOrdering::Relaxed);
    HLANE_PREFILTER_REJECTS_TOTAL.store(0, AtomicOrdering::Relaxed);
    HLANE_OUTPUT_ROWS_TOTAL.store(0, AtomicOrdering::Relaxed);
    HLANE_OUTPUT_BATCHES_TOTAL.store(0, AtomicOrdering::Relaxed);
}

pub(crate) fn record_build_rows(rows: u64) {
    HLANE_BUILD_ROWS_TOTAL.fetch_add(rows, AtomicOrdering::Relaxed);
}

pub(crate) fn record_probe_rows(rows: u64) {
    HLANE_PROBE_ROWS_TOTAL.fetch_add(rows, AtomicOrdering::Relaxed);
}

pub(crate) fn record_prefilter_rejects(rows: u64) {
    HLANE_PREFILTER_REJECTS_TOTAL.fetch_add(rows, AtomicOrdering::Relaxed);
}

pub(crate) fn record_output_batch(rows: u64) {
    HLANE_OUTPUT_ROWS_TOTAL.fetch_add(rows, AtomicOrdering::Relaxed);
    HLANE_OUTPUT_BATCHES_TOTAL.fetch_add(1, AtomicOrdering::Relaxed);
}
