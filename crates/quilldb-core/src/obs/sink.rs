//! Metrics sink boundary.
//!
//! Row sources MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between execution logic
//! and the thread-local metrics state.
use crate::obs::metrics::{self, SourceCounters};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Prepare {
        source: &'static str,
        driving_rows: u64,
        keys: u64,
    },
    SliceScan {
        source: &'static str,
        candidates: u64,
        rows_selected: u64,
    },
    Cancelled {
        source: &'static str,
    },
    StorageFailure {
        source: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl GlobalMetricsSink {
    fn source_entry<'a>(
        sources: &'a mut std::collections::BTreeMap<String, SourceCounters>,
        source: &str,
    ) -> &'a mut SourceCounters {
        sources.entry(source.to_string()).or_default()
    }
}

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Prepare {
                source,
                driving_rows,
                keys,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.prepare_calls = m.ops.prepare_calls.saturating_add(1);
                    m.ops.driving_rows = m.ops.driving_rows.saturating_add(driving_rows);
                    m.ops.keys_materialized = m.ops.keys_materialized.saturating_add(keys);

                    let entry = Self::source_entry(&mut m.sources, source);
                    entry.prepare_calls = entry.prepare_calls.saturating_add(1);
                    entry.keys_materialized = entry.keys_materialized.saturating_add(keys);
                });
            }

            MetricsEvent::SliceScan {
                source,
                candidates,
                rows_selected,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.slices_scanned = m.ops.slices_scanned.saturating_add(1);
                    m.ops.candidates_examined =
                        m.ops.candidates_examined.saturating_add(candidates);
                    m.ops.rows_selected = m.ops.rows_selected.saturating_add(rows_selected);

                    let entry = Self::source_entry(&mut m.sources, source);
                    entry.slices_scanned = entry.slices_scanned.saturating_add(1);
                    entry.candidates_examined =
                        entry.candidates_examined.saturating_add(candidates);
                    entry.rows_selected = entry.rows_selected.saturating_add(rows_selected);
                });
            }

            MetricsEvent::Cancelled { source } => {
                metrics::with_state_mut(|m| {
                    m.ops.cancellations = m.ops.cancellations.saturating_add(1);
                    let entry = Self::source_entry(&mut m.sources, source);
                    entry.cancellations = entry.cancellations.saturating_add(1);
                });
            }

            MetricsEvent::StorageFailure { source } => {
                metrics::with_state_mut(|m| {
                    m.ops.storage_failures = m.ops.storage_failures.saturating_add(1);
                    let entry = Self::source_entry(&mut m.sources, source);
                    entry.storage_failures = entry.storage_failures.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a live `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The erased pointer is installed only for this dynamic scope and
    //   `Guard` restores the previous slot on all exits.
    // - `record` dereferences it synchronously and never persists it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
