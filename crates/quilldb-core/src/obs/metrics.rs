use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for row-source executions.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub sources: BTreeMap<String, SourceCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Prepare phase
    pub prepare_calls: u64,
    pub driving_rows: u64,
    pub keys_materialized: u64,

    // Prepare-cursor phase
    pub slices_scanned: u64,
    pub candidates_examined: u64,
    pub rows_selected: u64,

    // Aborts
    pub cancellations: u64,
    pub storage_failures: u64,
}

///
/// SourceCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SourceCounters {
    pub prepare_calls: u64,
    pub keys_materialized: u64,
    pub slices_scanned: u64,
    pub candidates_examined: u64,
    pub rows_selected: u64,
    pub cancellations: u64,
    pub storage_failures: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since the last reset.
    pub counters: Option<EventState>,
    /// Per-source counters and averages.
    pub source_counters: Vec<SourceSummary>,
}

///
/// SourceSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub prepare_calls: u64,
    pub keys_materialized: u64,
    pub slices_scanned: u64,
    pub rows_selected: u64,
    pub avg_keys_per_prepare: f64,
    pub avg_candidates_per_slice: f64,
    pub avg_rows_per_slice: f64,
    pub cancellations: u64,
    pub storage_failures: u64,
}

/// Build a metrics report by inspecting in-memory counters only.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let ratio = |num: u64, den: u64| {
        if den > 0 {
            num as f64 / den as f64
        } else {
            0.0
        }
    };

    let mut source_counters: Vec<SourceSummary> = snap
        .sources
        .iter()
        .map(|(source, ops)| SourceSummary {
            source: source.clone(),
            prepare_calls: ops.prepare_calls,
            keys_materialized: ops.keys_materialized,
            slices_scanned: ops.slices_scanned,
            rows_selected: ops.rows_selected,
            avg_keys_per_prepare: ratio(ops.keys_materialized, ops.prepare_calls),
            avg_candidates_per_slice: ratio(ops.candidates_examined, ops.slices_scanned),
            avg_rows_per_slice: ratio(ops.rows_selected, ops.slices_scanned),
            cancellations: ops.cancellations,
            storage_failures: ops.storage_failures,
        })
        .collect();

    // Busiest sources first; ties by name for stable output.
    source_counters.sort_by(|a, b| {
        b.slices_scanned
            .cmp(&a.slices_scanned)
            .then_with(|| a.source.cmp(&b.source))
    });

    EventReport {
        counters: Some(snap),
        source_counters,
    }
}
