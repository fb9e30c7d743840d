//! Row-source tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect execution semantics.

use crate::error::{ErrorClass, ErrorOrigin, InternalError};

///
/// RowSourceTraceSink
///

pub trait RowSourceTraceSink: Send + Sync {
    fn on_event(&self, event: RowSourceTraceEvent);
}

///
/// TracePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Prepare,
    PrepareCursor,
}

///
/// RowSourceTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowSourceTraceEvent {
    Prepared {
        op: &'static str,
        driving_rows: u64,
        keys: u64,
    },
    SliceScanned {
        op: &'static str,
        lo: i64,
        hi: i64,
        candidates: u64,
        rows: u64,
    },
    Error {
        op: &'static str,
        phase: TracePhase,
        class: ErrorClass,
        origin: ErrorOrigin,
    },
}

impl RowSourceTraceEvent {
    pub(crate) const fn error(op: &'static str, phase: TracePhase, err: &InternalError) -> Self {
        Self::Error {
            op,
            phase,
            class: err.class,
            origin: err.origin,
        }
    }
}
