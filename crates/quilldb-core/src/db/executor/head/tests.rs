use crate::{
    RowId,
    db::{
        cancel::{CancellationSignal, CancellationToken, NeverCancelled},
        column::{ColumnData, FixedColumn},
        context::StorageContext,
        executor::{
            FnKey, IntHeadRowSource, RowCursor, RowSource, StrKey, SymKey, TextHeadRowSource,
            trace::{RowSourceTraceEvent, RowSourceTraceSink, TracePhase},
        },
        filter::{ColumnPredicate, CompareOp, FnFilter},
        index::{BucketIndex, int_bucket},
        partition::{Partition, PartitionBuilder, PartitionHandle, PartitionRow, PartitionSlice},
        record::{MemoryRecordSource, PartitionRecordSource, RecordSource},
        schema::{ColumnKind, ColumnModel, StoreMetadata},
        value::Value,
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::sink::{MetricsEvent, MetricsSink, with_metrics_sink},
    test_fixtures::{
        context_with, quotes_metadata, quotes_partition, trades_metadata, trades_partition,
    },
};
use proptest::prelude::*;
use serde_json::json;
use std::{
    borrow::Cow,
    cell::{Cell, RefCell},
    collections::HashSet,
    sync::Mutex,
};

const IDS: [i32; 10] = [1, 2, 1, 3, 2, 4, 1, 5, 3, 2];

fn int_keys(keys: &[i32]) -> Box<dyn RecordSource> {
    Box::new(MemoryRecordSource::column(
        "keys",
        keys.iter().copied().map(Value::Int),
    ))
}

fn str_keys(keys: &[&str]) -> Box<dyn RecordSource> {
    Box::new(MemoryRecordSource::column(
        "keys",
        keys.iter().map(|k| Value::str(*k)),
    ))
}

fn sym_keys(keys: &[&str]) -> Box<dyn RecordSource> {
    Box::new(MemoryRecordSource::column(
        "keys",
        keys.iter().map(|k| Value::symbol(*k)),
    ))
}

fn drain(cursor: &mut dyn RowCursor) -> Vec<RowId> {
    let mut out = Vec::new();
    while cursor.has_next() {
        if let Some(row) = cursor.next_row() {
            out.push(row);
        }
    }

    out
}

fn prepared_int(keys: &[i32], hint: u32) -> IntHeadRowSource {
    let mut source = IntHeadRowSource::new("id", int_keys(keys), 0);
    source.configure(&trades_metadata(hint)).unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    source
}

fn prepared_text(keys: &[&str], hint: u32) -> TextHeadRowSource<StrKey> {
    let mut source = TextHeadRowSource::new("sym", str_keys(keys), 0, StrKey);
    source
        .configure(&quotes_metadata(ColumnKind::Str, hint))
        .unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    source
}

fn scan(source: &mut dyn RowSource, slice: &PartitionSlice<'_>) -> Vec<RowId> {
    drain(source.prepare_cursor(slice).unwrap())
}

///
/// CancelAfter
/// Signal that stays clear for a fixed number of polls.
///

struct CancelAfter(Cell<usize>);

impl CancellationSignal for CancelAfter {
    fn is_cancelled(&self) -> bool {
        let left = self.0.get();
        if left == 0 {
            return true;
        }
        self.0.set(left - 1);

        false
    }
}

//
// INTEGER-KEYED
//

#[test]
fn int_source_selects_first_row_per_key() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = prepared_int(&[1, 2, 5], 7);

    let rows = scan(&mut source, &PartitionSlice::new(&handle, 0, 9));

    assert_eq!(rows, vec![0, 1, 7]);
}

#[test]
fn int_source_treats_slice_lo_and_hi_as_inclusive() {
    let ids = [10, 11, 12, 13, 14, 15];
    let handle = PartitionHandle::opened(trades_partition("p0", 15, &ids));
    let mut source = prepared_int(&ids, 15);

    // row 1 (lo - 1) and row 5 (hi + 1) fall outside
    assert_eq!(scan(&mut source, &PartitionSlice::new(&handle, 2, 4)), vec![2, 3, 4]);
    assert_eq!(scan(&mut source, &PartitionSlice::new(&handle, 3, 3)), vec![3]);
}

#[test]
fn open_ended_slice_runs_to_partition_size() {
    let ids = [10, 11, 12, 13, 14, 15];
    let handle = PartitionHandle::opened(trades_partition("p0", 15, &ids));
    let mut source = prepared_int(&ids, 15);

    let rows = scan(&mut source, &PartitionSlice::open_ended(&handle, 3));

    assert_eq!(rows, vec![3, 4, 5]);
}

#[test]
fn candidates_before_the_slice_do_not_stop_the_scan() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &[1, 1, 1, 1]));
    let mut source = prepared_int(&[1], 7);

    assert_eq!(scan(&mut source, &PartitionSlice::new(&handle, 2, 3)), vec![2]);
}

#[test]
fn bucket_neighbours_are_rejected_by_value() {
    // 9 & 7 == 1 & 7, so both rows share a bucket
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &[9, 1]));
    let mut source = prepared_int(&[1], 7);

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![1]);
}

#[test]
fn negative_keys_are_masked_not_reduced() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &[-1, -8, 3]));
    let mut source = prepared_int(&[-8, -1], 7);

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![0, 1]);
}

#[test]
fn absent_keys_select_nothing() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = prepared_int(&[42, 6], 7);

    let cursor = source
        .prepare_cursor(&PartitionSlice::full(&handle))
        .unwrap();

    assert!(!cursor.has_next());
    assert_eq!(cursor.next_row(), None);
}

#[test]
fn duplicate_driving_keys_collapse() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = prepared_int(&[2, 2, 1, 2, 1], 7);

    assert_eq!(source.keys().len(), 2);
    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![0, 1]);
}

#[test]
fn rejected_candidate_lets_the_scan_continue() {
    // price is row * 10
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &[1, 2, 1, 1]));
    let filter = FnFilter(|row: &PartitionRow<'_>| -> Result<bool, InternalError> {
        Ok(row.get_long(1)? >= 20)
    });
    let mut source =
        IntHeadRowSource::new("id", int_keys(&[1, 2]), 0).with_filter(Box::new(filter));
    source.configure(&trades_metadata(7)).unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![2]);
}

#[test]
fn column_predicate_binds_against_the_context() {
    let ctx = context_with(trades_metadata(7), Vec::new());
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let filter = ColumnPredicate::new("trades", "price", CompareOp::Ge, Value::Long(30));
    let mut source =
        IntHeadRowSource::new("id", int_keys(&[1, 2, 5]), 0).with_filter(Box::new(filter));
    source.configure(&trades_metadata(7)).unwrap();
    source.prepare(&ctx, &NeverCancelled).unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![4, 6, 7]);
}

#[test]
fn keys_can_come_from_a_partition_scan() {
    let ctx = context_with(trades_metadata(7), vec![trades_partition("k0", 7, &[5, 1, 5])]);
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = IntHeadRowSource::new("id", Box::new(PartitionRecordSource::new("trades")), 0);
    source.configure(&trades_metadata(7)).unwrap();
    source.prepare(&ctx, &NeverCancelled).unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![0, 7]);
}

#[test]
fn repeated_calls_give_identical_results() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let slice = PartitionSlice::new(&handle, 1, 8);
    let mut source = prepared_int(&[1, 2, 5], 7);

    let first = scan(&mut source, &slice);
    let second = scan(&mut source, &slice);
    source.reset();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();
    let third = scan(&mut source, &slice);

    assert_eq!(first, vec![1, 2, 7]);
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn each_slice_rebuilds_the_buffer() {
    let p0 = PartitionHandle::opened(trades_partition("p0", 7, &[1, 2]));
    let p1 = PartitionHandle::opened(trades_partition("p1", 7, &[3, 3, 1]));
    let mut source = prepared_int(&[1, 3], 7);

    let cursor = source.prepare_cursor(&PartitionSlice::full(&p0)).unwrap();
    assert_eq!(cursor.next_row(), Some(0));

    assert_eq!(scan(&mut source, &PartitionSlice::full(&p1)), vec![0, 2]);
}

#[test]
fn int_configure_rejects_unusable_columns() {
    let unknown = IntHeadRowSource::new("qty", int_keys(&[1]), 0).configure(&trades_metadata(7));
    let err = unknown.unwrap_err();
    assert_eq!((err.class, err.origin), (ErrorClass::Unsupported, ErrorOrigin::Query));

    let long = IntHeadRowSource::new("price", int_keys(&[1]), 0).configure(&trades_metadata(7));
    let err = long.unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("kind long"));

    let plain = StoreMetadata::new("trades", vec![ColumnModel::new("id", ColumnKind::Int)]);
    let err = IntHeadRowSource::new("id", int_keys(&[1]), 0)
        .configure(&plain)
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("requires an index"));
}

#[test]
fn lifecycle_out_of_order_is_an_executor_invariant() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = IntHeadRowSource::new("id", int_keys(&[1]), 0);

    let err = source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap_err();
    assert_eq!(
        (err.class, err.origin),
        (ErrorClass::InvariantViolation, ErrorOrigin::Executor)
    );

    source.configure(&trades_metadata(7)).unwrap();
    let Err(err) = source.prepare_cursor(&PartitionSlice::full(&handle)) else {
        panic!("prepare_cursor before prepare should fail");
    };
    assert_eq!(err.class, ErrorClass::InvariantViolation);
    assert!(err.message.contains("before a successful prepare"));
}

#[test]
fn raised_signal_aborts_prepare() {
    let token = CancellationToken::new();
    token.cancel();
    let mut source = IntHeadRowSource::new("id", int_keys(&[1, 2]), 0);
    source.configure(&trades_metadata(7)).unwrap();

    let err = source
        .prepare(&StorageContext::new(), &token)
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(!err.is_storage_failure());
    assert!(source.keys().is_empty());
}

#[test]
fn signal_raised_mid_prepare_discards_partial_keys() {
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let mut source = IntHeadRowSource::new("id", int_keys(&[1, 2, 3, 4, 5]), 0);
    source.configure(&trades_metadata(7)).unwrap();

    let err = source
        .prepare(&StorageContext::new(), &CancelAfter(Cell::new(2)))
        .unwrap_err();
    assert!(err.is_cancelled());
    assert!(source.keys().is_empty());

    // a cancelled execution cannot be scanned
    assert!(source.prepare_cursor(&PartitionSlice::full(&handle)).is_err());
}

#[test]
fn partition_open_failure_leaves_no_rows() {
    let good = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let broken = PartitionHandle::lazy(
        "p1",
        Box::new(|| Err::<Partition, _>(InternalError::store_internal("p1 is unreadable"))),
    );
    let mut source = prepared_int(&[1, 2], 7);

    assert!(source.prepare_cursor(&PartitionSlice::full(&good)).is_ok());
    let Err(err) = source.prepare_cursor(&PartitionSlice::full(&broken)) else {
        panic!("broken partition should fail the slice");
    };

    assert!(err.is_storage_failure());
    assert!(!source.has_next());
}

#[test]
fn missing_index_is_a_storage_failure() {
    let plain = StoreMetadata::new(
        "trades",
        vec![
            ColumnModel::new("id", ColumnKind::Int),
            ColumnModel::new("price", ColumnKind::Long),
        ],
    );
    let mut builder = PartitionBuilder::new("p0", &plain);
    builder.append(&[Value::Int(1), Value::Long(0)]).unwrap();
    let handle = PartitionHandle::opened(builder.build().unwrap());
    let mut source = prepared_int(&[1], 7);

    let Err(err) = source.prepare_cursor(&PartitionSlice::full(&handle)) else {
        panic!("unindexed partition should fail the slice");
    };

    assert!(err.is_storage_failure());
    assert_eq!(err.origin, ErrorOrigin::Store);
}

#[test]
fn lookup_must_bucket_like_the_writer() {
    // WARNING: the index below is populated with `key % hint` while lookups
    // mask with `key & hint`. Row 0 (key 7) lands in bucket 0 but is looked
    // up in bucket 7, so it is silently lost. Population and lookup must both
    // go through `db::index::bucket`.
    let hint = 7u32;
    let ids = [7, 3];
    let mut column = FixedColumn::int();
    let mut index = BucketIndex::new();
    for (row, id) in (0u64..).zip(ids) {
        column.push_int(id).unwrap();
        index.add(id.unsigned_abs() % hint, row);
    }
    let partition =
        Partition::from_parts("p0", vec![ColumnData::Fixed(column)], vec![Some(index)]).unwrap();
    let handle = PartitionHandle::opened(partition);
    let mut source = prepared_int(&ids, hint);

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![1]);
}

#[test]
fn head_row_follows_cursor_order_not_row_order() {
    let hint = 7u32;
    let mut column = FixedColumn::int();
    for id in [1, 9, 1] {
        column.push_int(id).unwrap();
    }
    // bucket 1 stores row 2 ahead of row 0
    let mut index = BucketIndex::new();
    index.add(int_bucket(1, hint), 2);
    index.add(int_bucket(1, hint), 0);
    index.add(int_bucket(9, hint), 1);
    let partition =
        Partition::from_parts("p0", vec![ColumnData::Fixed(column)], vec![Some(index)]).unwrap();
    let handle = PartitionHandle::opened(partition);
    let mut source = prepared_int(&[1], hint);

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![2]);
}

//
// TEXT-KEYED
//

#[test]
fn text_source_selects_first_row_per_key() {
    let handle =
        PartitionHandle::opened(quotes_partition("p0", ColumnKind::Str, 4, &["a", "c", "b", "a"]));
    let mut source = prepared_text(&["a", "b"], 4);

    assert_eq!(scan(&mut source, &PartitionSlice::new(&handle, 0, 3)), vec![0, 2]);
}

#[test]
fn symbol_columns_read_through_sym_key() {
    let handle = PartitionHandle::opened(quotes_partition(
        "p0",
        ColumnKind::Symbol,
        4,
        &["x", "y", "x", "z"],
    ));
    let mut source = TextHeadRowSource::new("sym", sym_keys(&["z", "x"]), 0, SymKey);
    source
        .configure(&quotes_metadata(ColumnKind::Symbol, 4))
        .unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![0, 3]);
}

#[test]
fn extractor_must_match_the_record_representation() {
    let mut source = TextHeadRowSource::new("sym", sym_keys(&["x"]), 0, StrKey);
    source
        .configure(&quotes_metadata(ColumnKind::Str, 4))
        .unwrap();

    let err = source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(source.keys().is_empty());
}

#[test]
fn closure_extractor_derives_keys() {
    let handle = PartitionHandle::opened(quotes_partition(
        "p0",
        ColumnKind::Str,
        8,
        &["s2", "s1", "s2", "s1"],
    ));
    let extractor = FnKey::new("long_tag", |record, column| {
        Ok(Cow::Owned(format!("s{}", record.get_long(column)?)))
    });
    let keys = MemoryRecordSource::column("keys", [Value::Long(1), Value::Long(3)]);
    let mut source = TextHeadRowSource::new("sym", Box::new(keys), 0, extractor);
    source
        .configure(&quotes_metadata(ColumnKind::Str, 8))
        .unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::full(&handle)), vec![1]);
}

#[test]
fn text_keys_are_deduplicated_with_aligned_buckets() {
    let source = prepared_text(&["a", "b", "a", "a"], 4);

    let keys: Vec<&str> = source.keys().iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["a", "b"]);
    for (key, bucket) in source.keys().iter() {
        assert_eq!(bucket, crate::db::index::text_bucket(key, 4));
    }
}

#[test]
fn text_filter_and_range_apply_per_candidate() {
    // size is the row id
    let handle = PartitionHandle::opened(quotes_partition(
        "p0",
        ColumnKind::Str,
        2,
        &["a", "b", "a", "b", "a"],
    ));
    let filter = FnFilter(|row: &PartitionRow<'_>| -> Result<bool, InternalError> {
        Ok(row.get_int(1)? != 2)
    });
    let mut source =
        TextHeadRowSource::new("sym", str_keys(&["a", "b"]), 0, StrKey)
            .with_filter(Box::new(filter));
    source
        .configure(&quotes_metadata(ColumnKind::Str, 2))
        .unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();

    assert_eq!(scan(&mut source, &PartitionSlice::new(&handle, 1, 4)), vec![1, 4]);
}

#[test]
fn text_configure_rejects_unusable_columns() {
    let err = TextHeadRowSource::new("size", str_keys(&["a"]), 0, StrKey)
        .configure(&quotes_metadata(ColumnKind::Str, 4))
        .unwrap_err();
    assert!(err.message.contains("kind int"));

    let err = TextHeadRowSource::new("sym", str_keys(&["a"]), 0, StrKey)
        .configure(&quotes_metadata(ColumnKind::Str, 0))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Unsupported);
    assert!(err.message.contains("distinct_count_hint 0"));

    let err = IntHeadRowSource::new("sym", int_keys(&[1]), 0)
        .configure(&quotes_metadata(ColumnKind::Symbol, 4))
        .unwrap_err();
    assert!(err.message.contains("kind symbol"));
}

//
// EXPLAIN / INSTRUMENTATION
//

#[test]
fn explain_reports_operator_column_and_source() {
    let int = IntHeadRowSource::new("id", int_keys(&[1, 2]), 0).explain();
    assert_eq!(
        int.to_json(),
        json!({
            "op": "IntHeadRowSource",
            "column": "id",
            "src": { "op": "MemoryRecordSource", "name": "keys", "rows": 2 },
        })
    );

    let text = TextHeadRowSource::new("sym", sym_keys(&["a"]), 0, SymKey).explain();
    assert_eq!(text.op, "TextHeadRowSource");
    assert_eq!(text.to_json()["extractor"], json!("sym"));
    assert_eq!(serde_json::to_value(&text).unwrap(), text.to_json());
}

static TRACE_EVENTS: Mutex<Vec<RowSourceTraceEvent>> = Mutex::new(Vec::new());
static TEST_TRACE_SINK: TestTraceSink = TestTraceSink;

///
/// TestTraceSink
///

struct TestTraceSink;

impl RowSourceTraceSink for TestTraceSink {
    fn on_event(&self, event: RowSourceTraceEvent) {
        TRACE_EVENTS
            .lock()
            .expect("trace event lock should succeed")
            .push(event);
    }
}

#[test]
fn trace_sink_sees_each_phase() {
    let good = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let broken = PartitionHandle::lazy(
        "p1",
        Box::new(|| Err::<Partition, _>(InternalError::store_internal("p1 is unreadable"))),
    );
    let mut source = IntHeadRowSource::new("id", int_keys(&[1, 2, 2]), 0)
        .with_trace(&TEST_TRACE_SINK)
        .with_debug(true);
    source.configure(&trades_metadata(7)).unwrap();
    source
        .prepare(&StorageContext::new(), &NeverCancelled)
        .unwrap();
    let rows = scan(&mut source, &PartitionSlice::new(&good, 0, 9));
    assert!(source.prepare_cursor(&PartitionSlice::full(&broken)).is_err());

    let events = TRACE_EVENTS
        .lock()
        .expect("trace event lock should succeed")
        .clone();
    assert_eq!(
        events,
        vec![
            RowSourceTraceEvent::Prepared {
                op: IntHeadRowSource::OP,
                driving_rows: 3,
                keys: 2,
            },
            RowSourceTraceEvent::SliceScanned {
                op: IntHeadRowSource::OP,
                lo: -1,
                hi: 10,
                candidates: 2,
                rows: rows.len() as u64,
            },
            RowSourceTraceEvent::Error {
                op: IntHeadRowSource::OP,
                phase: TracePhase::PrepareCursor,
                class: ErrorClass::Internal,
                origin: ErrorOrigin::Store,
            },
        ]
    );
}

///
/// CollectingSink
///

#[derive(Default)]
struct CollectingSink(RefCell<Vec<MetricsEvent>>);

impl MetricsSink for CollectingSink {
    fn record(&self, event: MetricsEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn metrics_count_keys_candidates_and_aborts() {
    let sink = CollectingSink::default();
    let handle = PartitionHandle::opened(trades_partition("p0", 7, &IDS));
    let token = CancellationToken::new();

    with_metrics_sink(&sink, || {
        let mut source = prepared_int(&[5, 5, 2], 7);
        scan(&mut source, &PartitionSlice::new(&handle, 2, 9));

        token.cancel();
        assert!(source.prepare(&StorageContext::new(), &token).is_err());
    });

    let events = sink.0.into_inner();
    assert_eq!(
        events,
        vec![
            MetricsEvent::Prepare {
                source: IntHeadRowSource::OP,
                driving_rows: 3,
                keys: 2,
            },
            // key 5: row 7; key 2: rows 1 (out of range), 4
            MetricsEvent::SliceScan {
                source: IntHeadRowSource::OP,
                candidates: 3,
                rows_selected: 2,
            },
            MetricsEvent::Cancelled {
                source: IntHeadRowSource::OP,
            },
        ]
    );
}

//
// PROPERTIES
//

fn brute_force(values: &[i32], keys: &[i32], lo: u64, hi_exclusive: u64) -> Vec<RowId> {
    let end = hi_exclusive.min(values.len() as u64);
    let mut rows: Vec<RowId> = keys
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter_map(|key| (lo..end).find(|&row| values[row as usize] == *key))
        .collect();
    rows.sort_unstable();

    rows
}

fn arb_mask_hint() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(1), Just(3), Just(7), Just(15)]
}

proptest! {
    #[test]
    fn int_rows_equal_first_occurrence_per_key(
        ids in prop::collection::vec(-8i32..8, 0..40),
        keys in prop::collection::vec(-8i32..8, 0..6),
        hint in arb_mask_hint(),
        lo in 0u64..45,
        span in 0u64..45,
        calc_hi in any::<bool>(),
    ) {
        let handle = PartitionHandle::opened(trades_partition("p0", hint, &ids));
        let (slice, hi_exclusive) = if calc_hi {
            (PartitionSlice::open_ended(&handle, lo), ids.len() as u64)
        } else {
            (PartitionSlice::new(&handle, lo, lo + span), lo + span + 1)
        };
        let mut source = prepared_int(&keys, hint);

        let rows = scan(&mut source, &slice);

        prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(rows.len() <= keys.iter().collect::<HashSet<_>>().len());
        prop_assert_eq!(rows, brute_force(&ids, &keys, lo, hi_exclusive));
    }

    #[test]
    fn text_rows_equal_first_occurrence_per_key(
        syms in prop::collection::vec(0usize..5, 0..30),
        keys in prop::collection::vec(0usize..5, 0..5),
        hint in 1u32..6,
        lo in 0u64..32,
        span in 0u64..32,
    ) {
        const ALPHABET: [&str; 5] = ["a", "b", "c", "dd", "ünï"];
        let sym_text: Vec<&str> = syms.iter().map(|i| ALPHABET[*i]).collect();
        let key_text: Vec<&str> = keys.iter().map(|i| ALPHABET[*i]).collect();
        let handle =
            PartitionHandle::opened(quotes_partition("p0", ColumnKind::Str, hint, &sym_text));
        let mut source = prepared_text(&key_text, hint);

        let rows = scan(&mut source, &PartitionSlice::new(&handle, lo, lo + span));

        let as_ids = |idx: &[usize]| {
            idx.iter()
                .map(|i| i32::try_from(*i).unwrap())
                .collect::<Vec<_>>()
        };
        prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(rows, brute_force(&as_ids(&syms), &as_ids(&keys), lo, lo + span + 1));
    }
}
