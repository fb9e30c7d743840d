use crate::db::column::{ColumnError, FixedColumn, VariableColumn};

#[test]
fn fixed_int_column_reads_back_by_row_id() {
    let mut col = FixedColumn::int();
    for value in [7, -3, i32::MAX] {
        col.push_int(value).expect("push int");
    }

    assert_eq!(col.len(), 3);
    assert_eq!(col.get_int(0).unwrap(), 7);
    assert_eq!(col.get_int(1).unwrap(), -3);
    assert_eq!(col.get_int(2).unwrap(), i32::MAX);
}

#[test]
fn fixed_column_rejects_row_past_end() {
    let mut col = FixedColumn::int();
    col.push_int(1).unwrap();

    let err = col.get_int(1).unwrap_err();
    assert!(matches!(err, ColumnError::RowOutOfRange { row: 1, len: 1 }));
}

#[test]
fn fixed_column_rejects_width_mismatch() {
    let mut col = FixedColumn::long();
    col.push_long(42).unwrap();

    assert_eq!(col.get_long(0).unwrap(), 42);
    assert!(matches!(
        col.get_int(0),
        Err(ColumnError::WidthMismatch {
            expected: 4,
            found: 8
        })
    ));
    assert!(col.push_int(1).is_err());
}

#[test]
fn fixed_column_from_ragged_bytes_is_rejected() {
    let err = FixedColumn::from_bytes(4, vec![0u8; 6]).unwrap_err();

    assert!(matches!(err, ColumnError::RaggedBuffer { len: 6, width: 4 }));
}

#[test]
fn fixed_column_from_bytes_is_little_endian() {
    let col = FixedColumn::from_bytes(4, vec![1, 0, 0, 0, 0, 1, 0, 0]).unwrap();

    assert_eq!(col.get_int(0).unwrap(), 1);
    assert_eq!(col.get_int(1).unwrap(), 256);
}

#[test]
fn flyweight_reads_each_row_by_content() {
    let mut col = VariableColumn::new();
    for value in ["a", "", "ünïcödé", "tail"] {
        col.push_str(value);
    }

    let mut view = col.flyweight();
    assert_eq!(view.get_str(0).unwrap(), "a");
    assert_eq!(view.get_str(1).unwrap(), "");
    assert_eq!(view.get_str(2).unwrap(), "ünïcödé");
    assert_eq!(view.get_str(3).unwrap(), "tail");
    assert!(matches!(
        view.get_str(4),
        Err(ColumnError::RowOutOfRange { row: 4, len: 4 })
    ));
}

#[test]
fn flyweight_reports_invalid_utf8_as_corruption() {
    let col = VariableColumn::from_parts(vec![0, 2], vec![0xff, 0xfe]);

    let err = col.flyweight().get_str(0).unwrap_err();
    assert!(matches!(err, ColumnError::InvalidUtf8 { row: 0 }));

    let err: crate::error::InternalError = err.into();
    assert!(err.is_storage_failure());
}

#[test]
fn flyweight_reports_offsets_past_data() {
    let col = VariableColumn::from_parts(vec![0, 8], b"abc".to_vec());

    assert!(matches!(
        col.flyweight().get_str(0),
        Err(ColumnError::BrokenOffsets { row: 0 })
    ));
}
