//! Tests for the records module

use std::sync::Arc;

use super::*;
use crate::config::{CodecConfig, FORMAT_VERSION};
use crate::error::CodecError;
use crate::schema::{ColumnDef, Schema};
use crate::types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor, Value};

fn codec_err(err: &eyre::Report) -> &CodecError {
    err.downcast_ref::<CodecError>()
        .unwrap_or_else(|| panic!("not a codec error: {:?}", err))
}

fn id_name_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("id", TypeDescriptor::int32()),
        ColumnDef::new("name", TypeDescriptor::string().nullable()),
    ])
    .unwrap()
}

fn point_schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(vec![
            ColumnDef::new("x", TypeDescriptor::int32()),
            ColumnDef::new("label", TypeDescriptor::string().nullable()),
        ])
        .unwrap(),
    )
}

/// One column of every shape, nested ones included.
fn wide_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("flag", TypeDescriptor::bool()),
        ColumnDef::new("small", TypeDescriptor::int16()),
        ColumnDef::new("big", TypeDescriptor::int64().nullable()),
        ColumnDef::new("ratio", TypeDescriptor::double()),
        ColumnDef::new("name", TypeDescriptor::string()),
        ColumnDef::new(
            "tags",
            TypeDescriptor::list(TypeDescriptor::string().nullable()),
        ),
        ColumnDef::new(
            "pair",
            TypeDescriptor::tuple(vec![TypeDescriptor::int32(), TypeDescriptor::string()]),
        ),
        ColumnDef::new("point", TypeDescriptor::row(point_schema())),
        ColumnDef::new("handle", TypeDescriptor::opaque(8)),
        ColumnDef::new("day", TypeDescriptor::date().nullable()),
    ])
    .unwrap()
}

fn wide_values() -> Vec<Value<'static>> {
    vec![
        Value::Bool(true),
        Value::Int16(-3),
        Value::Null,
        Value::Double(2.5),
        Value::from("hello"),
        Value::List(vec![Value::from("a"), Value::Null, Value::from("ccc")]),
        Value::Tuple(vec![Value::Int32(9), Value::from("nine")]),
        Value::Row(vec![Value::Int32(-1), Value::from("origin")]),
        Value::opaque(&[1, 2, 3, 4, 5, 6, 7, 8]),
        Value::Date(Date::new(2024, 2, 29).unwrap()),
    ]
}

#[test]
fn id_and_name_encode_to_expected_bytes() {
    let schema = id_name_schema();
    let bytes = encode_row(&schema, &[Value::Int32(1), Value::from("ab")]).unwrap();

    assert_eq!(
        bytes,
        vec![
            20, 0, 0, 0, // total_len
            FORMAT_VERSION,
            0b0000_0000, // null bitmap
            1, 0, 0, 0, // id
            18, 0, 0, 0, 2, 0, 0, 0, // name (offset, length)
            b'a', b'b',
        ]
    );

    let view = RowView::new(&bytes, &schema).unwrap();
    assert_eq!(view.get::<i32>(0).unwrap(), Nullable::Value(1));
    assert_eq!(view.get::<&str>(1).unwrap(), Nullable::Value("ab"));
    assert!(!view.is_null(1));
}

#[test]
fn null_name_sets_bitmap_and_zero_fills_slot() {
    let schema = id_name_schema();
    let bytes = encode_row(&schema, &[Value::Int32(2), Value::Null]).unwrap();

    assert_eq!(bytes.len(), 18);
    assert_eq!(bytes[5], 0b0000_0010);
    assert!(bytes[10..18].iter().all(|b| *b == 0));

    let view = RowView::new(&bytes, &schema).unwrap();
    assert_eq!(view.get::<i32>(0).unwrap(), Nullable::Value(2));
    assert!(view.is_null(1));
    assert_eq!(view.get::<StringRef>(1).unwrap(), Nullable::Null);
}

#[test]
fn null_column_ignores_garbage_in_its_slot() {
    let schema = id_name_schema();
    let mut bytes = encode_row(&schema, &[Value::Int32(2), Value::Null]).unwrap();
    bytes[10..18].copy_from_slice(&[0xFF; 8]);

    let view = RowView::new(&bytes, &schema).unwrap();
    assert!(view.is_null(1));
    assert_eq!(view.get::<&str>(1).unwrap(), Nullable::Null);
    assert_eq!(view.get_value(1).unwrap(), Value::Null);
}

#[test]
fn wide_schema_round_trips() {
    let schema = wide_schema();
    let values = wide_values();
    let bytes = encode_row(&schema, &values).unwrap();

    let view = RowView::new(&bytes, &schema).unwrap();
    assert_eq!(view.values().unwrap(), values);
}

#[test]
fn encoding_is_deterministic() {
    let schema = wide_schema();
    let a = encode_row(&schema, &wide_values()).unwrap();
    let b = encode_row(&schema, &wide_values()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_strict_prefix_is_truncated() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();

    for len in 0..bytes.len() {
        let err = RowView::new(&bytes[..len], &schema).unwrap_err();
        assert!(
            matches!(codec_err(&err), CodecError::Truncated { .. }),
            "prefix of {} bytes: {:?}",
            len,
            err
        );
    }
}

#[test]
fn bytes_past_declared_length_are_ignored() {
    let schema = id_name_schema();
    let mut bytes = encode_row(&schema, &[Value::Int32(5), Value::from("xy")]).unwrap();
    let len = bytes.len();
    bytes.extend_from_slice(&[0xAA; 16]);

    let view = RowView::new(&bytes, &schema).unwrap();
    assert_eq!(view.data().len(), len);
    assert_eq!(view.get::<&str>(1).unwrap(), Nullable::Value("xy"));
}

#[test]
fn unknown_version_is_rejected() {
    let schema = id_name_schema();
    let mut bytes = encode_row(&schema, &[Value::Int32(1), Value::Null]).unwrap();
    bytes[4] = 9;

    let err = RowView::new(&bytes, &schema).unwrap_err();
    assert_eq!(
        codec_err(&err),
        &CodecError::VersionMismatch {
            found: 9,
            expected: FORMAT_VERSION
        }
    );
}

#[test]
fn declared_length_below_fixed_area_is_truncated() {
    let schema = id_name_schema();
    let mut bytes = encode_row(&schema, &[Value::Int32(1), Value::Null]).unwrap();
    bytes[0] = 10;

    let err = RowView::new(&bytes, &schema).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
}

#[test]
fn out_of_bounds_offset_fails_at_decode() {
    let schema = id_name_schema();
    let mut bytes = encode_row(&schema, &[Value::Int32(1), Value::from("ab")]).unwrap();
    bytes[14] = 3;

    let err = RowView::new(&bytes, &schema).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
    assert!(format!("{:#}", err).contains("name"));
}

#[test]
fn corrupt_list_element_fails_at_decode() {
    let schema = Schema::new(vec![ColumnDef::new(
        "tags",
        TypeDescriptor::list(TypeDescriptor::string()),
    )])
    .unwrap();
    let mut bytes =
        encode_row(&schema, &[Value::List(vec![Value::from("a"), Value::from("b")])]).unwrap();

    // list payload starts at 14: count(4) bitmap(1) slots(2 * 8)
    let second_len = 14 + 4 + 1 + 8 + 4;
    bytes[second_len] = 200;

    let err = RowView::new(&bytes, &schema).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
}

#[test]
fn typed_get_checks_declared_type() {
    let schema = id_name_schema();
    let bytes = encode_row(&schema, &[Value::Int32(1), Value::Null]).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let err = view.get::<i64>(0).unwrap_err();
    assert_eq!(
        codec_err(&err),
        &CodecError::TypeMismatch {
            index: 0,
            declared: "int32".to_string(),
            requested: "int64",
        }
    );

    // a null column still reports a mismatch
    let err = view.get::<i32>(1).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::TypeMismatch { .. }));
}

#[test]
fn get_past_last_column_is_out_of_bounds() {
    let schema = id_name_schema();
    let bytes = encode_row(&schema, &[Value::Int32(1), Value::Null]).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let err = view.get::<i32>(2).unwrap_err();
    assert_eq!(
        codec_err(&err),
        &CodecError::IndexOutOfBounds { index: 2, len: 2 }
    );
    assert!(!view.is_null(7));
}

#[test]
fn string_reads_borrow_from_slice() {
    let schema = id_name_schema();
    let bytes = encode_row(&schema, &[Value::Int32(1), Value::from("zero-copy")]).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let name = view.get::<StringRef>(1).unwrap().into_option().unwrap();
    let range = bytes.as_ptr_range();
    assert!(range.contains(&name.as_bytes().as_ptr()));
}

#[test]
fn scalars_round_trip_through_typed_getters() {
    let schema = Schema::from_types([
        TypeDescriptor::bool(),
        TypeDescriptor::int16(),
        TypeDescriptor::int32(),
        TypeDescriptor::int64(),
        TypeDescriptor::float(),
        TypeDescriptor::double(),
        TypeDescriptor::timestamp(),
        TypeDescriptor::date(),
    ])
    .unwrap();
    let date = Date::new(1999, 12, 31).unwrap();
    let bytes = encode_row(
        &schema,
        &[
            Value::Bool(false),
            Value::Int16(i16::MIN),
            Value::Int32(i32::MAX),
            Value::Int64(-1),
            Value::Float(1.25),
            Value::Double(f64::MIN_POSITIVE),
            Value::Timestamp(Timestamp::from_millis(-86_400_000)),
            Value::Date(date),
        ],
    )
    .unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    assert_eq!(view.get::<bool>(0).unwrap(), Nullable::Value(false));
    assert_eq!(view.get::<i16>(1).unwrap(), Nullable::Value(i16::MIN));
    assert_eq!(view.get::<i32>(2).unwrap(), Nullable::Value(i32::MAX));
    assert_eq!(view.get::<i64>(3).unwrap(), Nullable::Value(-1));
    assert_eq!(view.get::<f32>(4).unwrap(), Nullable::Value(1.25));
    assert_eq!(view.get::<f64>(5).unwrap(), Nullable::Value(f64::MIN_POSITIVE));
    assert_eq!(
        view.get::<Timestamp>(6).unwrap(),
        Nullable::Value(Timestamp::from_millis(-86_400_000))
    );
    assert_eq!(view.get::<Date>(7).unwrap(), Nullable::Value(date));
}

#[test]
fn list_view_reads_elements_and_nulls() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let tags = view.get::<ListView>(5).unwrap().into_option().unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags.get::<&str>(0).unwrap(), Nullable::Value("a"));
    assert!(tags.is_null(1));
    assert_eq!(tags.get::<&str>(1).unwrap(), Nullable::Null);
    assert_eq!(tags.get::<&str>(2).unwrap(), Nullable::Value("ccc"));
    assert!(matches!(
        codec_err(&tags.get::<&str>(3).unwrap_err()),
        CodecError::IndexOutOfBounds { index: 3, len: 3 }
    ));
    assert!(matches!(
        codec_err(&tags.get::<i32>(0).unwrap_err()),
        CodecError::TypeMismatch { .. }
    ));
    assert_eq!(tags.iter().filter(|v| matches!(v, Ok(Value::Null))).count(), 1);
}

#[test]
fn empty_list_round_trips() {
    let schema = Schema::new(vec![ColumnDef::new(
        "xs",
        TypeDescriptor::list(TypeDescriptor::int64()),
    )])
    .unwrap();
    let bytes = encode_row(&schema, &[Value::List(vec![])]).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let xs = view.get::<ListView>(0).unwrap().into_option().unwrap();
    assert!(xs.is_empty());
    assert!(xs.values().unwrap().is_empty());
}

#[test]
fn fixed_tuple_is_stored_inline() {
    let pair = TypeDescriptor::tuple(vec![
        TypeDescriptor::int32(),
        TypeDescriptor::double().nullable(),
    ]);
    let schema = Schema::new(vec![ColumnDef::new("pair", pair)]).unwrap();
    assert_eq!(schema.fixed_area_size(), 1 + 4 + 8);

    let bytes = encode_row(&schema, &[Value::Tuple(vec![Value::Int32(3), Value::Null])]).unwrap();
    assert_eq!(bytes.len(), schema.min_slice_len());

    let view = RowView::new(&bytes, &schema).unwrap();
    let tuple = view.get::<TupleView>(0).unwrap().into_option().unwrap();
    assert_eq!(tuple.arity(), 2);
    assert_eq!(tuple.get::<i32>(0).unwrap(), Nullable::Value(3));
    assert!(tuple.is_null(1));
    assert_eq!(tuple.get::<f64>(1).unwrap(), Nullable::Null);
}

#[test]
fn variable_tuple_reads_through_mini_section() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let pair = view.get::<TupleView>(6).unwrap().into_option().unwrap();
    assert_eq!(pair.get::<i32>(0).unwrap(), Nullable::Value(9));
    assert_eq!(pair.get::<&str>(1).unwrap(), Nullable::Value("nine"));
    assert!(matches!(
        codec_err(&pair.get::<i32>(2).unwrap_err()),
        CodecError::IndexOutOfBounds { .. }
    ));
}

#[test]
fn nested_row_reads_as_row_view() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    let point = view.get::<RowView>(7).unwrap().into_option().unwrap();
    assert_eq!(point.schema().column_count(), 2);
    assert_eq!(point.get::<i32>(0).unwrap(), Nullable::Value(-1));
    assert_eq!(point.get::<&str>(1).unwrap(), Nullable::Value("origin"));
}

#[test]
fn opaque_reads_as_bytes() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();
    let view = RowView::new(&bytes, &schema).unwrap();

    assert_eq!(
        view.get::<&[u8]>(8).unwrap(),
        Nullable::Value(&[1u8, 2, 3, 4, 5, 6, 7, 8][..])
    );
}

#[test]
fn encode_rejects_wrong_value_count() {
    let schema = id_name_schema();
    let err = encode_row(&schema, &[Value::Int32(1)]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
}

#[test]
fn encode_rejects_null_for_non_nullable() {
    let schema = id_name_schema();
    let err = encode_row(&schema, &[Value::Null, Value::Null]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
    assert!(format!("{:#}", err).contains("id"));
}

#[test]
fn encode_rejects_null_list_element_when_not_nullable() {
    let schema = Schema::new(vec![ColumnDef::new(
        "xs",
        TypeDescriptor::list(TypeDescriptor::int32()),
    )])
    .unwrap();
    let err = encode_row(&schema, &[Value::List(vec![Value::Int32(1), Value::Null])]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
    assert!(format!("{:#}", err).contains("element 1"));
}

#[test]
fn encode_rejects_variant_mismatch() {
    let schema = id_name_schema();
    let err = encode_row(&schema, &[Value::Int64(1), Value::Null]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
}

#[test]
fn encode_rejects_wrong_opaque_length() {
    let schema = Schema::from_types([TypeDescriptor::opaque(4)]).unwrap();
    let err = encode_row(&schema, &[Value::opaque(&[1, 2, 3])]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
}

#[test]
fn encode_rejects_tuple_arity_mismatch() {
    let schema = Schema::from_types([TypeDescriptor::tuple(vec![
        TypeDescriptor::int32(),
        TypeDescriptor::int32(),
    ])])
    .unwrap();
    let err = encode_row(&schema, &[Value::Tuple(vec![Value::Int32(1)])]).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
}

#[test]
fn encode_respects_configured_slice_limit() {
    let schema = id_name_schema();
    let config = CodecConfig::new().with_max_slice_len(24);
    let values = [Value::Int32(1), Value::from("this does not fit")];

    let err = encode_row_with(&schema, &values, &config).unwrap_err();
    assert_eq!(
        codec_err(&err),
        &CodecError::Overflow {
            size: 18 + 17,
            limit: 24
        }
    );
    assert!(encode_row_with(&schema, &[Value::Int32(1), Value::from("ok")], &config).is_ok());
}

#[test]
fn empty_schema_encodes_header_only() {
    let schema = Schema::new(vec![]).unwrap();
    let bytes = encode_row(&schema, &[]).unwrap();
    assert_eq!(bytes, vec![5, 0, 0, 0, FORMAT_VERSION]);
    assert!(RowView::new(&bytes, &schema)
        .unwrap()
        .values()
        .unwrap()
        .is_empty());
}

#[test]
fn header_length_matches_slice_length() {
    let schema = wide_schema();
    let bytes = encode_row(&schema, &wide_values()).unwrap();
    let header = SliceHeader::from_bytes(&bytes).unwrap();
    assert_eq!(header.total_len() as usize, bytes.len());
    assert_eq!(header.version(), FORMAT_VERSION);
}

#[test]
fn builder_leaves_unset_columns_null() {
    let schema = id_name_schema();
    let mut builder = RowBuilder::new(&schema);
    builder.set_int32(0, 42).unwrap();
    let bytes = builder.build().unwrap();

    let view = RowView::new(&bytes, &schema).unwrap();
    assert_eq!(view.get::<i32>(0).unwrap(), Nullable::Value(42));
    assert!(view.is_null(1));
}

#[test]
fn builder_build_fails_for_unset_required_column() {
    let schema = id_name_schema();
    let mut builder = RowBuilder::new(&schema);
    builder.set_string(1, "only name").unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));
}

#[test]
fn builder_reset_allows_reuse() {
    let schema = id_name_schema();
    let mut builder = RowBuilder::new(&schema);
    builder.set_int32(0, 1).unwrap();
    builder.set_string(1, "first").unwrap();
    let first = builder.build().unwrap();

    builder.reset();
    assert!(builder.values().iter().all(Value::is_null));
    builder.set_int32(0, 1).unwrap();
    builder.set_string(1, "first").unwrap();
    assert_eq!(builder.build().unwrap(), first);
}

#[test]
fn builder_setters_check_kind_and_index() {
    let schema = id_name_schema();
    let mut builder = RowBuilder::new(&schema);

    let err = builder.set_string(0, "not an int").unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::SchemaMismatch { .. }));

    let err = builder.set_int32(5, 1).unwrap_err();
    assert!(matches!(codec_err(&err), CodecError::IndexOutOfBounds { .. }));
}

#[test]
fn builder_writes_nested_values() {
    let schema = wide_schema();
    let mut builder = RowBuilder::new(&schema);
    builder.set_bool(0, true).unwrap();
    builder.set_int16(1, -3).unwrap();
    builder.set_null(2).unwrap();
    builder.set_double(3, 2.5).unwrap();
    builder.set_string(4, "hello").unwrap();
    builder
        .set_list(5, vec![Value::from("a"), Value::Null, Value::from("ccc")])
        .unwrap();
    builder
        .set_tuple(6, vec![Value::Int32(9), Value::from("nine")])
        .unwrap();
    builder
        .set_row(7, vec![Value::Int32(-1), Value::from("origin")])
        .unwrap();
    builder.set_opaque(8, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    builder.set_date(9, Date::new(2024, 2, 29).unwrap()).unwrap();

    assert_eq!(
        builder.build().unwrap(),
        encode_row(&schema, &wide_values()).unwrap()
    );
}

#[test]
fn row_codec_applies_its_config() {
    let schema = Arc::new(id_name_schema());
    let codec = RowCodec::with_config(schema.clone(), CodecConfig::new().with_max_slice_len(20));

    let bytes = codec.encode(&[Value::Int32(7), Value::from("ab")]).unwrap();
    let view = codec.decode(&bytes).unwrap();
    assert_eq!(view.get::<&str>(1).unwrap(), Nullable::Value("ab"));

    assert!(codec.encode(&[Value::Int32(7), Value::from("abc")]).is_err());

    let mut builder = codec.builder();
    builder.set_int32(0, 7).unwrap();
    builder.set_string(1, "abc").unwrap();
    assert!(builder.build().is_err());

    assert_eq!(decode_row(&schema, &bytes).unwrap().get::<i32>(0).unwrap(), Nullable::Value(7));
}
