//! Fuzz testing for the slice decoder.
//!
//! Builds a schema from arbitrary column shapes and decodes arbitrary bytes
//! against it. Decoding must either fail cleanly or yield a view whose every
//! field can be read without panicking.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rowcodec::{RowView, Schema, TypeDescriptor};

#[derive(Debug, Arbitrary)]
struct DecodeInput {
    columns: Vec<FuzzColumn>,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct FuzzColumn {
    shape: FuzzType,
    nullable: bool,
}

#[derive(Debug, Arbitrary)]
enum FuzzType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Timestamp,
    Date,
    String,
    Opaque(u8),
    List(Box<FuzzColumn>),
    Tuple(Vec<FuzzColumn>),
    Row(Vec<FuzzColumn>),
}

impl FuzzColumn {
    fn descriptor(&self, depth: usize) -> Option<TypeDescriptor> {
        if depth > 4 {
            return None;
        }
        let ty = match &self.shape {
            FuzzType::Bool => TypeDescriptor::bool(),
            FuzzType::Int16 => TypeDescriptor::int16(),
            FuzzType::Int32 => TypeDescriptor::int32(),
            FuzzType::Int64 => TypeDescriptor::int64(),
            FuzzType::Float => TypeDescriptor::float(),
            FuzzType::Double => TypeDescriptor::double(),
            FuzzType::Timestamp => TypeDescriptor::timestamp(),
            FuzzType::Date => TypeDescriptor::date(),
            FuzzType::String => TypeDescriptor::string(),
            FuzzType::Opaque(size) => TypeDescriptor::opaque(usize::from(*size)),
            FuzzType::List(element) => TypeDescriptor::list(element.descriptor(depth + 1)?),
            FuzzType::Tuple(elements) => TypeDescriptor::tuple(
                elements
                    .iter()
                    .map(|e| e.descriptor(depth + 1))
                    .collect::<Option<_>>()?,
            ),
            FuzzType::Row(columns) => TypeDescriptor::row(Arc::new(schema(columns, depth + 1)?)),
        };
        Some(ty.with_nullable(self.nullable))
    }
}

fn schema(columns: &[FuzzColumn], depth: usize) -> Option<Schema> {
    let types = columns
        .iter()
        .map(|c| c.descriptor(depth))
        .collect::<Option<Vec<_>>>()?;
    Schema::from_types(types).ok()
}

fuzz_target!(|input: DecodeInput| {
    if input.columns.len() > 64 {
        return;
    }
    let Some(schema) = schema(&input.columns, 0) else {
        return;
    };

    if let Ok(view) = RowView::new(&input.data, &schema) {
        for col in 0..view.column_count() {
            let _ = view.get_value(col);
        }
    }
});
