//! The bind walker and the row decoder at the driver boundary.
//!
//! Parameters are bound positionally, one engine entry point per storage
//! class, in the exact order the serializer emitted placeholders. Row
//! decoding converts driver values back into core [`Value`]s for the
//! typed extractors.

use ferrite_sql_core::{DecodeError, RowReader, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};

use crate::error::{bind_err, Result};

/// Binds every parameter of a fragment at its 1-based position.
pub(crate) fn bind_all(stmt: &mut Statement<'_>, params: &[Value]) -> Result<()> {
    for (i, v) in params.iter().enumerate() {
        let index = i + 1;
        let bound = match v {
            Value::Null => stmt.raw_bind_parameter(index, rusqlite::types::Null),
            Value::Integer(n) => stmt.raw_bind_parameter(index, n),
            Value::Real(f) => stmt.raw_bind_parameter(index, f),
            Value::Text(s) => stmt.raw_bind_parameter(index, s.as_str()),
            Value::Blob(b) => stmt.raw_bind_parameter(index, b.as_slice()),
        };
        bound.map_err(bind_err)?;
    }
    Ok(())
}

fn value_ref_to_value(v: ValueRef<'_>) -> std::result::Result<Value, DecodeError> {
    match v {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => Ok(Value::Integer(n)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|_| DecodeError::Malformed {
                what: "UTF-8 text",
                text: String::from_utf8_lossy(bytes).into_owned(),
            }),
        ValueRef::Blob(bytes) => Ok(Value::Blob(bytes.to_vec())),
    }
}

/// Converts an owned driver value into a core [`Value`].
pub(crate) fn owned_value(v: rusqlite::types::Value) -> Value {
    match v {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(n) => Value::Integer(n),
        rusqlite::types::Value::Real(f) => Value::Real(f),
        rusqlite::types::Value::Text(s) => Value::Text(s),
        rusqlite::types::Value::Blob(b) => Value::Blob(b),
    }
}

/// Decodes a driver row into a column-ordered reader.
pub(crate) fn read_row(row: &Row<'_>) -> Result<RowReader> {
    let count = row.as_ref().column_count();
    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let v = row
            .get_ref(i)
            .map_err(|_| DecodeError::MissingColumn(i))
            .and_then(value_ref_to_value)?;
        values.push(v);
    }
    Ok(RowReader::new(values))
}
