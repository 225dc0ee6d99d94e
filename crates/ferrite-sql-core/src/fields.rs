//! Field types: the mapping between Rust types and SQL column types.
//!
//! A column's declared Rust type decides three things: the SQL type
//! affinity printed into DDL, whether the column is NOT NULL, and how a
//! stored value converts back into the host representation. `Option<T>`
//! is the nullability wrapper; everything else is NOT NULL.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::DecodeError;
use crate::value::{ToValue, Value};

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQL type affinity a field maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// INTEGER affinity.
    Integer,
    /// REAL affinity.
    Real,
    /// TEXT affinity.
    Text,
    /// BLOB affinity.
    Blob,
}

impl FieldType {
    /// The SQL spelling of the type.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
        }
    }
}

/// Trait for reconstructing a typed value from a stored [`Value`].
///
/// Non-nullable types fail with [`DecodeError::UnexpectedNull`] on NULL;
/// `Option<T>` maps NULL to `None`.
pub trait FromValue: Sized {
    /// Converts a stored value into the host type.
    fn from_value(v: Value) -> Result<Self, DecodeError>;
}

/// A Rust type usable as a column field type.
///
/// Carries the SQL affinity and nullability that DDL generation and the
/// schema synchronizer need.
pub trait FieldValue: ToValue + FromValue + Clone {
    /// The SQL type this field is declared as.
    const FIELD_TYPE: FieldType;
    /// Whether the column is implicitly NOT NULL.
    const NOT_NULL: bool;
}

fn expect_integer(v: Value) -> Result<i64, DecodeError> {
    match v {
        Value::Integer(n) => Ok(n),
        Value::Null => Err(DecodeError::UnexpectedNull),
        other => Err(DecodeError::TypeMismatch {
            expected: "INTEGER",
            got: other.type_name(),
        }),
    }
}

fn expect_text(v: Value) -> Result<String, DecodeError> {
    match v {
        Value::Text(s) => Ok(s),
        Value::Null => Err(DecodeError::UnexpectedNull),
        other => Err(DecodeError::TypeMismatch {
            expected: "TEXT",
            got: other.type_name(),
        }),
    }
}

macro_rules! integer_field {
    ($($t:ty),+) => {$(
        impl FromValue for $t {
            fn from_value(v: Value) -> Result<Self, DecodeError> {
                expect_integer(v).map(|n| n as $t)
            }
        }

        impl FieldValue for $t {
            const FIELD_TYPE: FieldType = FieldType::Integer;
            const NOT_NULL: bool = true;
        }
    )+};
}

integer_field!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for bool {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        expect_integer(v).map(|n| n != 0)
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Integer;
    const NOT_NULL: bool = true;
}

impl FromValue for f64 {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        match v {
            Value::Real(f) => Ok(f),
            // Integer results are legal for REAL affinity columns and
            // aggregates over integer columns.
            Value::Integer(n) => Ok(n as f64),
            Value::Null => Err(DecodeError::UnexpectedNull),
            other => Err(DecodeError::TypeMismatch {
                expected: "REAL",
                got: other.type_name(),
            }),
        }
    }
}

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::Real;
    const NOT_NULL: bool = true;
}

impl FromValue for f32 {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        f64::from_value(v).map(|f| f as f32)
    }
}

impl FieldValue for f32 {
    const FIELD_TYPE: FieldType = FieldType::Real;
    const NOT_NULL: bool = true;
}

impl FromValue for String {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        expect_text(v)
    }
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;
    const NOT_NULL: bool = true;
}

impl FromValue for Vec<u8> {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        match v {
            Value::Blob(b) => Ok(b),
            Value::Null => Err(DecodeError::UnexpectedNull),
            other => Err(DecodeError::TypeMismatch {
                expected: "BLOB",
                got: other.type_name(),
            }),
        }
    }
}

impl FieldValue for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Blob;
    const NOT_NULL: bool = true;
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        match v {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NOT_NULL: bool = false;
}

// Temporal fields are stored as TEXT.

impl ToValue for DateTime<Utc> {
    fn to_value(self) -> Value {
        Value::Text(self.to_rfc3339())
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        let text = expect_text(v)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| DecodeError::Malformed {
                what: "RFC 3339 timestamp",
                text,
            })
    }
}

impl FieldValue for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::Text;
    const NOT_NULL: bool = true;
}

impl ToValue for NaiveDateTime {
    fn to_value(self) -> Value {
        Value::Text(self.format(NAIVE_DATETIME_FORMAT).to_string())
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(v: Value) -> Result<Self, DecodeError> {
        let text = expect_text(v)?;
        NaiveDateTime::parse_from_str(&text, NAIVE_DATETIME_FORMAT).map_err(|_| {
            DecodeError::Malformed {
                what: "datetime",
                text,
            }
        })
    }
}

impl FieldValue for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::Text;
    const NOT_NULL: bool = true;
}
