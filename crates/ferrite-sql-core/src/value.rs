//! SQL values and parameter handling.
//!
//! Every bindable leaf of an expression carries a [`Value`]. Values are
//! normally shipped to the driver as positional parameters; the inline
//! rendering exists for DDL defaults and debugging output.

/// A SQL value, in one of SQLite's storage classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: prefer parameterized queries; this is for DDL
    /// defaults and diagnostics.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Integer(n) => format!("{n}"),
            Self::Real(f) => format!("{f}"),
            Self::Text(s) => format!("'{}'", escape_single_quotes(s)),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Name of the storage class, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB",
        }
    }

    /// Returns `true` for the NULL value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Escapes single quotes by doubling them.
#[must_use]
pub fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "''")
}

/// Trait for types that can be converted to SQL values.
pub trait ToValue {
    /// Converts the value to a [`Value`].
    fn to_value(self) -> Value;
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for i64 {
    fn to_value(self) -> Value {
        Value::Integer(self)
    }
}

impl ToValue for i32 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for i16 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for i8 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for u8 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for u16 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for u32 {
    fn to_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl ToValue for u64 {
    fn to_value(self) -> Value {
        // The engine stores 64-bit signed integers; wider values wrap.
        Value::Integer(self as i64)
    }
}

impl ToValue for f64 {
    fn to_value(self) -> Value {
        Value::Real(self)
    }
}

impl ToValue for f32 {
    fn to_value(self) -> Value {
        Value::Real(f64::from(self))
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::Text(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl ToValue for Vec<u8> {
    fn to_value(self) -> Value {
        Value::Blob(self)
    }
}

impl ToValue for &[u8] {
    fn to_value(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_null() {
        assert_eq!(Value::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_inline_integer() {
        assert_eq!(Value::Integer(42).to_sql_inline(), "42");
        assert_eq!(Value::Integer(-100).to_sql_inline(), "-100");
    }

    #[test]
    fn test_inline_text_escaping() {
        // Single quotes are escaped by doubling
        assert_eq!(
            Value::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_inline_injection_attempt_is_escaped() {
        let malicious = "'; DROP TABLE users; --";
        let escaped = Value::Text(String::from(malicious)).to_sql_inline();
        assert_eq!(escaped, "'''; DROP TABLE users; --'");
    }

    #[test]
    fn test_inline_blob() {
        assert_eq!(
            Value::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "X'4849'"
        );
    }

    #[test]
    fn test_to_value_conversions() {
        assert_eq!(true.to_value(), Value::Integer(1));
        assert_eq!(42_i32.to_value(), Value::Integer(42));
        assert_eq!(3.5_f64.to_value(), Value::Real(3.5));
        assert_eq!("hi".to_value(), Value::Text(String::from("hi")));
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Some(7_i64).to_value(), Value::Integer(7));
    }
}
