//! Result-row walking.
//!
//! The reader mirrors the bind walker: values are consumed per column
//! index, left to right, in the same order the projection emitted them.

use crate::error::DecodeError;
use crate::fields::FromValue;
use crate::value::Value;

/// A decoded result row, consumed column by column.
#[derive(Debug)]
pub struct RowReader {
    values: Vec<Value>,
    index: usize,
}

impl RowReader {
    /// Wraps the values of one result row.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, index: 0 }
    }

    /// Takes the next raw value.
    pub fn next_value(&mut self) -> Result<Value, DecodeError> {
        let slot = self
            .values
            .get_mut(self.index)
            .ok_or(DecodeError::MissingColumn(self.index))?;
        self.index += 1;
        Ok(std::mem::replace(slot, Value::Null))
    }

    /// Takes the next value and converts it into `T`.
    pub fn next_as<T: FromValue>(&mut self) -> Result<T, DecodeError> {
        let v = self.next_value()?;
        T::from_value(v)
    }

    /// Number of columns not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.index)
    }
}
