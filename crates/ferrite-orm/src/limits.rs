//! The per-connection limit accessor.
//!
//! Values set here are retained and re-applied to every newly opened
//! connection, mirroring the pragma accessor.

use rusqlite::limits::Limit;

use crate::error::Result;
use crate::storage::Storage;

/// Borrowed limit accessor; see [`Storage::limits`].
pub struct Limits<'a> {
    storage: &'a mut Storage,
}

impl Storage {
    /// The engine-limit accessor.
    pub fn limits(&mut self) -> Limits<'_> {
        Limits { storage: self }
    }
}

impl Limits<'_> {
    /// Reads the current value of a limit category.
    pub fn get(&mut self, limit: Limit) -> Result<i32> {
        let conn = self.storage.connection()?;
        Ok(conn.limit(limit))
    }

    /// Sets a limit category, now and on every future connection.
    /// Returns the previous value.
    pub fn set(&mut self, limit: Limit, value: i32) -> Result<i32> {
        match self
            .storage
            .limits
            .iter_mut()
            .find(|(l, _)| *l as i32 == limit as i32)
        {
            Some(slot) => slot.1 = value,
            None => self.storage.limits.push((limit, value)),
        }
        let conn = self.storage.connection()?;
        Ok(conn.set_limit(limit, value))
    }
}
