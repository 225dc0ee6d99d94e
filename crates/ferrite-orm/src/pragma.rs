//! The pragma accessor.
//!
//! A borrowed accessor over the storage: setters record the configured
//! value (so every newly opened connection gets it re-applied) and apply
//! it to the current connection immediately.

use ferrite_sql_core::Value;

use crate::error::{Error, Result};
use crate::exec;
use crate::storage::Storage;

/// SQLite journal modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Rollback journal, deleted at commit.
    Delete,
    /// Rollback journal, truncated at commit.
    Truncate,
    /// Rollback journal, persisted with a zeroed header.
    Persist,
    /// In-memory rollback journal.
    Memory,
    /// Write-ahead log.
    Wal,
    /// No rollback journal.
    Off,
}

impl JournalMode {
    /// The SQL spelling.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }

    /// Parses the engine's (lowercase) spelling.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_uppercase().as_str() {
            "DELETE" => Some(Self::Delete),
            "TRUNCATE" => Some(Self::Truncate),
            "PERSIST" => Some(Self::Persist),
            "MEMORY" => Some(Self::Memory),
            "WAL" => Some(Self::Wal),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Borrowed pragma accessor; see [`Storage::pragma`].
pub struct Pragma<'a> {
    storage: &'a mut Storage,
}

impl Storage {
    /// The pragma accessor.
    pub fn pragma(&mut self) -> Pragma<'_> {
        Pragma { storage: self }
    }
}

impl Pragma<'_> {
    /// Reads `PRAGMA journal_mode`.
    pub fn journal_mode(&mut self) -> Result<JournalMode> {
        let conn = self.storage.connection()?;
        let text: String = exec::query_scalar(&conn, "PRAGMA journal_mode")?;
        match JournalMode::parse(&text) {
            Some(mode) => Ok(mode),
            None => Err(Error::UnknownJournalMode(text)),
        }
    }

    /// Sets `journal_mode`, now and on every future connection.
    pub fn set_journal_mode(&mut self, mode: JournalMode) -> Result<()> {
        self.storage.journal_mode = Some(mode);
        let conn = self.storage.connection()?;
        exec::exec_pragma(&conn, &format!("PRAGMA journal_mode = {}", mode.as_sql()))
    }

    /// Reads `PRAGMA synchronous`.
    pub fn synchronous(&mut self) -> Result<i32> {
        let conn = self.storage.connection()?;
        exec::query_scalar(&conn, "PRAGMA synchronous")
    }

    /// Sets `synchronous`, now and on every future connection.
    pub fn set_synchronous(&mut self, level: i32) -> Result<()> {
        self.storage.synchronous = Some(level);
        let conn = self.storage.connection()?;
        exec::exec_pragma(&conn, &format!("PRAGMA synchronous = {level}"))
    }

    /// Reads `PRAGMA user_version`.
    pub fn user_version(&mut self) -> Result<i32> {
        let conn = self.storage.connection()?;
        exec::query_scalar(&conn, "PRAGMA user_version")
    }

    /// Sets `PRAGMA user_version`.
    pub fn set_user_version(&mut self, version: i32) -> Result<()> {
        let conn = self.storage.connection()?;
        exec::exec_pragma(&conn, &format!("PRAGMA user_version = {version}"))
    }

    /// Generic pass-through: reads the first value a PRAGMA reports.
    pub fn query_value(&mut self, name: &str) -> Result<Value> {
        let conn = self.storage.connection()?;
        let value: rusqlite::types::Value =
            exec::query_scalar(&conn, &format!("PRAGMA {name}"))?;
        Ok(crate::bind::owned_value(value))
    }

    /// Generic pass-through: `PRAGMA <name> = <value>`, with the value
    /// rendered inline (PRAGMA arguments cannot be bound).
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<()> {
        let conn = self.storage.connection()?;
        exec::exec_pragma(&conn, &format!("PRAGMA {name} = {}", value.to_sql_inline()))
    }
}
