//! Connection lifecycle.
//!
//! A storage holds at most one connection. In-memory databases, open
//! transactions and "open forever" mode make it sticky; otherwise each
//! operation opens a transient connection and drops it at the end. Every
//! transition from closed to open runs the on-open sequence:
//! `foreign_keys` (when any foreign key is declared), the configured
//! `synchronous` and `journal_mode` values, collations, per-connection
//! limits, and finally the user hook.

use std::ops::Deref;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{exec_err, Result};
use crate::exec;
use crate::storage::Storage;

/// A connection for the duration of one operation: borrowed from the
/// sticky slot, or owned and dropped at the end.
pub(crate) enum ConnGuard<'s> {
    Borrowed(&'s Connection),
    Owned(Connection),
}

impl Deref for ConnGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        match self {
            Self::Borrowed(c) => c,
            Self::Owned(c) => c,
        }
    }
}

impl Storage {
    pub(crate) fn is_sticky(&self) -> bool {
        self.in_memory || self.open_forever || self.in_transaction
    }

    /// Drops a connection that was pinned open for a cursor, unless the
    /// storage is sticky anyway.
    pub(crate) fn release_pinned(&mut self) {
        if self.pinned {
            self.pinned = false;
            if !self.is_sticky() {
                self.conn = None;
            }
        }
    }

    /// Opens a fresh engine handle and runs the on-open sequence.
    pub(crate) fn open_connection(&self) -> Result<Connection> {
        debug!(path = %self.path, "opening connection");
        let conn = Connection::open(&self.path).map_err(exec_err)?;
        self.run_on_open(&conn)?;
        Ok(conn)
    }

    fn run_on_open(&self, conn: &Connection) -> Result<()> {
        if self.catalog.has_foreign_keys() {
            exec::exec_pragma(conn, "PRAGMA foreign_keys = ON")?;
        }
        if let Some(level) = self.synchronous {
            exec::exec_pragma(conn, &format!("PRAGMA synchronous = {level}"))?;
        }
        if let Some(mode) = self.journal_mode {
            exec::exec_pragma(conn, &format!("PRAGMA journal_mode = {}", mode.as_sql()))?;
        }
        for (name, f) in &self.collations {
            let f = std::sync::Arc::clone(f);
            conn.create_collation(name, move |a, b| f(a, b))
                .map_err(exec_err)?;
        }
        for &(limit, value) in &self.limits {
            let _ = conn.set_limit(limit, value);
        }
        if let Some(ref hook) = self.on_open {
            hook(conn);
        }
        Ok(())
    }

    /// The connection for one operation: the sticky one when present or
    /// required, otherwise a transient handle dropped with the guard.
    pub(crate) fn connection(&mut self) -> Result<ConnGuard<'_>> {
        self.release_pinned();
        if self.conn.is_some() || self.is_sticky() {
            let conn = match self.conn.take() {
                Some(c) => c,
                None => self.open_connection()?,
            };
            Ok(ConnGuard::Borrowed(self.conn.insert(conn)))
        } else {
            Ok(ConnGuard::Owned(self.open_connection()?))
        }
    }

    /// A connection that stays cached past the current call, for cursors
    /// that borrow it. A transient connection pinned this way is
    /// released at the start of the next operation.
    pub(crate) fn pinned_connection(&mut self) -> Result<&Connection> {
        self.release_pinned();
        let conn = match self.conn.take() {
            Some(c) => c,
            None => {
                let c = self.open_connection()?;
                if !self.is_sticky() {
                    self.pinned = true;
                }
                c
            }
        };
        Ok(self.conn.insert(conn))
    }
}
