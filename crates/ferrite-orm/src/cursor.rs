//! Streaming iteration over query results.
//!
//! The cursor is lazy, single-pass and non-restartable. It lives inside
//! a scope passed to [`Storage::iterate`]: the prepared statement stays
//! on that call frame, so it is finalized on every exit path, including
//! panics. The cursor pins the storage's connection open for its
//! lifetime; a transient connection pinned this way is released at the
//! start of the next operation.

use std::marker::PhantomData;

use ferrite_sql_core::{Conditions, Record};
use rusqlite::Rows;

use crate::bind;
use crate::error::{prepare_err, step_err, Error, Result};
use crate::storage::{row_select_fragment, Storage};

/// A lazy, single-pass cursor over records of `R`.
///
/// Rows reflect the database state at statement preparation; writes made
/// mid-iteration never retroactively affect rows already yielded.
pub struct RowCursor<'stmt, R: Record> {
    rows: Rows<'stmt>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> Iterator for RowCursor<'_, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(
                bind::read_row(row)
                    .and_then(|mut reader| R::from_row(&mut reader).map_err(Error::from)),
            ),
            Ok(None) => None,
            Err(e) => Some(Err(step_err(e))),
        }
    }
}

impl Storage {
    /// Streams matching records through a lazy cursor handed to `scope`.
    ///
    /// ```ignore
    /// storage.iterate::<User, _>(Conditions::new(), |cursor| {
    ///     for user in cursor {
    ///         println!("{:?}", user?);
    ///     }
    ///     Ok(())
    /// })?;
    /// ```
    pub fn iterate<R: Record, T>(
        &mut self,
        conds: Conditions,
        scope: impl FnOnce(&mut RowCursor<'_, R>) -> Result<T>,
    ) -> Result<T> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let frag = row_select_fragment(&spec, &conds);
        tracing::debug!(sql = %frag.sql, "opening cursor");
        let conn = self.pinned_connection()?;
        let mut stmt = conn.prepare(&frag.sql).map_err(prepare_err)?;
        bind::bind_all(&mut stmt, &frag.params)?;
        let rows = stmt.raw_query();
        let mut cursor = RowCursor {
            rows,
            _marker: PhantomData,
        };
        scope(&mut cursor)
    }
}
