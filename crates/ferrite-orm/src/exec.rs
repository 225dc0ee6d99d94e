//! Statement execution: prepare, bind, step, finalize.
//!
//! Statements are scoped to these helpers, so finalization happens on
//! every exit path. Engine return codes map onto the typed error kinds;
//! everything else propagates unchanged.

use ferrite_sql_core::{Fragment, RowReader};
use rusqlite::Connection;
use tracing::debug;

use crate::bind;
use crate::error::{exec_err, prepare_err, step_err, Error, Result};

/// Runs one DML statement to completion; returns the affected-row count.
pub(crate) fn execute_dml(conn: &Connection, frag: &Fragment) -> Result<usize> {
    debug!(sql = %frag.sql, params = frag.params.len(), "executing");
    let mut stmt = conn.prepare(&frag.sql).map_err(prepare_err)?;
    bind::bind_all(&mut stmt, &frag.params)?;
    stmt.raw_execute().map_err(step_err)
}

/// Runs a query, draining every row through `decode`.
pub(crate) fn query_rows<T>(
    conn: &Connection,
    frag: &Fragment,
    mut decode: impl FnMut(&mut RowReader) -> Result<T>,
) -> Result<Vec<T>> {
    debug!(sql = %frag.sql, params = frag.params.len(), "querying");
    let mut stmt = conn.prepare(&frag.sql).map_err(prepare_err)?;
    bind::bind_all(&mut stmt, &frag.params)?;
    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(step_err)? {
        let mut reader = bind::read_row(row)?;
        out.push(decode(&mut reader)?);
    }
    Ok(out)
}

/// Runs a query expected to produce at most one row.
pub(crate) fn query_optional<T>(
    conn: &Connection,
    frag: &Fragment,
    decode: impl FnOnce(&mut RowReader) -> Result<T>,
) -> Result<Option<T>> {
    debug!(sql = %frag.sql, params = frag.params.len(), "querying");
    let mut stmt = conn.prepare(&frag.sql).map_err(prepare_err)?;
    bind::bind_all(&mut stmt, &frag.params)?;
    let mut rows = stmt.raw_query();
    match rows.next().map_err(step_err)? {
        Some(row) => {
            let mut reader = bind::read_row(row)?;
            Ok(Some(decode(&mut reader)?))
        }
        None => Ok(None),
    }
}

/// Runs one-shot SQL (DDL, PRAGMA, BEGIN/COMMIT); failures surface as
/// [`Error::Exec`].
pub(crate) fn exec(conn: &Connection, sql: &str) -> Result<()> {
    debug!(%sql, "exec");
    conn.execute_batch(sql).map_err(exec_err)
}

/// Runs a PRAGMA statement, draining any rows it returns (some PRAGMAs
/// report their new value as a result row).
pub(crate) fn exec_pragma(conn: &Connection, sql: &str) -> Result<()> {
    debug!(%sql, "pragma");
    let mut stmt = conn.prepare(sql).map_err(exec_err)?;
    let mut rows = stmt.raw_query();
    while rows.next().map_err(exec_err)?.is_some() {}
    Ok(())
}

/// Reads a single scalar via one-shot SQL.
pub(crate) fn query_scalar<T: rusqlite::types::FromSql>(conn: &Connection, sql: &str) -> Result<T> {
    debug!(%sql, "query scalar");
    conn.query_row(sql, [], |row| row.get(0)).map_err(exec_err)
}

/// Like [`query_scalar`], but for statements with bound parameters.
pub(crate) fn query_scalar_with<T: rusqlite::types::FromSql>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<T> {
    debug!(%sql, "query scalar");
    conn.query_row(sql, params, |row| row.get(0))
        .map_err(exec_err)
}

/// Maps "no rows" onto [`Error::NotFound`] for single-row lookups.
pub(crate) fn require_row<T>(row: Option<T>) -> Result<T> {
    row.ok_or(Error::NotFound)
}
