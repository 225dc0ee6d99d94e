//! The schema synchronizer.
//!
//! Tables are visited in registration order. Index entries emit their
//! `CREATE INDEX IF NOT EXISTS` and report [`SyncStatus::AlreadyInSync`];
//! regular tables are classified against `PRAGMA table_info` and get the
//! minimal migration: creation, `ALTER TABLE ADD COLUMN`, the
//! backup-copy-rename path, or drop-and-recreate.

use std::collections::BTreeMap;

use ferrite_sql_core::ddl;
use ferrite_sql_core::sync::{classify, columns_to_add, declared_table_info, SyncStatus, TableInfo};
use ferrite_sql_core::value::escape_single_quotes;
use ferrite_sql_core::TableSpec;
use rusqlite::Connection;
use tracing::debug;

use crate::catalog::SchemaEntry;
use crate::error::{exec_err, Result};
use crate::exec;
use crate::storage::Storage;

impl Storage {
    /// Diffs every registered table against the live schema and applies
    /// the minimal migrations. With `preserve`, live-only columns are
    /// removed through the backup path instead of dropping the table.
    ///
    /// Excess tables present in the database but not registered are
    /// ignored. Running it twice returns
    /// [`SyncStatus::AlreadyInSync`] for every table.
    pub fn sync_schema(&mut self, preserve: bool) -> Result<BTreeMap<String, SyncStatus>> {
        let entries: Vec<SchemaEntry> = self.catalog.entries().cloned().collect();
        let conn = self.connection()?;
        let mut result = BTreeMap::new();
        for entry in &entries {
            match entry {
                SchemaEntry::Index(ix) => {
                    exec::exec(&conn, &ddl::create_index_sql(ix))?;
                    result.insert(ix.name.to_string(), SyncStatus::AlreadyInSync);
                }
                SchemaEntry::Table(spec) => {
                    let status = sync_table(&conn, spec, preserve)?;
                    debug!(table = spec.name, %status, "table synced");
                    result.insert(spec.name.to_string(), status);
                }
            }
        }
        Ok(result)
    }

    /// Computes the statuses [`sync_schema`](Self::sync_schema) would
    /// report, without mutating the database.
    pub fn sync_schema_simulate(&mut self, preserve: bool) -> Result<BTreeMap<String, SyncStatus>> {
        let entries: Vec<SchemaEntry> = self.catalog.entries().cloned().collect();
        let conn = self.connection()?;
        let mut result = BTreeMap::new();
        for entry in &entries {
            match entry {
                SchemaEntry::Index(ix) => {
                    result.insert(ix.name.to_string(), SyncStatus::AlreadyInSync);
                }
                SchemaEntry::Table(spec) => {
                    let status = schema_status(&conn, spec, preserve)?;
                    result.insert(spec.name.to_string(), status);
                }
            }
        }
        Ok(result)
    }
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = exec::query_scalar_with(
        conn,
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        &[&name as &dyn rusqlite::types::ToSql],
    )?;
    Ok(count > 0)
}

fn live_table_info(conn: &Connection, name: &str) -> Result<Vec<TableInfo>> {
    let sql = format!("PRAGMA table_info('{}')", escape_single_quotes(name));
    let mut stmt = conn.prepare(&sql).map_err(exec_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(TableInfo {
                cid: row.get(0)?,
                name: row.get(1)?,
                type_name: row.get(2)?,
                notnull: row.get::<_, i64>(3)? != 0,
                dflt_value: row.get(4)?,
                pk: row.get(5)?,
            })
        })
        .map_err(exec_err)?;
    let infos: rusqlite::Result<Vec<TableInfo>> = rows.collect();
    infos.map_err(exec_err)
}

fn schema_status(conn: &Connection, spec: &TableSpec, preserve: bool) -> Result<SyncStatus> {
    if !table_exists(conn, spec.name)? {
        return Ok(SyncStatus::NewTableCreated);
    }
    let declared = declared_table_info(spec);
    let live = live_table_info(conn, spec.name)?;
    Ok(classify(&declared, &live, preserve))
}

fn sync_table(conn: &Connection, spec: &TableSpec, preserve: bool) -> Result<SyncStatus> {
    let status = schema_status(conn, spec, preserve)?;
    match status {
        SyncStatus::AlreadyInSync => {}
        SyncStatus::NewTableCreated => {
            exec::exec(conn, &ddl::create_table_sql(spec))?;
        }
        SyncStatus::NewColumnsAdded => {
            add_missing_columns(conn, spec)?;
        }
        SyncStatus::OldColumnsRemoved | SyncStatus::NewColumnsAddedAndOldColumnsRemoved => {
            backup_table(conn, spec)?;
        }
        SyncStatus::DroppedAndRecreated => {
            exec::exec(conn, &ddl::drop_table_sql(spec.name))?;
            exec::exec(conn, &ddl::create_table_sql(spec))?;
        }
    }
    Ok(status)
}

fn add_missing_columns(conn: &Connection, spec: &TableSpec) -> Result<()> {
    let declared = declared_table_info(spec);
    let live = live_table_info(conn, spec.name)?;
    let missing: Vec<String> = columns_to_add(&declared, &live)
        .into_iter()
        .map(|info| info.name.clone())
        .collect();
    // Declaration order, not diff order.
    for column in &spec.columns {
        if missing.iter().any(|m| m == column.name) {
            exec::exec(conn, &ddl::add_column_sql(spec.name, column))?;
        }
    }
    Ok(())
}

/// Copies the shared columns into a freshly named backup table built
/// from the declared schema, drops the original and renames the backup
/// over it.
fn backup_table(conn: &Connection, spec: &TableSpec) -> Result<()> {
    let base = format!("{}_backup", spec.name);
    let mut backup = base.clone();
    let mut suffix = 1;
    while table_exists(conn, &backup)? {
        backup = format!("{base}{suffix}");
        suffix += 1;
    }

    exec::exec(conn, &ddl::create_table_named_sql(spec, &backup))?;

    let live = live_table_info(conn, spec.name)?;
    let shared: Vec<&str> = spec
        .columns
        .iter()
        .map(|c| c.name)
        .filter(|name| live.iter().any(|l| l.name == *name))
        .collect();
    exec::exec(conn, &ddl::copy_table_sql(spec.name, &backup, &shared))?;
    exec::exec(conn, &ddl::drop_table_sql(spec.name))?;
    exec::exec(conn, &ddl::rename_table_sql(&backup, spec.name))?;
    Ok(())
}
