//! Schema-sync planning: the pure diff between a declared table and the
//! live schema.
//!
//! The driver side introspects `PRAGMA table_info` into [`TableInfo`]
//! rows; classification here decides what migration (if any) a table
//! needs. The synchronizer and its dry-run variant share this logic, so
//! they agree by construction.

use std::fmt;

use crate::schema::TableSpec;

/// Terminal classification of what syncing did (or would do) to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing to do.
    AlreadyInSync,
    /// The table did not exist and was created.
    NewTableCreated,
    /// Live-only columns were removed via the backup path.
    OldColumnsRemoved,
    /// Declared-only columns were added with `ALTER TABLE ADD COLUMN`.
    NewColumnsAdded,
    /// Both kinds of difference; handled via the backup path.
    NewColumnsAddedAndOldColumnsRemoved,
    /// The table was dropped and recreated from the declared schema.
    DroppedAndRecreated,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AlreadyInSync => "already in sync",
            Self::NewTableCreated => "new table created",
            Self::OldColumnsRemoved => "old columns removed",
            Self::NewColumnsAdded => "new columns added",
            Self::NewColumnsAddedAndOldColumnsRemoved => {
                "new columns added and old columns removed"
            }
            Self::DroppedAndRecreated => "dropped and recreated",
        };
        f.write_str(text)
    }
}

/// One row of `PRAGMA table_info`, and the shape declared schemas are
/// lowered into for diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    /// Column position.
    pub cid: i32,
    /// Column name.
    pub name: String,
    /// Declared SQL type.
    pub type_name: String,
    /// NOT NULL flag.
    pub notnull: bool,
    /// DEFAULT literal, rendered as SQL text.
    pub dflt_value: Option<String>,
    /// 1-based position within the primary key, 0 when not part of it.
    pub pk: i32,
}

/// Lowers a declared table into `PRAGMA table_info` shape.
#[must_use]
pub fn declared_table_info(t: &TableSpec) -> Vec<TableInfo> {
    let pk_ordinal = |name: &str| -> i32 {
        if t.composite_primary_key.is_empty() {
            match t.column_named(name) {
                Some(c) if c.primary_key => 1,
                _ => 0,
            }
        } else {
            t.composite_primary_key
                .iter()
                .position(|c| *c == name)
                .map_or(0, |i| i as i32 + 1)
        }
    };
    t.columns
        .iter()
        .enumerate()
        .map(|(i, c)| TableInfo {
            cid: i as i32,
            name: c.name.to_string(),
            type_name: c.field_type.as_sql().to_string(),
            notnull: c.not_null,
            dflt_value: c.default.as_ref().map(crate::value::Value::to_sql_inline),
            pk: pk_ordinal(c.name),
        })
        .collect()
}

fn infos_match(a: &TableInfo, b: &TableInfo) -> bool {
    a.type_name.eq_ignore_ascii_case(&b.type_name)
        && a.notnull == b.notnull
        && a.dflt_value == b.dflt_value
        && a.pk == b.pk
}

/// Columns present in `declared` but absent from `live`, in declaration
/// order.
#[must_use]
pub fn columns_to_add<'a>(declared: &'a [TableInfo], live: &[TableInfo]) -> Vec<&'a TableInfo> {
    declared
        .iter()
        .filter(|d| !live.iter().any(|l| l.name == d.name))
        .collect()
}

/// Names of columns present in `live` but absent from `declared`.
#[must_use]
pub fn columns_to_drop(declared: &[TableInfo], live: &[TableInfo]) -> Vec<String> {
    live.iter()
        .filter(|l| !declared.iter().any(|d| d.name == l.name))
        .map(|l| l.name.clone())
        .collect()
}

/// Whether a column can be added with `ALTER TABLE ADD COLUMN` without
/// breaking existing rows.
fn addable(info: &TableInfo) -> bool {
    !info.notnull || info.dflt_value.is_some()
}

/// Classifies an existing table against its declaration.
///
/// Any column present on both sides with differing properties makes the
/// table [`SyncStatus::DroppedAndRecreated`]; the diff is deliberately
/// coarse and does not preserve data in that case.
#[must_use]
pub fn classify(declared: &[TableInfo], live: &[TableInfo], preserve: bool) -> SyncStatus {
    for d in declared {
        if let Some(l) = live.iter().find(|l| l.name == d.name) {
            if !infos_match(d, l) {
                return SyncStatus::DroppedAndRecreated;
            }
        }
    }

    let to_add = columns_to_add(declared, live);
    let to_drop = columns_to_drop(declared, live);

    match (to_add.is_empty(), to_drop.is_empty()) {
        (true, true) => SyncStatus::AlreadyInSync,
        (false, true) => {
            if to_add.iter().all(|c| addable(c)) {
                SyncStatus::NewColumnsAdded
            } else {
                SyncStatus::DroppedAndRecreated
            }
        }
        (true, false) => {
            if preserve {
                SyncStatus::OldColumnsRemoved
            } else {
                SyncStatus::DroppedAndRecreated
            }
        }
        (false, false) => {
            if to_add.iter().all(|c| addable(c)) {
                SyncStatus::NewColumnsAddedAndOldColumnsRemoved
            } else {
                SyncStatus::DroppedAndRecreated
            }
        }
    }
}
