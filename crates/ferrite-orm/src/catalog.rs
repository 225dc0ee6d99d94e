//! The table registry.
//!
//! Tables and indices are declared once at storage construction and kept
//! in registration order; `sync_schema` and multi-table DDL iterate them
//! in exactly that order.

use std::any::TypeId;
use std::collections::HashMap;

use ferrite_sql_core::{Field, Index, IndexSpec, Record, TableSpec};

use crate::error::{Error, Result};

/// One registered entity.
#[derive(Debug, Clone)]
pub(crate) enum SchemaEntry {
    /// A mapped table.
    Table(TableSpec),
    /// An index over a mapped table.
    Index(IndexSpec),
}

/// The declared schema, built at storage construction.
///
/// # Example
///
/// ```ignore
/// let schema = Schema::new()
///     .table(User::table())
///     .table(Visit::table().foreign_key(
///         ForeignKeySpec::to::<User>(&["user_id"], &["id"]).on_delete(FkAction::Cascade),
///     ))
///     .index(Index::<User>::new("idx_users_name").on(User::NAME));
/// ```
#[derive(Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    /// Starts an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table.
    ///
    /// # Panics
    ///
    /// Panics if the spec violates a declaration invariant (duplicate
    /// column names, conflicting primary keys, unknown column names in a
    /// composite key or foreign key).
    #[must_use]
    pub fn table(mut self, spec: TableSpec) -> Self {
        spec.validate();
        self.entries.push(SchemaEntry::Table(spec));
        self
    }

    /// Registers an index.
    #[must_use]
    pub fn index<R: Record>(mut self, index: Index<R>) -> Self {
        self.entries.push(SchemaEntry::Index(index.spec()));
        self
    }
}

pub(crate) struct Catalog {
    entries: Vec<SchemaEntry>,
    by_type: HashMap<TypeId, usize>,
}

impl Catalog {
    pub(crate) fn new(schema: Schema) -> Self {
        let entries = schema.entries;
        let mut by_type = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if let SchemaEntry::Table(spec) = entry {
                by_type.insert(spec.type_id, i);
            }
        }
        Self { entries, by_type }
    }

    /// All entries, in registration order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter()
    }

    /// The table spec mapped to `R`.
    pub(crate) fn table_for<R: Record>(&self) -> Result<&TableSpec> {
        self.by_type
            .get(&TypeId::of::<R>())
            .and_then(|&i| match &self.entries[i] {
                SchemaEntry::Table(spec) => Some(spec),
                SchemaEntry::Index(_) => None,
            })
            .ok_or(Error::TypeNotMapped(R::TYPE_NAME))
    }

    /// The registered table name for `R`, if mapped.
    pub(crate) fn find_table_name<R: Record>(&self) -> Option<&'static str> {
        self.by_type
            .get(&TypeId::of::<R>())
            .and_then(|&i| match &self.entries[i] {
                SchemaEntry::Table(spec) => Some(spec.name),
                SchemaEntry::Index(_) => None,
            })
    }

    /// Resolves an accessor to its column position within `R`'s table.
    pub(crate) fn column_index<R: Record, T>(&self, field: Field<R, T>) -> Result<usize> {
        let spec = self.table_for::<R>()?;
        spec.column_index(field.name())
            .ok_or_else(|| Error::ColumnNotFound(field.name().to_string()))
    }

    /// Whether any registered table declares a foreign key.
    pub(crate) fn has_foreign_keys(&self) -> bool {
        self.entries.iter().any(|e| match e {
            SchemaEntry::Table(spec) => !spec.foreign_keys.is_empty(),
            SchemaEntry::Index(_) => false,
        })
    }
}
