//! Table, column, index and foreign-key descriptors.
//!
//! A [`TableSpec`] is the runtime description of a mapped table: what the
//! DDL generator prints, what the schema synchronizer diffs against the
//! live database, and what the facade consults to find primary keys and
//! column positions. The [`Record`] trait ties a Rust struct to its spec.

use std::any::TypeId;

use crate::error::DecodeError;
use crate::expr::Field;
use crate::fields::FieldType;
use crate::row::RowReader;
use crate::value::Value;

/// Sort direction for a single-column PRIMARY KEY constraint or an
/// ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The SQL keyword.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Referential action for a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkAction {
    /// NO ACTION.
    NoAction,
    /// RESTRICT.
    Restrict,
    /// SET NULL.
    SetNull,
    /// SET DEFAULT.
    SetDefault,
    /// CASCADE.
    Cascade,
}

impl FkAction {
    /// The SQL spelling.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Cascade => "CASCADE",
        }
    }
}

/// One declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// SQL type affinity.
    pub field_type: FieldType,
    /// NOT NULL flag; true iff the field type is non-nullable.
    pub not_null: bool,
    /// Single-column PRIMARY KEY constraint.
    pub primary_key: bool,
    /// Optional ASC/DESC on the PRIMARY KEY constraint.
    pub pk_order: Option<SortOrder>,
    /// AUTOINCREMENT flag (valid only with a single-column PRIMARY KEY).
    pub autoincrement: bool,
    /// UNIQUE constraint.
    pub unique: bool,
    /// DEFAULT literal.
    pub default: Option<Value>,
    /// CHECK expression text.
    pub check: Option<&'static str>,
    /// COLLATE sequence name.
    pub collate: Option<&'static str>,
}

impl ColumnSpec {
    /// Creates a bare column.
    #[must_use]
    pub fn new(name: &'static str, field_type: FieldType, not_null: bool) -> Self {
        Self {
            name,
            field_type,
            not_null,
            primary_key: false,
            pk_order: None,
            autoincrement: false,
            unique: false,
            default: None,
            check: None,
            collate: None,
        }
    }

    /// Adds a single-column PRIMARY KEY constraint.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Adds a PRIMARY KEY constraint with an explicit direction.
    #[must_use]
    pub fn primary_key_sorted(mut self, order: SortOrder) -> Self {
        self.primary_key = true;
        self.pk_order = Some(order);
        self
    }

    /// Marks the primary key AUTOINCREMENT.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the DEFAULT literal.
    #[must_use]
    pub fn default_value(mut self, v: Value) -> Self {
        self.default = Some(v);
        self
    }

    /// Adds a CHECK constraint.
    #[must_use]
    pub fn check(mut self, expr: &'static str) -> Self {
        self.check = Some(expr);
        self
    }

    /// Sets the collating sequence.
    #[must_use]
    pub fn collate(mut self, name: &'static str) -> Self {
        self.collate = Some(name);
        self
    }
}

/// A foreign-key constraint on a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeySpec {
    /// Child columns, in order.
    pub columns: Vec<&'static str>,
    /// The parent table name.
    pub parent_table: &'static str,
    /// Parent columns, in order; count matches `columns`.
    pub parent_columns: Vec<&'static str>,
    /// ON UPDATE action.
    pub on_update: Option<FkAction>,
    /// ON DELETE action.
    pub on_delete: Option<FkAction>,
}

impl ForeignKeySpec {
    /// Declares a foreign key from `columns` to `parent_columns` of the
    /// table mapped by `P`.
    ///
    /// # Panics
    ///
    /// Panics if the column lists are empty or their lengths differ; a
    /// malformed declaration is a programming error.
    #[must_use]
    pub fn to<P: Record>(columns: &[&'static str], parent_columns: &[&'static str]) -> Self {
        assert!(
            !columns.is_empty() && columns.len() == parent_columns.len(),
            "foreign key column lists must be non-empty and of equal length"
        );
        Self {
            columns: columns.to_vec(),
            parent_table: P::TABLE_NAME,
            parent_columns: parent_columns.to_vec(),
            on_update: None,
            on_delete: None,
        }
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub fn on_update(mut self, action: FkAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: FkAction) -> Self {
        self.on_delete = Some(action);
        self
    }
}

/// The runtime descriptor of a mapped table.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Table name.
    pub name: &'static str,
    /// Type id of the mapped record type.
    pub type_id: TypeId,
    /// Rust name of the record type, for error messages.
    pub type_name: &'static str,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSpec>,
    /// Composite primary key column names; empty when the key is a
    /// single-column constraint (or absent).
    pub composite_primary_key: Vec<&'static str>,
    /// WITHOUT ROWID flag.
    pub without_rowid: bool,
    /// Foreign keys in declaration order.
    pub foreign_keys: Vec<ForeignKeySpec>,
}

impl TableSpec {
    /// Creates an empty spec for the record type `R`.
    #[must_use]
    pub fn new<R: Record>() -> Self {
        Self {
            name: R::TABLE_NAME,
            type_id: TypeId::of::<R>(),
            type_name: R::TYPE_NAME,
            columns: Vec::new(),
            composite_primary_key: Vec::new(),
            without_rowid: false,
            foreign_keys: Vec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, c: ColumnSpec) -> Self {
        self.columns.push(c);
        self
    }

    /// Declares a composite primary key over the named columns.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&'static str]) -> Self {
        self.composite_primary_key = columns.to_vec();
        self
    }

    /// Declares the table WITHOUT ROWID.
    #[must_use]
    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    /// Appends a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeySpec) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Checks the declaration invariants.
    ///
    /// # Panics
    ///
    /// Panics on duplicate column names, more than one single-column
    /// PRIMARY KEY constraint, a composite key combined with a
    /// single-column constraint, or a composite/foreign key naming an
    /// unknown column. These are declaration bugs, not runtime errors.
    pub fn validate(&self) {
        for (i, c) in self.columns.iter().enumerate() {
            assert!(
                !self.columns[..i].iter().any(|o| o.name == c.name),
                "table `{}` declares column `{}` twice",
                self.name,
                c.name
            );
        }
        let pk_constraints = self.columns.iter().filter(|c| c.primary_key).count();
        assert!(
            pk_constraints <= 1,
            "table `{}` has more than one single-column PRIMARY KEY constraint",
            self.name
        );
        if !self.composite_primary_key.is_empty() {
            assert!(
                pk_constraints == 0,
                "table `{}` combines a composite primary key with a column-level one",
                self.name
            );
        }
        for name in self
            .composite_primary_key
            .iter()
            .chain(self.foreign_keys.iter().flat_map(|fk| fk.columns.iter()))
        {
            assert!(
                self.column_index(name).is_some(),
                "table `{}` references unknown column `{}`",
                self.name,
                name
            );
        }
    }

    /// Finds a column by name.
    #[must_use]
    pub fn column_named(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Finds a column's position by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Positions of the primary-key columns, in key order. Empty when the
    /// table has no primary key.
    #[must_use]
    pub fn primary_key_indices(&self) -> Vec<usize> {
        if self.composite_primary_key.is_empty() {
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.primary_key)
                .map(|(i, _)| i)
                .collect()
        } else {
            self.composite_primary_key
                .iter()
                .filter_map(|name| self.column_index(name))
                .collect()
        }
    }

    /// Positions of the columns bound by a plain `insert`.
    ///
    /// Columns with a single-column PRIMARY KEY constraint are omitted so
    /// the engine assigns the rowid; composite-key columns and every
    /// column of a WITHOUT ROWID table are included.
    #[must_use]
    pub fn insert_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.without_rowid || !c.primary_key)
            .map(|(i, _)| i)
            .collect()
    }
}

/// A Rust type mapped to a table.
///
/// Usually implemented by the [`table!`](crate::table) macro, which also
/// generates the typed [`Field`] constants used in expressions.
pub trait Record: Sized + 'static {
    /// The SQL table name.
    const TABLE_NAME: &'static str;
    /// The Rust type name, used in error messages.
    const TYPE_NAME: &'static str;

    /// Builds the table descriptor.
    fn table() -> TableSpec;

    /// Extracts one [`Value`] per column, in declaration order.
    fn row_values(&self) -> Vec<Value>;

    /// Rebuilds a record from a result row, consuming one value per
    /// column in declaration order.
    fn from_row(row: &mut RowReader) -> Result<Self, DecodeError>;
}

/// An index declaration over columns of one table.
#[derive(Debug, Clone)]
pub struct Index<R: Record> {
    name: &'static str,
    unique: bool,
    columns: Vec<&'static str>,
    _marker: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> Index<R> {
    /// Starts an index declaration.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            unique: false,
            columns: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Makes the index UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Appends an indexed column.
    #[must_use]
    pub fn on<T>(mut self, field: Field<R, T>) -> Self {
        self.columns.push(field.name());
        self
    }

    /// Resolves into the untyped descriptor.
    #[must_use]
    pub fn spec(&self) -> IndexSpec {
        IndexSpec {
            name: self.name,
            table: R::TABLE_NAME,
            unique: self.unique,
            columns: self.columns.clone(),
        }
    }
}

/// The untyped index descriptor held by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    /// Index name.
    pub name: &'static str,
    /// Target table name.
    pub table: &'static str,
    /// UNIQUE flag.
    pub unique: bool,
    /// Indexed column names, in order.
    pub columns: Vec<&'static str>,
}
