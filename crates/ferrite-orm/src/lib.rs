//! # ferrite-orm
//!
//! A typed ORM facade over SQLite: declare tables in Rust, then perform
//! typed CRUD, expression-based SELECTs, aggregates, schema
//! synchronization, transactions and streaming iteration.
//!
//! ## Quick start
//!
//! ```ignore
//! use ferrite_orm::{table, Conditions, ExprExt, Schema, Storage};
//!
//! table! {
//!     #[derive(Debug, Clone, PartialEq, Default)]
//!     pub struct User in "users" {
//!         id: i64 => ID [primary_key autoincrement],
//!         name: String => NAME,
//!         age: Option<i32> => AGE,
//!     }
//! }
//!
//! fn main() -> ferrite_orm::Result<()> {
//!     let mut storage = Storage::open("app.db", Schema::new().table(User::table()))?;
//!     storage.sync_schema(false)?;
//!
//!     let id = storage.insert(&User { id: 0, name: "Alice".into(), age: Some(30) })?;
//!     let alice: User = storage.get(id)?;
//!
//!     let adults = storage.get_all::<User>(
//!         Conditions::new().filter(User::AGE.gt(18)).order_by(User::NAME.asc()),
//!     )?;
//!
//!     let names: Vec<String> = storage.select(
//!         ferrite_orm::select(User::NAME).filter(User::AGE.is_not_null()),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! ## Typed expressions
//!
//! Column constants generated by [`table!`] carry their Rust type, so a
//! `select` of an expression yields exactly the type the expression
//! produces, and comparisons against the wrong type do not compile.
//! Compound operators (`union`, `union_all`, `intersect`, `except`)
//! combine whole SELECTs; the combined statement accepts no further
//! conditions, by construction.

mod bind;
mod catalog;
mod connection;
mod cursor;
mod error;
mod exec;
mod limits;
mod pragma;
mod storage;
mod sync;

pub use catalog::Schema;
pub use cursor::RowCursor;
pub use error::{Error, Result};
pub use limits::Limits;
pub use pragma::{JournalMode, Pragma};
pub use storage::{CollationFn, ColumnList, IntoPkValues, Storage};

// The driver, for `on_open` hooks and advanced use.
pub use rusqlite;

// Re-export the core surface so one dependency is enough.
pub use ferrite_sql_core::aggregates;
pub use ferrite_sql_core::ddl;
pub use ferrite_sql_core::functions;
pub use ferrite_sql_core::table;
pub use ferrite_sql_core::{
    alias, all, as_alias, assign, case, case_when, cast, columns, distinct, except, exists,
    in_select, intersect, not, oid, on, rowid, select, subselect, underscore_rowid, union,
    union_all, using,
};
pub use ferrite_sql_core::{
    AliasedField, Assign, Bound, ColumnSpec, Columns, CompoundSelect, Conditions, DecodeError,
    Expr, ExprExt, Field, FieldType, FieldValue, FkAction, ForeignKeySpec, Fragment, FromValue,
    Index, IndexSpec, IntoExpr, IntoOrder, IntoProjection, IntoSelect, JoinConstraint, OrderSpec,
    Projection, QueryNode, Record, RowReader, Select, SetList, SortOrder, SqlWriter, Subquery,
    SyncStatus, TableAlias, TableInfo, TableSet, TableSpec, ToValue, Value,
};
