//! # ferrite-sql-core
//!
//! Driver-agnostic core of the ferrite ORM: the typed expression AST,
//! the SQL serializer, the schema model and the sync planner.
//!
//! This crate knows nothing about any database driver. It turns typed
//! expressions into [`Fragment`]s — SQL text plus the bind parameters in
//! placeholder order — and lowers declared tables into the shapes the
//! schema synchronizer diffs. The companion crate `ferrite-orm` executes
//! those fragments against SQLite.
//!
//! ## Example
//!
//! ```ignore
//! use ferrite_sql_core::{table, select, columns, ExprExt};
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
//! let query = select(columns((User::NAME, User::AGE)))
//!     .filter(User::AGE.gt(18))
//!     .order_by(User::NAME.asc());
//! ```

pub mod aggregates;
pub mod ddl;
pub mod error;
pub mod expr;
pub mod fields;
pub mod functions;
mod macros;
pub mod query;
pub mod row;
pub mod schema;
pub mod sync;
pub mod value;
pub mod writer;

pub use error::DecodeError;
pub use expr::{
    alias, all, cast, case, case_when, distinct, not, oid, rowid, underscore_rowid, AliasedField,
    Bound, BoxNode, Expr, ExprExt, Field, IntoExpr, IntoOrder, OrderSpec, QueryNode, TableAlias,
};
pub use fields::{FieldType, FieldValue, FromValue};
pub use query::{
    as_alias, assign, columns, except, exists, in_select, intersect, on, select, subselect, union,
    union_all, using, Assign, Columns, CompoundSelect, Conditions, IntoProjection, IntoSelect,
    JoinConstraint, Projection, Select, SetList, Subquery,
};
pub use row::RowReader;
pub use schema::{
    ColumnSpec, FkAction, ForeignKeySpec, Index, IndexSpec, Record, SortOrder, TableSpec,
};
pub use sync::{classify, columns_to_add, columns_to_drop, declared_table_info, SyncStatus, TableInfo};
pub use value::{ToValue, Value};
pub use writer::{Fragment, SqlWriter, TableSet};
