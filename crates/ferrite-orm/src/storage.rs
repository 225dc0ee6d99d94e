//! The storage facade: typed CRUD, aggregates, `select`, transactions
//! and engine pass-throughs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ferrite_sql_core::aggregates;
use ferrite_sql_core::{
    select, Conditions, Field, Fragment, FromValue, IntoSelect, Record, SetList, SqlWriter,
    TableSpec, ToValue, Value,
};
use rusqlite::limits::Limit;
use rusqlite::Connection;

use crate::catalog::{Catalog, Schema};
use crate::error::{Error, Result};
use crate::exec;
use crate::pragma::JournalMode;

/// A user-registered collating function.
pub type CollationFn =
    Arc<dyn Fn(&str, &str) -> std::cmp::Ordering + Send + Sync + std::panic::RefUnwindSafe>;

/// A storage instance: one declared schema over one database file.
///
/// All operations are synchronous and serialized in program order; a
/// storage encapsulates at most one logical connection at a time.
/// Callers that need concurrent access create separate storages.
///
/// # Example
///
/// ```ignore
/// use ferrite_orm::{table, Schema, Storage};
///
/// table! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct User in "users" {
///         id: i64 => ID [primary_key autoincrement],
///         name: String => NAME,
///         age: Option<i32> => AGE,
///     }
/// }
///
/// let mut storage = Storage::open("app.db", Schema::new().table(User::table()))?;
/// storage.sync_schema(false)?;
/// let id = storage.insert(&User { id: 0, name: "Alice".into(), age: Some(30) })?;
/// let alice: User = storage.get(id)?;
/// # Ok::<(), ferrite_orm::Error>(())
/// ```
pub struct Storage {
    pub(crate) path: String,
    pub(crate) in_memory: bool,
    pub(crate) open_forever: bool,
    pub(crate) in_transaction: bool,
    pub(crate) pinned: bool,
    pub(crate) conn: Option<Connection>,
    pub(crate) catalog: Catalog,
    pub(crate) collations: BTreeMap<String, CollationFn>,
    pub(crate) journal_mode: Option<JournalMode>,
    pub(crate) synchronous: Option<i32>,
    pub(crate) limits: Vec<(Limit, i32)>,
    pub(crate) on_open: Option<Box<dyn Fn(&Connection)>>,
}

/// Primary-key values for `get`/`get_optional`/`remove`: a single value
/// or a tuple matching a composite key.
pub trait IntoPkValues {
    /// Converts into bind values, in key order.
    fn into_pk_values(self) -> Vec<Value>;
}

macro_rules! scalar_pk {
    ($($t:ty),+) => {$(
        impl IntoPkValues for $t {
            fn into_pk_values(self) -> Vec<Value> {
                vec![self.to_value()]
            }
        }
    )+};
}

scalar_pk!(i8, i16, i32, i64, u8, u16, u32, u64, bool, f32, f64, String, &str, Vec<u8>);

impl<A: ToValue, B: ToValue> IntoPkValues for (A, B) {
    fn into_pk_values(self) -> Vec<Value> {
        vec![self.0.to_value(), self.1.to_value()]
    }
}

impl<A: ToValue, B: ToValue, C: ToValue> IntoPkValues for (A, B, C) {
    fn into_pk_values(self) -> Vec<Value> {
        vec![self.0.to_value(), self.1.to_value(), self.2.to_value()]
    }
}

impl<A: ToValue, B: ToValue, C: ToValue, D: ToValue> IntoPkValues for (A, B, C, D) {
    fn into_pk_values(self) -> Vec<Value> {
        vec![
            self.0.to_value(),
            self.1.to_value(),
            self.2.to_value(),
            self.3.to_value(),
        ]
    }
}

/// An explicit column list for `insert_with`.
pub trait ColumnList<R: Record> {
    /// The named columns, in order.
    fn names(&self) -> Vec<&'static str>;
}

impl<R: Record, T> ColumnList<R> for Field<R, T> {
    fn names(&self) -> Vec<&'static str> {
        vec![self.name()]
    }
}

macro_rules! impl_column_list {
    ($($t:ident . $idx:tt),+) => {
        impl<R: Record, $($t),+> ColumnList<R> for ($(Field<R, $t>,)+) {
            fn names(&self) -> Vec<&'static str> {
                vec![$( self.$idx.name() ),+]
            }
        }
    };
}

impl_column_list!(A.0);
impl_column_list!(A.0, B.1);
impl_column_list!(A.0, B.1, C.2);
impl_column_list!(A.0, B.1, C.2, D.3);
impl_column_list!(A.0, B.1, C.2, D.3, E.4);
impl_column_list!(A.0, B.1, C.2, D.3, E.4, F.5);

fn multi_values_fragment(
    verb: &str,
    spec: &TableSpec,
    indices: &[usize],
    rows: Vec<Vec<Value>>,
) -> Fragment {
    let mut w = SqlWriter::new(false, false);
    w.push(verb);
    w.push(" INTO ");
    w.push_table(spec.name);
    if indices.is_empty() {
        w.push(" DEFAULT VALUES");
        return w.finish();
    }
    w.push(" (");
    for (i, &idx) in indices.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push("\"");
        w.push(spec.columns[idx].name);
        w.push("\"");
    }
    w.push(") VALUES ");
    for (r, mut values) in rows.into_iter().enumerate() {
        if r > 0 {
            w.push(", ");
        }
        w.push("(");
        for (i, &idx) in indices.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_value(std::mem::replace(&mut values[idx], Value::Null));
        }
        w.push(")");
    }
    w.finish()
}

pub(crate) fn row_select_fragment(spec: &TableSpec, conds: &Conditions) -> Fragment {
    let mut w = SqlWriter::new(true, false);
    w.push("SELECT ");
    for (i, c) in spec.columns.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        w.push_column(spec.name, c.name);
    }
    w.push(" FROM ");
    w.push_table(spec.name);
    conds.emit(&mut w);
    w.finish()
}

fn push_pk_predicate(w: &mut SqlWriter, spec: &TableSpec, pk: &[usize], values: Vec<Value>) {
    w.push(" WHERE ");
    for (i, (&idx, value)) in pk.iter().zip(values).enumerate() {
        if i > 0 {
            w.push(" AND ");
        }
        w.push("\"");
        w.push(spec.columns[idx].name);
        w.push("\" = ");
        w.push_value(value);
    }
}

impl Storage {
    /// Opens a storage over the given database file.
    ///
    /// An empty path or `":memory:"` opens an in-memory database, whose
    /// connection is created immediately and held for the storage's
    /// lifetime.
    pub fn open(path: impl Into<String>, schema: Schema) -> Result<Self> {
        let path = path.into();
        let in_memory = path.is_empty() || path == ":memory:";
        let mut storage = Self {
            path,
            in_memory,
            open_forever: false,
            in_transaction: false,
            pinned: false,
            conn: None,
            catalog: Catalog::new(schema),
            collations: BTreeMap::new(),
            journal_mode: None,
            synchronous: None,
            limits: Vec::new(),
            on_open: None,
        };
        if storage.in_memory {
            let conn = storage.open_connection()?;
            storage.conn = Some(conn);
        }
        Ok(storage)
    }

    /// The registered table name for `R`, if mapped.
    #[must_use]
    pub fn find_table_name<R: Record>(&self) -> Option<&'static str> {
        self.catalog.find_table_name::<R>()
    }

    /// The table descriptor registered for `R`.
    pub fn table_spec<R: Record>(&self) -> Result<&TableSpec> {
        self.catalog.table_for::<R>()
    }

    // --- CRUD ------------------------------------------------------------

    /// Inserts a record and returns the assigned rowid.
    ///
    /// Columns with a single-column PRIMARY KEY constraint are omitted
    /// so the engine assigns the rowid; composite-key columns and every
    /// column of a WITHOUT ROWID table are bound.
    pub fn insert<R: Record>(&mut self, record: &R) -> Result<i64> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let indices = spec.insert_indices();
        let frag = multi_values_fragment("INSERT", &spec, &indices, vec![record.row_values()]);
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserts a record binding only the listed columns.
    pub fn insert_with<R: Record, C: ColumnList<R>>(
        &mut self,
        record: &R,
        columns: C,
    ) -> Result<i64> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let mut indices = Vec::new();
        for name in columns.names() {
            let idx = spec
                .column_index(name)
                .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
            indices.push(idx);
        }
        let frag = multi_values_fragment("INSERT", &spec, &indices, vec![record.row_values()]);
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserts every record in one multi-row statement. An empty range
    /// is a no-op.
    pub fn insert_range<'a, R: Record>(
        &mut self,
        records: impl IntoIterator<Item = &'a R>,
    ) -> Result<()> {
        let rows: Vec<Vec<Value>> = records.into_iter().map(Record::row_values).collect();
        if rows.is_empty() {
            return Ok(());
        }
        let spec = self.catalog.table_for::<R>()?.clone();
        let indices = spec.insert_indices();
        let frag = multi_values_fragment("INSERT", &spec, &indices, rows);
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// `REPLACE INTO` with all columns bound, primary key included.
    pub fn replace<R: Record>(&mut self, record: &R) -> Result<()> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let indices: Vec<usize> = (0..spec.columns.len()).collect();
        let frag = multi_values_fragment("REPLACE", &spec, &indices, vec![record.row_values()]);
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Batched `REPLACE INTO`. An empty range is a no-op.
    pub fn replace_range<'a, R: Record>(
        &mut self,
        records: impl IntoIterator<Item = &'a R>,
    ) -> Result<()> {
        let rows: Vec<Vec<Value>> = records.into_iter().map(Record::row_values).collect();
        if rows.is_empty() {
            return Ok(());
        }
        let spec = self.catalog.table_for::<R>()?.clone();
        let indices: Vec<usize> = (0..spec.columns.len()).collect();
        let frag = multi_values_fragment("REPLACE", &spec, &indices, rows);
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Updates a record's non-key columns, addressed by its primary key.
    pub fn update<R: Record>(&mut self, record: &R) -> Result<()> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let pk = spec.primary_key_indices();
        if pk.is_empty() {
            return Err(Error::NoPrimaryKey(spec.name));
        }
        let non_pk: Vec<usize> = (0..spec.columns.len())
            .filter(|i| !pk.contains(i))
            .collect();
        if non_pk.is_empty() {
            return Ok(());
        }
        let mut values = record.row_values();
        let mut w = SqlWriter::new(false, false);
        w.push("UPDATE ");
        w.push_table(spec.name);
        w.push(" SET ");
        for (i, &idx) in non_pk.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push("\"");
            w.push(spec.columns[idx].name);
            w.push("\" = ");
            w.push_value(std::mem::replace(&mut values[idx], Value::Null));
        }
        let pk_values: Vec<Value> = pk
            .iter()
            .map(|&idx| std::mem::replace(&mut values[idx], Value::Null))
            .collect();
        push_pk_predicate(&mut w, &spec, &pk, pk_values);
        let frag = w.finish();
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Cross-column, multi-row UPDATE from typed assignments.
    pub fn update_all<S: SetList>(&mut self, set: S, conds: Conditions) -> Result<()> {
        let assigns = set.into_assigns();
        if assigns.is_empty() {
            return Err(Error::EmptySet);
        }
        let tables: BTreeSet<&str> = assigns.iter().map(|a| a.table).collect();
        if tables.len() > 1 {
            return Err(Error::TooManyTables);
        }
        let mut w = SqlWriter::new(true, false);
        w.push("UPDATE ");
        w.push_table(assigns[0].table);
        w.push(" SET ");
        for (i, a) in assigns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push("\"");
            w.push(a.column);
            w.push("\" = ");
            a.rhs.emit(&mut w);
        }
        conds.emit(&mut w);
        let frag = w.finish();
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Deletes one row by primary key.
    pub fn remove<R: Record, K: IntoPkValues>(&mut self, ids: K) -> Result<()> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let pk = spec.primary_key_indices();
        if pk.is_empty() {
            return Err(Error::NoPrimaryKey(spec.name));
        }
        let values = ids.into_pk_values();
        if values.len() != pk.len() {
            return Err(Error::PkArityMismatch {
                expected: pk.len(),
                got: values.len(),
            });
        }
        let mut w = SqlWriter::new(false, false);
        w.push("DELETE FROM ");
        w.push_table(spec.name);
        push_pk_predicate(&mut w, &spec, &pk, values);
        let frag = w.finish();
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Bulk delete under the given conditions.
    pub fn remove_all<R: Record>(&mut self, conds: Conditions) -> Result<()> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let mut w = SqlWriter::new(true, false);
        w.push("DELETE FROM ");
        w.push_table(spec.name);
        conds.emit(&mut w);
        let frag = w.finish();
        let conn = self.connection()?;
        exec::execute_dml(&conn, &frag)?;
        Ok(())
    }

    /// Fetches one record by primary key; fails with
    /// [`Error::NotFound`] when there is no such row.
    pub fn get<R: Record, K: IntoPkValues>(&mut self, ids: K) -> Result<R> {
        exec::require_row(self.get_optional::<R, K>(ids)?)
    }

    /// Fetches one record by primary key, or `None`.
    pub fn get_optional<R: Record, K: IntoPkValues>(&mut self, ids: K) -> Result<Option<R>> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let pk = spec.primary_key_indices();
        if pk.is_empty() {
            return Err(Error::NoPrimaryKey(spec.name));
        }
        let values = ids.into_pk_values();
        if values.len() != pk.len() {
            return Err(Error::PkArityMismatch {
                expected: pk.len(),
                got: values.len(),
            });
        }
        let mut w = SqlWriter::new(true, false);
        w.push("SELECT ");
        for (i, c) in spec.columns.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push_column(spec.name, c.name);
        }
        w.push(" FROM ");
        w.push_table(spec.name);
        push_pk_predicate(&mut w, &spec, &pk, values);
        let frag = w.finish();
        let conn = self.connection()?;
        exec::query_optional(&conn, &frag, |r| R::from_row(r).map_err(Error::from))
    }

    /// Fetches every matching record.
    pub fn get_all<R: Record>(&mut self, conds: Conditions) -> Result<Vec<R>> {
        let spec = self.catalog.table_for::<R>()?.clone();
        let frag = row_select_fragment(&spec, &conds);
        let conn = self.connection()?;
        exec::query_rows(&conn, &frag, |r| R::from_row(r).map_err(Error::from))
    }

    /// Runs a typed SELECT (plain or compound) and collects the rows.
    pub fn select<S: IntoSelect>(&mut self, sel: S) -> Result<Vec<S::Output>> {
        let frag = sel.fragment(false);
        let conn = self.connection()?;
        exec::query_rows(&conn, &frag, |r| sel.decode(r).map_err(Error::from))
    }

    // --- Aggregates ------------------------------------------------------

    /// `COUNT(*)` over the mapped table.
    pub fn count<R: Record>(&mut self, conds: Conditions) -> Result<i64> {
        self.catalog.table_for::<R>()?;
        let rows = self.select(select(aggregates::count_all::<R>()).with(conds))?;
        Ok(rows.into_iter().next().unwrap_or(0))
    }

    /// `COUNT(column)`: counts non-NULL values.
    pub fn count_field<R: Record, T: 'static>(
        &mut self,
        field: Field<R, T>,
        conds: Conditions,
    ) -> Result<i64> {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::count(field)).with(conds))?;
        Ok(rows.into_iter().next().unwrap_or(0))
    }

    /// `AVG(column)`; `0.0` over an empty set.
    pub fn avg<R: Record, T: 'static>(
        &mut self,
        field: Field<R, T>,
        conds: Conditions,
    ) -> Result<f64> {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::avg(field)).with(conds))?;
        Ok(rows.into_iter().next().flatten().unwrap_or(0.0))
    }

    /// `SUM(column)`; `None` over an empty set.
    pub fn sum<R: Record, T>(&mut self, field: Field<R, T>, conds: Conditions) -> Result<Option<T>>
    where
        T: FromValue + 'static,
    {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::sum(field)).with(conds))?;
        Ok(rows.into_iter().next().flatten())
    }

    /// `TOTAL(column)`: always a float, `0.0` over an empty set.
    pub fn total<R: Record, T: 'static>(
        &mut self,
        field: Field<R, T>,
        conds: Conditions,
    ) -> Result<f64> {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::total(field)).with(conds))?;
        Ok(rows.into_iter().next().unwrap_or(0.0))
    }

    /// `MIN(column)`; `None` over an empty set.
    pub fn min<R: Record, T>(&mut self, field: Field<R, T>, conds: Conditions) -> Result<Option<T>>
    where
        T: FromValue + 'static,
    {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::min(field)).with(conds))?;
        Ok(rows.into_iter().next().flatten())
    }

    /// `MAX(column)`; `None` over an empty set.
    pub fn max<R: Record, T>(&mut self, field: Field<R, T>, conds: Conditions) -> Result<Option<T>>
    where
        T: FromValue + 'static,
    {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::max(field)).with(conds))?;
        Ok(rows.into_iter().next().flatten())
    }

    /// `GROUP_CONCAT(column)`; the empty string over an empty set.
    pub fn group_concat<R: Record, T: 'static>(
        &mut self,
        field: Field<R, T>,
        conds: Conditions,
    ) -> Result<String> {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::group_concat(field)).with(conds))?;
        Ok(rows.into_iter().next().flatten().unwrap_or_default())
    }

    /// `GROUP_CONCAT(column, separator)`; the empty string over an
    /// empty set.
    pub fn group_concat_sep<R: Record, T: 'static>(
        &mut self,
        field: Field<R, T>,
        separator: &str,
        conds: Conditions,
    ) -> Result<String> {
        self.catalog.column_index(field)?;
        let rows = self.select(select(aggregates::group_concat_sep(field, separator)).with(conds))?;
        Ok(rows.into_iter().next().flatten().unwrap_or_default())
    }

    // --- Transactions ----------------------------------------------------

    /// Opens a transaction; the connection becomes sticky until commit
    /// or rollback.
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(Error::NestedTransaction);
        }
        let conn = match self.conn.take() {
            Some(c) => c,
            None => self.open_connection()?,
        };
        let conn = self.conn.insert(conn);
        exec::exec(conn, "BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    /// Commits the active transaction.
    pub fn commit(&mut self) -> Result<()> {
        self.end_transaction("COMMIT")
    }

    /// Rolls back the active transaction.
    pub fn rollback(&mut self) -> Result<()> {
        self.end_transaction("ROLLBACK")
    }

    fn end_transaction(&mut self, sql: &str) -> Result<()> {
        if !self.in_transaction {
            return Err(Error::NoActiveTransaction);
        }
        match self.conn {
            Some(ref conn) => exec::exec(conn, sql)?,
            None => return Err(Error::NoActiveTransaction),
        }
        self.in_transaction = false;
        if !self.in_memory && !self.open_forever {
            self.conn = None;
        }
        Ok(())
    }

    /// Runs `f` inside a transaction: commits when it returns
    /// `Ok(true)`, rolls back on `Ok(false)` or error.
    pub fn transaction<F>(&mut self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Self) -> Result<bool>,
    {
        self.begin_transaction()?;
        match f(self) {
            Ok(true) => {
                self.commit()?;
                Ok(true)
            }
            Ok(false) => {
                self.rollback()?;
                Ok(false)
            }
            Err(e) => {
                self.rollback()?;
                Err(e)
            }
        }
    }

    // --- Connection mode and hooks ---------------------------------------

    /// Keeps the connection open for the rest of the storage's lifetime.
    pub fn open_forever(&mut self) -> Result<()> {
        self.open_forever = true;
        if self.conn.is_none() {
            let conn = self.open_connection()?;
            self.conn = Some(conn);
        }
        Ok(())
    }

    /// Installs a hook run on every newly opened connection, after
    /// PRAGMAs, collations and limits.
    pub fn set_on_open(&mut self, hook: impl Fn(&Connection) + 'static) {
        self.on_open = Some(Box::new(hook));
    }

    /// Registers a collating function, on the live connection (if any)
    /// and on every future one. Names are matched case-sensitively by
    /// this registry; the engine itself looks collations up
    /// case-insensitively.
    pub fn create_collation(&mut self, name: &str, f: CollationFn) -> Result<()> {
        self.collations.insert(name.to_string(), Arc::clone(&f));
        if let Some(ref conn) = self.conn {
            conn.create_collation(name, move |a, b| f(a, b))
                .map_err(crate::error::exec_err)?;
        }
        Ok(())
    }

    /// Unregisters a collating function; takes effect on the next
    /// connection open.
    pub fn remove_collation(&mut self, name: &str) {
        self.collations.remove(name);
    }

    // --- Engine pass-throughs --------------------------------------------

    /// Rows changed by the most recent statement on the current
    /// connection.
    pub fn changes(&mut self) -> Result<i64> {
        let conn = self.connection()?;
        exec::query_scalar(&conn, "SELECT changes()")
    }

    /// Total rows changed since the current connection opened.
    pub fn total_changes(&mut self) -> Result<i64> {
        let conn = self.connection()?;
        exec::query_scalar(&conn, "SELECT total_changes()")
    }

    /// The rowid of the most recent successful INSERT on the current
    /// connection.
    pub fn last_insert_rowid(&mut self) -> Result<i64> {
        let conn = self.connection()?;
        Ok(conn.last_insert_rowid())
    }

    /// Forwards to the engine's busy handler.
    pub fn busy_timeout(&mut self, ms: u64) -> Result<()> {
        let conn = self.connection()?;
        conn.busy_timeout(std::time::Duration::from_millis(ms))
            .map_err(crate::error::exec_err)
    }

    /// Asks the engine to release freeable memory.
    pub fn db_release_memory(&mut self) -> Result<()> {
        let conn = self.connection()?;
        conn.release_memory().map_err(crate::error::exec_err)
    }

    /// The linked SQLite library version.
    #[must_use]
    pub fn libversion(&self) -> &'static str {
        rusqlite::version()
    }

    /// The engine's `CURRENT_TIMESTAMP`.
    pub fn current_timestamp(&mut self) -> Result<String> {
        let conn = self.connection()?;
        exec::query_scalar(&conn, "SELECT CURRENT_TIMESTAMP")
    }

    /// Drops a table by name, mapped or not.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let sql = ferrite_sql_core::ddl::drop_table_sql(name);
        let conn = self.connection()?;
        exec::exec(&conn, &sql)
    }

    /// Whether a table exists in the live database.
    pub fn table_exists(&mut self, name: &str) -> Result<bool> {
        let conn = self.connection()?;
        crate::sync::table_exists(&conn, name)
    }

    /// Names of the permanent tables in the live database.
    pub fn table_names(&mut self) -> Result<Vec<String>> {
        let frag = Fragment {
            sql: String::from("SELECT name FROM sqlite_master WHERE type='table'"),
            params: Vec::new(),
        };
        let conn = self.connection()?;
        exec::query_rows(&conn, &frag, |r| r.next_as::<String>().map_err(Error::from))
    }
}
