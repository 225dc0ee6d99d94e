//! The typed expression AST.
//!
//! Every node implements [`QueryNode`]: one `emit` traversal writes the
//! SQL text and collects bind parameters through the same writer, and
//! `tables` reports the `(table, alias)` pairs the node references.
//! [`Expr`] layers the host result type on top, so a `SELECT` of an
//! expression is typed at compile time.
//!
//! Nodes are immutable after construction and own their children.

use std::marker::PhantomData;

use crate::fields::FieldValue;
use crate::schema::{Record, SortOrder};
use crate::value::{ToValue, Value};
use crate::writer::{SqlWriter, TableSet};

/// A serializable piece of a statement.
pub trait QueryNode {
    /// Writes the node's SQL, pushing bindable leaves through the writer.
    fn emit(&self, w: &mut SqlWriter);

    /// Adds the `(table, alias)` pairs this node references.
    fn tables(&self, out: &mut TableSet) {
        let _ = out;
    }
}

/// A boxed, type-erased node.
pub type BoxNode = Box<dyn QueryNode>;

impl QueryNode for Box<dyn QueryNode> {
    fn emit(&self, w: &mut SqlWriter) {
        (**self).emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        (**self).tables(out);
    }
}

/// A node with a known host result type.
pub trait Expr: QueryNode {
    /// The host type this expression produces in a SELECT list.
    type Output;
}

/// Anything convertible into an expression of output type `T` — an
/// expression itself, or a plain value that becomes a bound literal.
pub trait IntoExpr<T> {
    /// The resulting node type.
    type E: Expr<Output = T>;

    /// Performs the conversion.
    fn into_expr(self) -> Self::E;
}

/// A typed column reference: the accessor identity is the record type
/// plus the column name.
pub struct Field<R, T> {
    name: &'static str,
    _marker: PhantomData<fn(&R) -> T>,
}

impl<R, T> Field<R, T> {
    /// Creates a column reference. Normally generated by
    /// [`table!`](crate::table).
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The column name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<R, T> Clone for Field<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for Field<R, T> {}

impl<R: Record, T> QueryNode for Field<R, T> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push_column(R::TABLE_NAME, self.name);
    }

    fn tables(&self, out: &mut TableSet) {
        out.insert((R::TABLE_NAME.to_string(), String::new()));
    }
}

impl<R: Record, T> Expr for Field<R, T> {
    type Output = T;
}

impl<R: Record, T> IntoExpr<T> for Field<R, T> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// A table alias, for joins and self-joins.
pub struct TableAlias<R> {
    alias: &'static str,
    _marker: PhantomData<fn() -> R>,
}

/// Creates a table alias for the table mapped by `R`.
#[must_use]
pub fn alias<R: Record>(alias_name: &'static str) -> TableAlias<R> {
    TableAlias {
        alias: alias_name,
        _marker: PhantomData,
    }
}

impl<R: Record> TableAlias<R> {
    /// The alias text.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.alias
    }

    /// References a column through the alias.
    #[must_use]
    pub fn col<T>(&self, field: Field<R, T>) -> AliasedField<R, T> {
        AliasedField {
            alias: self.alias,
            name: field.name(),
            _marker: PhantomData,
        }
    }
}

/// A column reference through a table alias.
pub struct AliasedField<R, T> {
    alias: &'static str,
    name: &'static str,
    _marker: PhantomData<fn(&R) -> T>,
}

impl<R, T> Clone for AliasedField<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for AliasedField<R, T> {}

impl<R: Record, T> QueryNode for AliasedField<R, T> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push_aliased_column(self.alias, self.name);
    }

    fn tables(&self, out: &mut TableSet) {
        out.insert((R::TABLE_NAME.to_string(), self.alias.to_string()));
    }
}

impl<R: Record, T> Expr for AliasedField<R, T> {
    type Output = T;
}

impl<R: Record, T> IntoExpr<T> for AliasedField<R, T> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// A bound literal leaf; renders as `?`.
pub struct Bound<T> {
    value: Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Bound<T> {
    /// Wraps an already-converted value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }
}

impl<T> QueryNode for Bound<T> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push_value(self.value.clone());
    }
}

impl<T> Expr for Bound<T> {
    type Output = T;
}

impl<T> IntoExpr<T> for Bound<T> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

impl<T: ToValue> IntoExpr<Option<T>> for Option<T> {
    type E = Bound<Option<T>>;

    fn into_expr(self) -> Bound<Option<T>> {
        Bound::new(self.to_value())
    }
}

macro_rules! scalar_into_expr {
    ($target:ty => $($src:ty),+) => {$(
        impl IntoExpr<$target> for $src {
            type E = Bound<$target>;

            fn into_expr(self) -> Bound<$target> {
                Bound::new(self.to_value())
            }
        }

        impl IntoExpr<Option<$target>> for $src {
            type E = Bound<Option<$target>>;

            fn into_expr(self) -> Bound<Option<$target>> {
                Bound::new(self.to_value())
            }
        }
    )+};
}

scalar_into_expr!(i64 => i64, i32, i16, i8, u8, u16, u32, u64);
scalar_into_expr!(i32 => i32, i16, i8, u8, u16);
scalar_into_expr!(i16 => i16, i8, u8);
scalar_into_expr!(i8 => i8);
scalar_into_expr!(u64 => u64, u32, u16, u8);
scalar_into_expr!(u32 => u32, u16, u8);
scalar_into_expr!(u16 => u16, u8);
scalar_into_expr!(u8 => u8);
scalar_into_expr!(f64 => f64, f32, i64, i32);
scalar_into_expr!(f32 => f32);
scalar_into_expr!(bool => bool);
scalar_into_expr!(String => String, &str);
scalar_into_expr!(Vec<u8> => Vec<u8>, &[u8]);

macro_rules! node_into_expr {
    ($node:ident<$($g:ident),+>, $out:ty) => {
        impl<$($g: Expr),+> IntoExpr<$out> for $node<$($g),+> {
            type E = Self;

            fn into_expr(self) -> Self {
                self
            }
        }
    };
}

/// A comparison; produces a boolean.
pub struct Cmp<L, R> {
    lhs: L,
    op: &'static str,
    rhs: R,
}

impl<L: Expr, R: Expr> QueryNode for Cmp<L, R> {
    fn emit(&self, w: &mut SqlWriter) {
        self.lhs.emit(w);
        w.push(" ");
        w.push(self.op);
        w.push(" ");
        self.rhs.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.lhs.tables(out);
        self.rhs.tables(out);
    }
}

impl<L: Expr, R: Expr> Expr for Cmp<L, R> {
    type Output = bool;
}

node_into_expr!(Cmp<L, R>, bool);

/// Boolean AND; operands are parenthesized.
pub struct AndOp<L, R> {
    lhs: L,
    rhs: R,
}

impl<L: Expr, R: Expr> QueryNode for AndOp<L, R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("(");
        self.lhs.emit(w);
        w.push(" AND ");
        self.rhs.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.lhs.tables(out);
        self.rhs.tables(out);
    }
}

impl<L: Expr, R: Expr> Expr for AndOp<L, R> {
    type Output = bool;
}

node_into_expr!(AndOp<L, R>, bool);

/// Boolean OR; operands are parenthesized.
pub struct OrOp<L, R> {
    lhs: L,
    rhs: R,
}

impl<L: Expr, R: Expr> QueryNode for OrOp<L, R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("(");
        self.lhs.emit(w);
        w.push(" OR ");
        self.rhs.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.lhs.tables(out);
        self.rhs.tables(out);
    }
}

impl<L: Expr, R: Expr> Expr for OrOp<L, R> {
    type Output = bool;
}

node_into_expr!(OrOp<L, R>, bool);

/// Boolean NOT.
pub struct NotOp<E> {
    inner: E,
}

/// Negates a boolean expression.
#[must_use]
pub fn not<E: IntoExpr<bool>>(e: E) -> NotOp<E::E> {
    NotOp {
        inner: e.into_expr(),
    }
}

impl<E: Expr> QueryNode for NotOp<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("NOT (");
        self.inner.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for NotOp<E> {
    type Output = bool;
}

node_into_expr!(NotOp<E>, bool);

/// IS NULL check.
pub struct IsNull<E> {
    inner: E,
}

impl<E: Expr> QueryNode for IsNull<E> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" IS NULL");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for IsNull<E> {
    type Output = bool;
}

node_into_expr!(IsNull<E>, bool);

/// IS NOT NULL check.
pub struct IsNotNull<E> {
    inner: E,
}

impl<E: Expr> QueryNode for IsNotNull<E> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" IS NOT NULL");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for IsNotNull<E> {
    type Output = bool;
}

node_into_expr!(IsNotNull<E>, bool);

/// LIKE pattern match.
pub struct Like<E, P> {
    inner: E,
    pattern: P,
}

impl<E: Expr, P: Expr> QueryNode for Like<E, P> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" LIKE ");
        self.pattern.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
        self.pattern.tables(out);
    }
}

impl<E: Expr, P: Expr> Expr for Like<E, P> {
    type Output = bool;
}

node_into_expr!(Like<E, P>, bool);

/// BETWEEN range check.
pub struct Between<E, L, H> {
    inner: E,
    low: L,
    high: H,
}

impl<E: Expr, L: Expr, H: Expr> QueryNode for Between<E, L, H> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" BETWEEN ");
        self.low.emit(w);
        w.push(" AND ");
        self.high.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
        self.low.tables(out);
        self.high.tables(out);
    }
}

impl<E: Expr, L: Expr, H: Expr> Expr for Between<E, L, H> {
    type Output = bool;
}

node_into_expr!(Between<E, L, H>, bool);

/// IN with an inline list; every element is still a bindable leaf.
pub struct InList<E, I> {
    inner: E,
    items: Vec<I>,
}

impl<E: Expr, I: Expr> QueryNode for InList<E, I> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" IN (");
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            item.emit(w);
        }
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
        for item in &self.items {
            item.tables(out);
        }
    }
}

impl<E: Expr, I: Expr> Expr for InList<E, I> {
    type Output = bool;
}

node_into_expr!(InList<E, I>, bool);

/// Binary arithmetic; result type follows the left operand.
pub struct Arith<L, R> {
    lhs: L,
    op: &'static str,
    rhs: R,
}

impl<L: Expr, R: Expr> QueryNode for Arith<L, R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("(");
        self.lhs.emit(w);
        w.push(" ");
        w.push(self.op);
        w.push(" ");
        self.rhs.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.lhs.tables(out);
        self.rhs.tables(out);
    }
}

impl<L: Expr, R: Expr> Expr for Arith<L, R> {
    type Output = L::Output;
}

impl<L: Expr, R: Expr> IntoExpr<L::Output> for Arith<L, R> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// String concatenation (`||`).
pub struct Concat<L, R> {
    lhs: L,
    rhs: R,
}

impl<L: Expr, R: Expr> QueryNode for Concat<L, R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("(");
        self.lhs.emit(w);
        w.push(" || ");
        self.rhs.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.lhs.tables(out);
        self.rhs.tables(out);
    }
}

impl<L: Expr, R: Expr> Expr for Concat<L, R> {
    type Output = String;
}

node_into_expr!(Concat<L, R>, String);

/// COLLATE applied to an expression.
pub struct CollateExpr<E> {
    inner: E,
    collation: &'static str,
}

impl<E: Expr> QueryNode for CollateExpr<E> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" COLLATE ");
        w.push(self.collation);
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for CollateExpr<E> {
    type Output = E::Output;
}

impl<E: Expr> IntoExpr<E::Output> for CollateExpr<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// CAST to another field type.
pub struct Cast<T, E> {
    inner: E,
    _marker: PhantomData<fn() -> T>,
}

/// Builds `CAST(e AS T)`.
#[must_use]
pub fn cast<T: FieldValue, E: Expr>(e: E) -> Cast<T, E> {
    Cast {
        inner: e,
        _marker: PhantomData,
    }
}

impl<T: FieldValue, E: Expr> QueryNode for Cast<T, E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("CAST(");
        self.inner.emit(w);
        w.push(" AS ");
        w.push(T::FIELD_TYPE.as_sql());
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<T: FieldValue, E: Expr> Expr for Cast<T, E> {
    type Output = T;
}

impl<T: FieldValue, E: Expr> IntoExpr<T> for Cast<T, E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// DISTINCT wrapper, usable inside aggregates.
pub struct Distinct<E> {
    inner: E,
}

/// Wraps an expression in DISTINCT.
#[must_use]
pub fn distinct<E: Expr>(e: E) -> Distinct<E> {
    Distinct { inner: e }
}

impl<E: Expr> QueryNode for Distinct<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("DISTINCT ");
        self.inner.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for Distinct<E> {
    type Output = E::Output;
}

impl<E: Expr> IntoExpr<E::Output> for Distinct<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// ALL wrapper, the dual of [`distinct`].
pub struct AllOf<E> {
    inner: E,
}

/// Wraps an expression in ALL.
#[must_use]
pub fn all<E: Expr>(e: E) -> AllOf<E> {
    AllOf { inner: e }
}

impl<E: Expr> QueryNode for AllOf<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("ALL ");
        self.inner.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for AllOf<E> {
    type Output = E::Output;
}

impl<E: Expr> IntoExpr<E::Output> for AllOf<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// Which rowid spelling a pseudo-column uses.
#[derive(Debug, Clone, Copy)]
enum RowidKind {
    Rowid,
    Oid,
    UnderscoreRowid,
}

impl RowidKind {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Rowid => "rowid",
            Self::Oid => "oid",
            Self::UnderscoreRowid => "_rowid_",
        }
    }
}

/// A rowid pseudo-column of the table mapped by `R`.
pub struct Rowid<R> {
    kind: RowidKind,
    _marker: PhantomData<fn() -> R>,
}

/// The `rowid` pseudo-column.
#[must_use]
pub fn rowid<R: Record>() -> Rowid<R> {
    Rowid {
        kind: RowidKind::Rowid,
        _marker: PhantomData,
    }
}

/// The `oid` pseudo-column.
#[must_use]
pub fn oid<R: Record>() -> Rowid<R> {
    Rowid {
        kind: RowidKind::Oid,
        _marker: PhantomData,
    }
}

/// The `_rowid_` pseudo-column.
#[must_use]
pub fn underscore_rowid<R: Record>() -> Rowid<R> {
    Rowid {
        kind: RowidKind::UnderscoreRowid,
        _marker: PhantomData,
    }
}

impl<R: Record> QueryNode for Rowid<R> {
    fn emit(&self, w: &mut SqlWriter) {
        if w.qualify() {
            w.push_table(R::TABLE_NAME);
            w.push(".");
        }
        w.push(self.kind.as_sql());
    }

    fn tables(&self, out: &mut TableSet) {
        out.insert((R::TABLE_NAME.to_string(), String::new()));
    }
}

impl<R: Record> Expr for Rowid<R> {
    type Output = i64;
}

impl<R: Record> IntoExpr<i64> for Rowid<R> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// A CASE expression. `SV` is the scrutinee/WHEN type, `R` the result.
pub struct Case<SV, R> {
    scrutinee: Option<BoxNode>,
    arms: Vec<(BoxNode, BoxNode)>,
    else_: Option<BoxNode>,
    _marker: PhantomData<fn(SV) -> R>,
}

/// Starts a simple CASE over a scrutinee expression.
#[must_use]
pub fn case<S>(scrutinee: S) -> CaseOn<S::Output>
where
    S: Expr + 'static,
{
    CaseOn {
        scrutinee: Box::new(scrutinee),
        _marker: PhantomData,
    }
}

/// Starts a searched CASE from its first WHEN/THEN arm.
#[must_use]
pub fn case_when<W, T, R>(when: W, then: T) -> Case<bool, R>
where
    W: IntoExpr<bool>,
    W::E: 'static,
    T: IntoExpr<R>,
    T::E: 'static,
{
    Case {
        scrutinee: None,
        arms: vec![(
            Box::new(when.into_expr()) as BoxNode,
            Box::new(then.into_expr()) as BoxNode,
        )],
        else_: None,
        _marker: PhantomData,
    }
}

/// A simple CASE waiting for its first arm, which fixes the result type.
pub struct CaseOn<SV> {
    scrutinee: BoxNode,
    _marker: PhantomData<fn(SV)>,
}

impl<SV: 'static> CaseOn<SV> {
    /// Adds the first WHEN/THEN arm.
    #[must_use]
    pub fn when<W, T, R>(self, when: W, then: T) -> Case<SV, R>
    where
        W: IntoExpr<SV>,
        W::E: 'static,
        T: IntoExpr<R>,
        T::E: 'static,
    {
        Case {
            scrutinee: Some(self.scrutinee),
            arms: vec![(
                Box::new(when.into_expr()) as BoxNode,
                Box::new(then.into_expr()) as BoxNode,
            )],
            else_: None,
            _marker: PhantomData,
        }
    }
}

impl<SV: 'static, R: 'static> Case<SV, R> {
    /// Adds another WHEN/THEN arm.
    #[must_use]
    pub fn when<W, T>(mut self, when: W, then: T) -> Self
    where
        W: IntoExpr<SV>,
        W::E: 'static,
        T: IntoExpr<R>,
        T::E: 'static,
    {
        self.arms.push((
            Box::new(when.into_expr()) as BoxNode,
            Box::new(then.into_expr()) as BoxNode,
        ));
        self
    }

    /// Sets the ELSE branch.
    #[must_use]
    pub fn otherwise<T>(mut self, e: T) -> Self
    where
        T: IntoExpr<R>,
        T::E: 'static,
    {
        self.else_ = Some(Box::new(e.into_expr()) as BoxNode);
        self
    }
}

impl<SV, R> QueryNode for Case<SV, R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("CASE");
        if let Some(ref s) = self.scrutinee {
            w.push(" ");
            s.emit(w);
        }
        for (when, then) in &self.arms {
            w.push(" WHEN ");
            when.emit(w);
            w.push(" THEN ");
            then.emit(w);
        }
        if let Some(ref e) = self.else_ {
            w.push(" ELSE ");
            e.emit(w);
        }
        w.push(" END");
    }

    fn tables(&self, out: &mut TableSet) {
        if let Some(ref s) = self.scrutinee {
            s.tables(out);
        }
        for (when, then) in &self.arms {
            when.tables(out);
            then.tables(out);
        }
        if let Some(ref e) = self.else_ {
            e.tables(out);
        }
    }
}

impl<SV, R> Expr for Case<SV, R> {
    type Output = R;
}

impl<SV, R> IntoExpr<R> for Case<SV, R> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// An ordering term: expression, optional collation, tri-state direction.
pub struct OrderSpec {
    pub(crate) node: BoxNode,
    pub(crate) direction: Option<SortOrder>,
    pub(crate) collation: Option<&'static str>,
}

impl OrderSpec {
    /// Sets a collation on the ordering term.
    #[must_use]
    pub fn collate(mut self, name: &'static str) -> Self {
        self.collation = Some(name);
        self
    }
}

impl QueryNode for OrderSpec {
    fn emit(&self, w: &mut SqlWriter) {
        self.node.emit(w);
        if let Some(c) = self.collation {
            w.push(" COLLATE ");
            w.push(c);
        }
        if let Some(d) = self.direction {
            w.push(" ");
            w.push(d.as_sql());
        }
    }

    fn tables(&self, out: &mut TableSet) {
        self.node.tables(out);
    }
}

/// Anything usable as an ORDER BY term.
pub trait IntoOrder {
    /// Converts into an ordering term.
    fn into_order(self) -> OrderSpec;
}

impl IntoOrder for OrderSpec {
    fn into_order(self) -> OrderSpec {
        self
    }
}

impl<E: Expr + 'static> IntoOrder for E {
    fn into_order(self) -> OrderSpec {
        OrderSpec {
            node: Box::new(self),
            direction: None,
            collation: None,
        }
    }
}

/// Operator methods available on every expression.
pub trait ExprExt: Expr + Sized {
    /// `=` comparison.
    fn eq<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: "=",
            rhs: v.into_expr(),
        }
    }

    /// `!=` comparison.
    fn ne<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: "!=",
            rhs: v.into_expr(),
        }
    }

    /// `<` comparison.
    fn lt<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: "<",
            rhs: v.into_expr(),
        }
    }

    /// `<=` comparison.
    fn le<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: "<=",
            rhs: v.into_expr(),
        }
    }

    /// `>` comparison.
    fn gt<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: ">",
            rhs: v.into_expr(),
        }
    }

    /// `>=` comparison.
    fn ge<V: IntoExpr<Self::Output>>(self, v: V) -> Cmp<Self, V::E> {
        Cmp {
            lhs: self,
            op: ">=",
            rhs: v.into_expr(),
        }
    }

    /// Boolean AND.
    fn and<V: IntoExpr<bool>>(self, v: V) -> AndOp<Self, V::E>
    where
        Self: Expr<Output = bool>,
    {
        AndOp {
            lhs: self,
            rhs: v.into_expr(),
        }
    }

    /// Boolean OR.
    fn or<V: IntoExpr<bool>>(self, v: V) -> OrOp<Self, V::E>
    where
        Self: Expr<Output = bool>,
    {
        OrOp {
            lhs: self,
            rhs: v.into_expr(),
        }
    }

    /// IS NULL check.
    fn is_null(self) -> IsNull<Self> {
        IsNull { inner: self }
    }

    /// IS NOT NULL check.
    fn is_not_null(self) -> IsNotNull<Self> {
        IsNotNull { inner: self }
    }

    /// LIKE pattern match.
    fn like<P: IntoExpr<String>>(self, pattern: P) -> Like<Self, P::E> {
        Like {
            inner: self,
            pattern: pattern.into_expr(),
        }
    }

    /// BETWEEN range check.
    fn between<L, H>(self, low: L, high: H) -> Between<Self, L::E, H::E>
    where
        L: IntoExpr<Self::Output>,
        H: IntoExpr<Self::Output>,
    {
        Between {
            inner: self,
            low: low.into_expr(),
            high: high.into_expr(),
        }
    }

    /// IN with an inline list.
    fn in_values<V: IntoExpr<Self::Output>>(self, values: Vec<V>) -> InList<Self, V::E> {
        InList {
            inner: self,
            items: values.into_iter().map(IntoExpr::into_expr).collect(),
        }
    }

    /// Addition.
    fn add<V: IntoExpr<Self::Output>>(self, v: V) -> Arith<Self, V::E> {
        Arith {
            lhs: self,
            op: "+",
            rhs: v.into_expr(),
        }
    }

    /// Subtraction.
    fn sub<V: IntoExpr<Self::Output>>(self, v: V) -> Arith<Self, V::E> {
        Arith {
            lhs: self,
            op: "-",
            rhs: v.into_expr(),
        }
    }

    /// Multiplication.
    fn mul<V: IntoExpr<Self::Output>>(self, v: V) -> Arith<Self, V::E> {
        Arith {
            lhs: self,
            op: "*",
            rhs: v.into_expr(),
        }
    }

    /// Division.
    fn div<V: IntoExpr<Self::Output>>(self, v: V) -> Arith<Self, V::E> {
        Arith {
            lhs: self,
            op: "/",
            rhs: v.into_expr(),
        }
    }

    /// Modulo.
    fn rem<V: IntoExpr<Self::Output>>(self, v: V) -> Arith<Self, V::E> {
        Arith {
            lhs: self,
            op: "%",
            rhs: v.into_expr(),
        }
    }

    /// String concatenation.
    fn concat<V: IntoExpr<String>>(self, v: V) -> Concat<Self, V::E> {
        Concat {
            lhs: self,
            rhs: v.into_expr(),
        }
    }

    /// COLLATE.
    fn collate(self, name: &'static str) -> CollateExpr<Self> {
        CollateExpr {
            inner: self,
            collation: name,
        }
    }

    /// Ascending ordering term.
    fn asc(self) -> OrderSpec
    where
        Self: 'static,
    {
        OrderSpec {
            node: Box::new(self),
            direction: Some(SortOrder::Asc),
            collation: None,
        }
    }

    /// Descending ordering term.
    fn desc(self) -> OrderSpec
    where
        Self: 'static,
    {
        OrderSpec {
            node: Box::new(self),
            direction: Some(SortOrder::Desc),
            collation: None,
        }
    }
}

impl<E: Expr> ExprExt for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSpec;
    use crate::writer::Fragment;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct User {
        id: i64,
        name: String,
        age: Option<i32>,
    }

    impl User {
        const ID: Field<User, i64> = Field::new("id");
        const NAME: Field<User, String> = Field::new("name");
        const AGE: Field<User, Option<i32>> = Field::new("age");
    }

    impl Record for User {
        const TABLE_NAME: &'static str = "users";
        const TYPE_NAME: &'static str = "User";

        fn table() -> TableSpec {
            TableSpec::new::<User>()
        }

        fn row_values(&self) -> Vec<Value> {
            vec![
                self.id.to_value(),
                self.name.clone().to_value(),
                self.age.to_value(),
            ]
        }

        fn from_row(row: &mut crate::row::RowReader) -> Result<Self, crate::error::DecodeError> {
            Ok(Self {
                id: row.next_as()?,
                name: row.next_as()?,
                age: row.next_as()?,
            })
        }
    }

    fn render(node: &dyn QueryNode, qualify: bool) -> Fragment {
        let mut w = SqlWriter::new(qualify, false);
        node.emit(&mut w);
        w.finish()
    }

    #[test]
    fn test_field_rendering() {
        assert_eq!(render(&User::NAME, true).sql, "'users'.\"name\"");
        assert_eq!(render(&User::NAME, false).sql, "\"name\"");
    }

    #[test]
    fn test_comparison_binds_value() {
        let frag = render(&User::AGE.gt(18), false);
        assert_eq!(frag.sql, "\"age\" > ?");
        assert_eq!(frag.params, vec![Value::Integer(18)]);
    }

    #[test]
    fn test_column_to_column_comparison_has_no_params() {
        let frag = render(&User::ID.eq(rowid::<User>()), true);
        assert_eq!(frag.sql, "'users'.\"id\" = 'users'.rowid");
        assert!(frag.params.is_empty());
    }

    #[test]
    fn test_and_or_parenthesize() {
        let e = User::NAME.eq("a").and(User::AGE.gt(1).or(User::AGE.is_null()));
        let frag = render(&e, false);
        assert_eq!(
            frag.sql,
            "(\"name\" = ? AND (\"age\" > ? OR \"age\" IS NULL))"
        );
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn test_between() {
        let frag = render(&User::AGE.between(18, 65), false);
        assert_eq!(frag.sql, "\"age\" BETWEEN ? AND ?");
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn test_in_list_each_element_is_bound() {
        let frag = render(&User::NAME.in_values(vec!["a", "b"]), false);
        assert_eq!(frag.sql, "\"name\" IN (?, ?)");
        assert_eq!(
            frag.params,
            vec![
                Value::Text(String::from("a")),
                Value::Text(String::from("b"))
            ]
        );
    }

    #[test]
    fn test_like() {
        let frag = render(&User::NAME.like("%son"), false);
        assert_eq!(frag.sql, "\"name\" LIKE ?");
    }

    #[test]
    fn test_arithmetic_and_concat() {
        assert_eq!(render(&User::AGE.add(1), false).sql, "(\"age\" + ?)");
        assert_eq!(
            render(&User::NAME.concat(" jr"), false).sql,
            "(\"name\" || ?)"
        );
    }

    #[test]
    fn test_cast() {
        let frag = render(&cast::<String, _>(User::AGE), false);
        assert_eq!(frag.sql, "CAST(\"age\" AS TEXT)");
    }

    #[test]
    fn test_simple_case() {
        let e: Case<Option<i32>, String> = case(User::AGE)
            .when(18, "adult")
            .when(17, "minor")
            .otherwise("unknown");
        let frag = render(&e, false);
        assert_eq!(
            frag.sql,
            "CASE \"age\" WHEN ? THEN ? WHEN ? THEN ? ELSE ? END"
        );
        assert_eq!(frag.params.len(), 5);
    }

    #[test]
    fn test_searched_case() {
        let e = case_when::<_, _, String>(User::AGE.ge(18), "adult").otherwise("minor");
        let frag = render(&e, false);
        assert_eq!(frag.sql, "CASE WHEN \"age\" >= ? THEN ? ELSE ? END");
    }

    #[test]
    fn test_collate_and_order() {
        let frag = render(&User::NAME.collate("NOCASE"), false);
        assert_eq!(frag.sql, "\"name\" COLLATE NOCASE");

        let order = User::NAME.asc().collate("NOCASE");
        assert_eq!(render(&order, false).sql, "\"name\" COLLATE NOCASE ASC");
    }

    #[test]
    fn test_alias_rendering() {
        let u = alias::<User>("u");
        let frag = render(&u.col(User::NAME).eq("x"), true);
        assert_eq!(frag.sql, "u.\"name\" = ?");

        let mut set = TableSet::new();
        u.col(User::NAME).tables(&mut set);
        assert!(set.contains(&(String::from("users"), String::from("u"))));
    }

    #[test]
    fn test_option_field_compares_against_plain_value() {
        let frag = render(&User::AGE.eq(30), false);
        assert_eq!(frag.sql, "\"age\" = ?");
        assert_eq!(frag.params, vec![Value::Integer(30)]);
    }

    #[test]
    fn test_rowid_spellings() {
        assert_eq!(render(&oid::<User>(), false).sql, "oid");
        assert_eq!(
            render(&underscore_rowid::<User>(), true).sql,
            "'users'._rowid_"
        );
    }
}
