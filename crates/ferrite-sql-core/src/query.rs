//! SELECT construction: projections, clause lists, joins and compound
//! operators.
//!
//! Clauses accumulate on a [`Conditions`] value and render in the order
//! they were first added. The FROM set of a SELECT is the union of the
//! tables referenced by the projection and every clause, minus the
//! tables introduced by explicit joins.

use crate::error::DecodeError;
use crate::expr::{BoxNode, Expr, Field, IntoExpr, IntoOrder, OrderSpec, QueryNode};
use crate::fields::FromValue;
use crate::row::RowReader;
use crate::schema::Record;
use crate::value::Value;
use crate::writer::{Fragment, SqlWriter, TableSet};

/// An ON or USING join constraint.
pub enum JoinConstraint {
    /// `ON <expr>`.
    On(BoxNode),
    /// `USING ("column")`.
    Using(&'static str),
}

/// Builds an `ON` join constraint.
#[must_use]
pub fn on<E>(e: E) -> JoinConstraint
where
    E: IntoExpr<bool>,
    E::E: 'static,
{
    JoinConstraint::On(Box::new(e.into_expr()))
}

/// Builds a `USING` join constraint on one column.
#[must_use]
pub fn using<R: Record, T>(field: Field<R, T>) -> JoinConstraint {
    JoinConstraint::Using(field.name())
}

struct JoinClause {
    keyword: &'static str,
    table: &'static str,
    alias: &'static str,
    constraint: Option<JoinConstraint>,
}

impl JoinClause {
    fn emit(&self, w: &mut SqlWriter) {
        w.push(self.keyword);
        w.push(" ");
        w.push_table(self.table);
        if !self.alias.is_empty() {
            w.push(" ");
            w.push(self.alias);
        }
        match &self.constraint {
            Some(JoinConstraint::On(e)) => {
                w.push(" ON ");
                e.emit(w);
            }
            Some(JoinConstraint::Using(col)) => {
                w.push(" USING (\"");
                w.push(col);
                w.push("\")");
            }
            None => {}
        }
    }

    fn tables(&self, out: &mut TableSet) {
        if let Some(JoinConstraint::On(e)) = &self.constraint {
            e.tables(out);
        }
    }

    fn target(&self) -> (String, String) {
        (self.table.to_string(), self.alias.to_string())
    }
}

enum Clause {
    Where(Vec<BoxNode>),
    OrderBy(Vec<OrderSpec>),
    GroupBy(Vec<BoxNode>),
    Having(Vec<BoxNode>),
    Limit {
        limit: i64,
        offset: Option<i64>,
        implicit: bool,
    },
    Join(JoinClause),
}

/// A chainable list of query clauses.
///
/// Repeated `filter` calls AND together; repeated `order_by`/`group_by`
/// calls extend the same clause.
#[derive(Default)]
pub struct Conditions {
    clauses: Vec<Clause>,
}

impl Conditions {
    /// Creates an empty clause list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a WHERE predicate; multiple predicates are ANDed.
    #[must_use]
    pub fn filter<E>(mut self, e: E) -> Self
    where
        E: IntoExpr<bool>,
        E::E: 'static,
    {
        let node: BoxNode = Box::new(e.into_expr());
        for c in &mut self.clauses {
            if let Clause::Where(items) = c {
                items.push(node);
                return self;
            }
        }
        self.clauses.push(Clause::Where(vec![node]));
        self
    }

    /// Adds an ORDER BY term.
    #[must_use]
    pub fn order_by<O: IntoOrder>(mut self, order: O) -> Self {
        let spec = order.into_order();
        for c in &mut self.clauses {
            if let Clause::OrderBy(items) = c {
                items.push(spec);
                return self;
            }
        }
        self.clauses.push(Clause::OrderBy(vec![spec]));
        self
    }

    /// Adds a GROUP BY expression.
    #[must_use]
    pub fn group_by<E: Expr + 'static>(mut self, e: E) -> Self {
        let node: BoxNode = Box::new(e);
        for c in &mut self.clauses {
            if let Clause::GroupBy(items) = c {
                items.push(node);
                return self;
            }
        }
        self.clauses.push(Clause::GroupBy(vec![node]));
        self
    }

    /// Adds a HAVING predicate; multiple predicates are ANDed.
    #[must_use]
    pub fn having<E>(mut self, e: E) -> Self
    where
        E: IntoExpr<bool>,
        E::E: 'static,
    {
        let node: BoxNode = Box::new(e.into_expr());
        for c in &mut self.clauses {
            if let Clause::Having(items) = c {
                items.push(node);
                return self;
            }
        }
        self.clauses.push(Clause::Having(vec![node]));
        self
    }

    /// `LIMIT n`.
    #[must_use]
    pub fn limit(self, limit: i64) -> Self {
        self.set_limit(limit, None, false)
    }

    /// `LIMIT n OFFSET m`.
    #[must_use]
    pub fn limit_offset(self, limit: i64, offset: i64) -> Self {
        self.set_limit(limit, Some(offset), false)
    }

    /// The comma form `LIMIT m, n`.
    #[must_use]
    pub fn limit_comma(self, offset: i64, limit: i64) -> Self {
        self.set_limit(limit, Some(offset), true)
    }

    fn set_limit(mut self, limit: i64, offset: Option<i64>, implicit: bool) -> Self {
        for c in &mut self.clauses {
            if let Clause::Limit {
                limit: l,
                offset: o,
                implicit: i,
            } = c
            {
                *l = limit;
                *o = offset;
                *i = implicit;
                return self;
            }
        }
        self.clauses.push(Clause::Limit {
            limit,
            offset,
            implicit,
        });
        self
    }

    fn push_join(
        mut self,
        keyword: &'static str,
        table: &'static str,
        alias: &'static str,
        constraint: Option<JoinConstraint>,
    ) -> Self {
        self.clauses.push(Clause::Join(JoinClause {
            keyword,
            table,
            alias,
            constraint,
        }));
        self
    }

    /// `CROSS JOIN`.
    #[must_use]
    pub fn cross_join<R: Record>(self) -> Self {
        self.push_join("CROSS JOIN", R::TABLE_NAME, "", None)
    }

    /// `NATURAL JOIN`.
    #[must_use]
    pub fn natural_join<R: Record>(self) -> Self {
        self.push_join("NATURAL JOIN", R::TABLE_NAME, "", None)
    }

    /// Plain `JOIN`.
    #[must_use]
    pub fn join<R: Record>(self, constraint: JoinConstraint) -> Self {
        self.push_join("JOIN", R::TABLE_NAME, "", Some(constraint))
    }

    /// `INNER JOIN`.
    #[must_use]
    pub fn inner_join<R: Record>(self, constraint: JoinConstraint) -> Self {
        self.push_join("INNER JOIN", R::TABLE_NAME, "", Some(constraint))
    }

    /// `LEFT JOIN`.
    #[must_use]
    pub fn left_join<R: Record>(self, constraint: JoinConstraint) -> Self {
        self.push_join("LEFT JOIN", R::TABLE_NAME, "", Some(constraint))
    }

    /// `LEFT OUTER JOIN`.
    #[must_use]
    pub fn left_outer_join<R: Record>(self, constraint: JoinConstraint) -> Self {
        self.push_join("LEFT OUTER JOIN", R::TABLE_NAME, "", Some(constraint))
    }

    /// `INNER JOIN` against an aliased table.
    #[must_use]
    pub fn inner_join_as<R: Record>(
        self,
        alias: &'static str,
        constraint: JoinConstraint,
    ) -> Self {
        self.push_join("INNER JOIN", R::TABLE_NAME, alias, Some(constraint))
    }

    /// `LEFT JOIN` against an aliased table.
    #[must_use]
    pub fn left_join_as<R: Record>(self, alias: &'static str, constraint: JoinConstraint) -> Self {
        self.push_join("LEFT JOIN", R::TABLE_NAME, alias, Some(constraint))
    }

    /// `LEFT OUTER JOIN` against an aliased table.
    #[must_use]
    pub fn left_outer_join_as<R: Record>(
        self,
        alias: &'static str,
        constraint: JoinConstraint,
    ) -> Self {
        self.push_join("LEFT OUTER JOIN", R::TABLE_NAME, alias, Some(constraint))
    }

    /// Whether any clause has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Appends another clause list, merging mergeable clauses.
    pub fn merge(&mut self, other: Conditions) {
        let mut merged = std::mem::take(self);
        for clause in other.clauses {
            merged = match clause {
                Clause::Where(items) => {
                    let mut c = merged;
                    for item in items {
                        c = push_where(c, item);
                    }
                    c
                }
                Clause::OrderBy(items) => {
                    let mut c = merged;
                    for item in items {
                        c = c.order_by(item);
                    }
                    c
                }
                Clause::GroupBy(items) => {
                    let mut c = merged;
                    for item in items {
                        c = push_group_by(c, item);
                    }
                    c
                }
                Clause::Having(items) => {
                    let mut c = merged;
                    for item in items {
                        c = push_having(c, item);
                    }
                    c
                }
                Clause::Limit {
                    limit,
                    offset,
                    implicit,
                } => merged.set_limit(limit, offset, implicit),
                Clause::Join(j) => {
                    merged.clauses.push(Clause::Join(j));
                    merged
                }
            };
        }
        *self = merged;
    }

    /// Emits all clauses in order, each preceded by one space.
    pub fn emit(&self, w: &mut SqlWriter) {
        for clause in &self.clauses {
            w.push(" ");
            match clause {
                Clause::Where(items) => {
                    w.push("WHERE ");
                    emit_predicates(items, w);
                }
                Clause::OrderBy(items) => {
                    w.push("ORDER BY ");
                    for (i, o) in items.iter().enumerate() {
                        if i > 0 {
                            w.push(", ");
                        }
                        o.emit(w);
                    }
                }
                Clause::GroupBy(items) => {
                    w.push("GROUP BY ");
                    for (i, e) in items.iter().enumerate() {
                        if i > 0 {
                            w.push(", ");
                        }
                        e.emit(w);
                    }
                }
                Clause::Having(items) => {
                    w.push("HAVING ");
                    emit_predicates(items, w);
                }
                Clause::Limit {
                    limit,
                    offset,
                    implicit,
                } => match (offset, implicit) {
                    (Some(off), true) => {
                        w.push("LIMIT ");
                        w.push_value(Value::Integer(*off));
                        w.push(", ");
                        w.push_value(Value::Integer(*limit));
                    }
                    (Some(off), false) => {
                        w.push("LIMIT ");
                        w.push_value(Value::Integer(*limit));
                        w.push(" OFFSET ");
                        w.push_value(Value::Integer(*off));
                    }
                    (None, _) => {
                        w.push("LIMIT ");
                        w.push_value(Value::Integer(*limit));
                    }
                },
                Clause::Join(j) => j.emit(w),
            }
        }
    }

    /// Adds every referenced table.
    pub fn collect_tables(&self, out: &mut TableSet) {
        for clause in &self.clauses {
            match clause {
                Clause::Where(items) | Clause::GroupBy(items) | Clause::Having(items) => {
                    for e in items {
                        e.tables(out);
                    }
                }
                Clause::OrderBy(items) => {
                    for o in items {
                        o.tables(out);
                    }
                }
                Clause::Limit { .. } => {}
                Clause::Join(j) => j.tables(out),
            }
        }
    }

    /// The `(table, alias)` pairs introduced by explicit joins.
    pub fn join_targets(&self) -> Vec<(String, String)> {
        self.clauses
            .iter()
            .filter_map(|c| match c {
                Clause::Join(j) => Some(j.target()),
                _ => None,
            })
            .collect()
    }
}

fn push_where(c: Conditions, node: BoxNode) -> Conditions {
    let mut c = c;
    for clause in &mut c.clauses {
        if let Clause::Where(items) = clause {
            items.push(node);
            return c;
        }
    }
    c.clauses.push(Clause::Where(vec![node]));
    c
}

fn push_group_by(c: Conditions, node: BoxNode) -> Conditions {
    let mut c = c;
    for clause in &mut c.clauses {
        if let Clause::GroupBy(items) = clause {
            items.push(node);
            return c;
        }
    }
    c.clauses.push(Clause::GroupBy(vec![node]));
    c
}

fn push_having(c: Conditions, node: BoxNode) -> Conditions {
    let mut c = c;
    for clause in &mut c.clauses {
        if let Clause::Having(items) = clause {
            items.push(node);
            return c;
        }
    }
    c.clauses.push(Clause::Having(vec![node]));
    c
}

fn emit_predicates(items: &[BoxNode], w: &mut SqlWriter) {
    let wrap = items.len() > 1;
    for (i, e) in items.iter().enumerate() {
        if i > 0 {
            w.push(" AND ");
        }
        if wrap {
            w.push("(");
        }
        e.emit(w);
        if wrap {
            w.push(")");
        }
    }
}

/// A tuple of expressions forming a SELECT column list.
pub trait ColsTuple {
    /// The decoded row type.
    type Output;

    /// Emits the comma-separated column list.
    fn emit_cols(&self, w: &mut SqlWriter);

    /// Adds referenced tables.
    fn tables(&self, out: &mut TableSet);

    /// Decodes one row.
    fn decode_row(r: &mut RowReader) -> Result<Self::Output, DecodeError>;
}

impl<A> ColsTuple for (A,)
where
    A: Expr + 'static,
    A::Output: FromValue,
{
    type Output = A::Output;

    fn emit_cols(&self, w: &mut SqlWriter) {
        self.0.emit(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.0.tables(out);
    }

    fn decode_row(r: &mut RowReader) -> Result<Self::Output, DecodeError> {
        r.next_as::<A::Output>()
    }
}

macro_rules! impl_cols_tuple {
    ($($t:ident . $idx:tt),+) => {
        impl<$($t),+> ColsTuple for ($($t,)+)
        where
            $($t: Expr + 'static, $t::Output: FromValue,)+
        {
            type Output = ($($t::Output,)+);

            fn emit_cols(&self, w: &mut SqlWriter) {
                let mut first = true;
                $(
                    if !first {
                        w.push(", ");
                    }
                    first = false;
                    self.$idx.emit(w);
                )+
                let _ = first;
            }

            fn tables(&self, out: &mut TableSet) {
                $( self.$idx.tables(out); )+
            }

            fn decode_row(r: &mut RowReader) -> Result<Self::Output, DecodeError> {
                Ok(($( r.next_as::<$t::Output>()?, )+))
            }
        }
    };
}

impl_cols_tuple!(A.0, B.1);
impl_cols_tuple!(A.0, B.1, C.2);
impl_cols_tuple!(A.0, B.1, C.2, D.3);
impl_cols_tuple!(A.0, B.1, C.2, D.3, E.4);
impl_cols_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_cols_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_cols_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);

/// A column-list projection.
pub struct Columns<T>(T);

/// Wraps a tuple of expressions into a projection.
#[must_use]
pub fn columns<T: ColsTuple>(t: T) -> Columns<T> {
    Columns(t)
}

/// A SELECT projection with a typed row shape.
pub trait Projection {
    /// The decoded row type.
    type Output;

    /// Emits the column list.
    fn emit_columns(&self, w: &mut SqlWriter);

    /// Adds referenced tables.
    fn tables(&self, out: &mut TableSet);

    /// Decodes one row.
    fn decode_row(r: &mut RowReader) -> Result<Self::Output, DecodeError>;
}

impl<T: ColsTuple> Projection for Columns<T> {
    type Output = T::Output;

    fn emit_columns(&self, w: &mut SqlWriter) {
        self.0.emit_cols(w);
    }

    fn tables(&self, out: &mut TableSet) {
        self.0.tables(out);
    }

    fn decode_row(r: &mut RowReader) -> Result<Self::Output, DecodeError> {
        T::decode_row(r)
    }
}

/// Anything convertible into a projection: a single expression or a
/// [`columns`] list.
pub trait IntoProjection {
    /// The projection type.
    type P: Projection;

    /// Performs the conversion.
    fn into_projection(self) -> Self::P;
}

impl<E> IntoProjection for E
where
    E: Expr + 'static,
    E::Output: FromValue,
{
    type P = Columns<(E,)>;

    fn into_projection(self) -> Self::P {
        Columns((self,))
    }
}

impl<T: ColsTuple> IntoProjection for Columns<T> {
    type P = Self;

    fn into_projection(self) -> Self {
        self
    }
}

/// A SELECT statement under construction.
#[must_use]
pub struct Select<P> {
    proj: P,
    distinct: bool,
    conds: Conditions,
}

/// Starts a SELECT from a projection.
pub fn select<I: IntoProjection>(proj: I) -> Select<I::P> {
    Select {
        proj: proj.into_projection(),
        distinct: false,
        conds: Conditions::new(),
    }
}

impl<P: Projection> Select<P> {
    /// Adds DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a WHERE predicate.
    pub fn filter<E>(mut self, e: E) -> Self
    where
        E: IntoExpr<bool>,
        E::E: 'static,
    {
        self.conds = self.conds.filter(e);
        self
    }

    /// Adds an ORDER BY term.
    pub fn order_by<O: IntoOrder>(mut self, order: O) -> Self {
        self.conds = self.conds.order_by(order);
        self
    }

    /// Adds a GROUP BY expression.
    pub fn group_by<E: Expr + 'static>(mut self, e: E) -> Self {
        self.conds = self.conds.group_by(e);
        self
    }

    /// Adds a HAVING predicate.
    pub fn having<E>(mut self, e: E) -> Self
    where
        E: IntoExpr<bool>,
        E::E: 'static,
    {
        self.conds = self.conds.having(e);
        self
    }

    /// `LIMIT n`.
    pub fn limit(mut self, n: i64) -> Self {
        self.conds = self.conds.limit(n);
        self
    }

    /// `LIMIT n OFFSET m`.
    pub fn limit_offset(mut self, n: i64, offset: i64) -> Self {
        self.conds = self.conds.limit_offset(n, offset);
        self
    }

    /// The comma form `LIMIT m, n`.
    pub fn limit_comma(mut self, offset: i64, n: i64) -> Self {
        self.conds = self.conds.limit_comma(offset, n);
        self
    }

    /// `CROSS JOIN`.
    pub fn cross_join<R: Record>(mut self) -> Self {
        self.conds = self.conds.cross_join::<R>();
        self
    }

    /// `NATURAL JOIN`.
    pub fn natural_join<R: Record>(mut self) -> Self {
        self.conds = self.conds.natural_join::<R>();
        self
    }

    /// Plain `JOIN`.
    pub fn join<R: Record>(mut self, constraint: JoinConstraint) -> Self {
        self.conds = self.conds.join::<R>(constraint);
        self
    }

    /// `INNER JOIN`.
    pub fn inner_join<R: Record>(mut self, constraint: JoinConstraint) -> Self {
        self.conds = self.conds.inner_join::<R>(constraint);
        self
    }

    /// `LEFT JOIN`.
    pub fn left_join<R: Record>(mut self, constraint: JoinConstraint) -> Self {
        self.conds = self.conds.left_join::<R>(constraint);
        self
    }

    /// `LEFT OUTER JOIN`.
    pub fn left_outer_join<R: Record>(mut self, constraint: JoinConstraint) -> Self {
        self.conds = self.conds.left_outer_join::<R>(constraint);
        self
    }

    /// `INNER JOIN` against an aliased table.
    pub fn inner_join_as<R: Record>(
        mut self,
        alias: &'static str,
        constraint: JoinConstraint,
    ) -> Self {
        self.conds = self.conds.inner_join_as::<R>(alias, constraint);
        self
    }

    /// `LEFT JOIN` against an aliased table.
    pub fn left_join_as<R: Record>(
        mut self,
        alias: &'static str,
        constraint: JoinConstraint,
    ) -> Self {
        self.conds = self.conds.left_join_as::<R>(alias, constraint);
        self
    }

    /// Appends a prebuilt clause list.
    pub fn with(mut self, conds: Conditions) -> Self {
        self.conds.merge(conds);
        self
    }

    /// Emits the statement. At non-highest level the whole SELECT is
    /// parenthesized.
    ///
    /// Column references stay unqualified for a single-table statement
    /// and become table-qualified as soon as a join or a second table is
    /// involved.
    pub(crate) fn emit_select(&self, w: &mut SqlWriter, highest: bool) {
        let mut set = TableSet::new();
        self.proj.tables(&mut set);
        self.conds.collect_tables(&mut set);
        let join_targets = self.conds.join_targets();
        for target in &join_targets {
            set.remove(target);
        }

        let outer_qualify = w.qualify();
        w.set_qualify(!join_targets.is_empty() || set.len() > 1);

        if !highest {
            w.push("(");
        }
        w.push("SELECT ");
        if self.distinct {
            w.push("DISTINCT ");
        }
        self.proj.emit_columns(w);
        if !set.is_empty() {
            w.push(" FROM ");
            for (i, (table, alias)) in set.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push_table(table);
                if !alias.is_empty() {
                    w.push(" ");
                    w.push(alias);
                }
            }
        }
        self.conds.emit(w);
        if !highest {
            w.push(")");
        }
        w.set_qualify(outer_qualify);
    }
}

/// A complete, executable SELECT: either a plain [`Select`] or a
/// compound of them.
pub trait IntoSelect {
    /// The decoded row type.
    type Output;

    /// Serializes the whole statement.
    fn fragment(&self, qualify: bool) -> Fragment;

    /// Decodes one result row.
    fn decode(&self, r: &mut RowReader) -> Result<Self::Output, DecodeError>;
}

impl<P: Projection> IntoSelect for Select<P> {
    type Output = P::Output;

    fn fragment(&self, qualify: bool) -> Fragment {
        let mut w = SqlWriter::new(qualify, false);
        self.emit_select(&mut w, true);
        w.finish()
    }

    fn decode(&self, r: &mut RowReader) -> Result<Self::Output, DecodeError> {
        P::decode_row(r)
    }
}

/// An operand of a compound operator, rendered as a bare SELECT.
pub trait SelectOperand {
    /// Emits the operand without parentheses.
    fn emit_operand(&self, w: &mut SqlWriter);
}

impl<P: Projection> SelectOperand for Select<P> {
    fn emit_operand(&self, w: &mut SqlWriter) {
        self.emit_select(w, true);
    }
}

impl<O> SelectOperand for CompoundSelect<O> {
    fn emit_operand(&self, w: &mut SqlWriter) {
        self.emit_chain(w);
    }
}

/// A statement usable as a compound operand, with a known row type.
pub trait CompoundOperand: SelectOperand + Sized + 'static {
    /// The decoded row type.
    type Output;

    /// The row decoder.
    fn decoder(&self) -> fn(&mut RowReader) -> Result<Self::Output, DecodeError>;
}

impl<P: Projection + 'static> CompoundOperand for Select<P> {
    type Output = P::Output;

    fn decoder(&self) -> fn(&mut RowReader) -> Result<Self::Output, DecodeError> {
        P::decode_row
    }
}

impl<O: 'static> CompoundOperand for CompoundSelect<O> {
    type Output = O;

    fn decoder(&self) -> fn(&mut RowReader) -> Result<Self::Output, DecodeError> {
        self.decoder
    }
}

/// Two SELECTs combined with a compound operator.
///
/// Carries no condition methods: a compound statement cannot take extra
/// WHERE arguments, which makes that misuse unrepresentable.
#[must_use]
pub struct CompoundSelect<O> {
    op: &'static str,
    left: Box<dyn SelectOperand>,
    right: Box<dyn SelectOperand>,
    decoder: fn(&mut RowReader) -> Result<O, DecodeError>,
}

impl<O> CompoundSelect<O> {
    fn emit_chain(&self, w: &mut SqlWriter) {
        self.left.emit_operand(w);
        w.push(" ");
        w.push(self.op);
        w.push(" ");
        self.right.emit_operand(w);
    }
}

impl<O> IntoSelect for CompoundSelect<O> {
    type Output = O;

    fn fragment(&self, qualify: bool) -> Fragment {
        let mut w = SqlWriter::new(qualify, false);
        self.emit_chain(&mut w);
        w.finish()
    }

    fn decode(&self, r: &mut RowReader) -> Result<O, DecodeError> {
        (self.decoder)(r)
    }
}

fn compound<L, R>(op: &'static str, left: L, right: R) -> CompoundSelect<L::Output>
where
    L: CompoundOperand,
    R: CompoundOperand<Output = L::Output>,
{
    let decoder = left.decoder();
    CompoundSelect {
        op,
        left: Box::new(left),
        right: Box::new(right),
        decoder,
    }
}

/// `UNION`.
pub fn union<L, R>(left: L, right: R) -> CompoundSelect<L::Output>
where
    L: CompoundOperand,
    R: CompoundOperand<Output = L::Output>,
{
    compound("UNION", left, right)
}

/// `UNION ALL`.
pub fn union_all<L, R>(left: L, right: R) -> CompoundSelect<L::Output>
where
    L: CompoundOperand,
    R: CompoundOperand<Output = L::Output>,
{
    compound("UNION ALL", left, right)
}

/// `INTERSECT`.
pub fn intersect<L, R>(left: L, right: R) -> CompoundSelect<L::Output>
where
    L: CompoundOperand,
    R: CompoundOperand<Output = L::Output>,
{
    compound("INTERSECT", left, right)
}

/// `EXCEPT`.
pub fn except<L, R>(left: L, right: R) -> CompoundSelect<L::Output>
where
    L: CompoundOperand,
    R: CompoundOperand<Output = L::Output>,
{
    compound("EXCEPT", left, right)
}

/// A parenthesized sub-SELECT used as a scalar expression.
pub struct Subquery<P> {
    select: Select<P>,
}

/// Wraps a SELECT as a scalar subexpression.
#[must_use]
pub fn subselect<P: Projection>(select: Select<P>) -> Subquery<P> {
    Subquery { select }
}

impl<P: Projection> QueryNode for Subquery<P> {
    fn emit(&self, w: &mut SqlWriter) {
        self.select.emit_select(w, false);
    }
}

impl<P: Projection> Expr for Subquery<P> {
    type Output = P::Output;
}

impl<P: Projection> IntoExpr<P::Output> for Subquery<P> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// `e IN (SELECT …)`.
pub struct InSelect<E, P> {
    expr: E,
    select: Select<P>,
}

/// Builds `e IN (SELECT …)`; the subquery's row type must match the
/// expression's type.
#[must_use]
pub fn in_select<E, P>(expr: E, select: Select<P>) -> InSelect<E, P>
where
    E: Expr,
    P: Projection<Output = E::Output>,
{
    InSelect { expr, select }
}

impl<E: Expr, P: Projection> QueryNode for InSelect<E, P> {
    fn emit(&self, w: &mut SqlWriter) {
        self.expr.emit(w);
        w.push(" IN ");
        self.select.emit_select(w, false);
    }

    fn tables(&self, out: &mut TableSet) {
        self.expr.tables(out);
    }
}

impl<E: Expr, P: Projection> Expr for InSelect<E, P> {
    type Output = bool;
}

impl<E: Expr, P: Projection> IntoExpr<bool> for InSelect<E, P> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// `EXISTS (SELECT …)`.
pub struct Exists<P> {
    select: Select<P>,
}

/// Builds `EXISTS (SELECT …)`.
#[must_use]
pub fn exists<P: Projection>(select: Select<P>) -> Exists<P> {
    Exists { select }
}

impl<P: Projection> QueryNode for Exists<P> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("EXISTS ");
        self.select.emit_select(w, false);
    }
}

impl<P: Projection> Expr for Exists<P> {
    type Output = bool;
}

impl<P: Projection> IntoExpr<bool> for Exists<P> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// `expr AS "name"` in a column list.
pub struct AsAlias<E> {
    inner: E,
    name: &'static str,
}

/// Labels a projected expression with `AS`.
#[must_use]
pub fn as_alias<E: Expr>(e: E, name: &'static str) -> AsAlias<E> {
    AsAlias { inner: e, name }
}

impl<E: Expr> QueryNode for AsAlias<E> {
    fn emit(&self, w: &mut SqlWriter) {
        self.inner.emit(w);
        w.push(" AS \"");
        w.push(self.name);
        w.push("\"");
    }

    fn tables(&self, out: &mut TableSet) {
        self.inner.tables(out);
    }
}

impl<E: Expr> Expr for AsAlias<E> {
    type Output = E::Output;
}

impl<E: Expr> IntoExpr<E::Output> for AsAlias<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// One `SET` assignment of an UPDATE.
pub struct Assign {
    /// Table the assigned column belongs to.
    pub table: &'static str,
    /// The assigned column.
    pub column: &'static str,
    /// Right-hand side expression.
    pub rhs: BoxNode,
}

/// Builds a typed `column = value` assignment.
#[must_use]
pub fn assign<R: Record, T, V>(field: Field<R, T>, value: V) -> Assign
where
    V: IntoExpr<T>,
    V::E: 'static,
{
    Assign {
        table: R::TABLE_NAME,
        column: field.name(),
        rhs: Box::new(value.into_expr()),
    }
}

/// A list of assignments for `update_all`.
pub trait SetList {
    /// Flattens into assignment order.
    fn into_assigns(self) -> Vec<Assign>;
}

impl SetList for Assign {
    fn into_assigns(self) -> Vec<Assign> {
        vec![self]
    }
}

impl SetList for Vec<Assign> {
    fn into_assigns(self) -> Vec<Assign> {
        self
    }
}

impl SetList for () {
    fn into_assigns(self) -> Vec<Assign> {
        Vec::new()
    }
}

impl SetList for (Assign,) {
    fn into_assigns(self) -> Vec<Assign> {
        vec![self.0]
    }
}

impl SetList for (Assign, Assign) {
    fn into_assigns(self) -> Vec<Assign> {
        vec![self.0, self.1]
    }
}

impl SetList for (Assign, Assign, Assign) {
    fn into_assigns(self) -> Vec<Assign> {
        vec![self.0, self.1, self.2]
    }
}

impl SetList for (Assign, Assign, Assign, Assign) {
    fn into_assigns(self) -> Vec<Assign> {
        vec![self.0, self.1, self.2, self.3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{alias, rowid, ExprExt};
    use crate::schema::TableSpec;
    use crate::value::ToValue;

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

        fn from_row(row: &mut RowReader) -> Result<Self, DecodeError> {
            Ok(Self {
                id: row.next_as()?,
                name: row.next_as()?,
                age: row.next_as()?,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Visit {
        id: i64,
        user_id: i64,
    }

    impl Visit {
        const ID: Field<Visit, i64> = Field::new("id");
        const USER_ID: Field<Visit, i64> = Field::new("user_id");
    }

    impl Record for Visit {
        const TABLE_NAME: &'static str = "visits";
        const TYPE_NAME: &'static str = "Visit";

        fn table() -> TableSpec {
            TableSpec::new::<Visit>()
        }

        fn row_values(&self) -> Vec<Value> {
            vec![self.id.to_value(), self.user_id.to_value()]
        }

        fn from_row(row: &mut RowReader) -> Result<Self, DecodeError> {
            Ok(Self {
                id: row.next_as()?,
                user_id: row.next_as()?,
            })
        }
    }

    #[test]
    fn test_single_table_select_is_unqualified() {
        let q = select(columns((User::NAME, User::AGE)))
            .filter(User::AGE.gt(18))
            .order_by(User::NAME.asc());
        let frag = q.fragment(false);
        assert_eq!(
            frag.sql,
            "SELECT \"name\", \"age\" FROM 'users' WHERE \"age\" > ? ORDER BY \"name\" ASC"
        );
        assert_eq!(frag.params, vec![Value::Integer(18)]);
    }

    #[test]
    fn test_clauses_render_in_first_push_order() {
        let q = select(User::NAME)
            .filter(User::AGE.is_not_null())
            .order_by(User::NAME.desc())
            .filter(User::NAME.ne(""))
            .limit(5);
        let frag = q.fragment(false);
        assert_eq!(
            frag.sql,
            "SELECT \"name\" FROM 'users' WHERE (\"age\" IS NOT NULL) AND (\"name\" != ?) \
             ORDER BY \"name\" DESC LIMIT ?"
        );
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn test_limit_forms() {
        let plain = select(User::NAME).limit(3).fragment(false);
        assert!(plain.sql.ends_with("LIMIT ?"));
        assert_eq!(plain.params, vec![Value::Integer(3)]);

        let with_offset = select(User::NAME).limit_offset(3, 6).fragment(false);
        assert!(with_offset.sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(
            with_offset.params,
            vec![Value::Integer(3), Value::Integer(6)]
        );

        let comma = select(User::NAME).limit_comma(6, 3).fragment(false);
        assert!(comma.sql.ends_with("LIMIT ?, ?"));
        assert_eq!(comma.params, vec![Value::Integer(6), Value::Integer(3)]);
    }

    #[test]
    fn test_group_by_and_having() {
        let q = select(User::NAME)
            .group_by(User::NAME)
            .having(User::AGE.is_not_null());
        assert_eq!(
            q.fragment(false).sql,
            "SELECT \"name\" FROM 'users' GROUP BY \"name\" HAVING \"age\" IS NOT NULL"
        );
    }

    #[test]
    fn test_join_qualifies_and_subtracts_target() {
        let q = select(columns((User::NAME, Visit::ID)))
            .inner_join::<Visit>(on(Visit::USER_ID.eq(User::ID)));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT 'users'.\"name\", 'visits'.\"id\" FROM 'users' \
             INNER JOIN 'visits' ON 'visits'.\"user_id\" = 'users'.\"id\""
        );
    }

    #[test]
    fn test_join_using_and_natural() {
        let q = select(User::NAME).join::<Visit>(using(Visit::USER_ID));
        assert!(q
            .fragment(false)
            .sql
            .contains("JOIN 'visits' USING (\"user_id\")"));

        let q = select(User::NAME).natural_join::<Visit>();
        assert!(q.fragment(false).sql.contains("NATURAL JOIN 'visits'"));
    }

    #[test]
    fn test_aliased_join() {
        let v = alias::<Visit>("v");
        let q = select(columns((User::NAME, v.col(Visit::ID))))
            .left_join_as::<Visit>("v", on(v.col(Visit::USER_ID).eq(User::ID)));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT 'users'.\"name\", v.\"id\" FROM 'users' \
             LEFT JOIN 'visits' v ON v.\"user_id\" = 'users'.\"id\""
        );
    }

    #[test]
    fn test_compound_operands_render_bare() {
        let q = union_all(
            select(User::NAME).filter(User::AGE.lt(40)),
            select(User::NAME).filter(User::AGE.ge(40)),
        );
        let frag = q.fragment(false);
        assert_eq!(
            frag.sql,
            "SELECT \"name\" FROM 'users' WHERE \"age\" < ? UNION ALL \
             SELECT \"name\" FROM 'users' WHERE \"age\" >= ?"
        );
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn test_nested_compound() {
        let q = union(
            union_all(select(User::NAME), select(User::NAME)),
            select(User::NAME),
        );
        let sql = q.fragment(false).sql;
        assert_eq!(sql.matches("SELECT").count(), 3);
        assert!(sql.contains("UNION ALL"));
        assert!(sql.contains(" UNION SELECT"));
    }

    #[test]
    fn test_intersect_and_except() {
        let sql = intersect(select(User::NAME), select(User::NAME))
            .fragment(false)
            .sql;
        assert!(sql.contains(" INTERSECT "));

        let sql = except(select(User::NAME), select(User::NAME))
            .fragment(false)
            .sql;
        assert!(sql.contains(" EXCEPT "));
    }

    #[test]
    fn test_subquery_and_exists_parenthesize() {
        let q = select(User::NAME).filter(exists(select(Visit::ID).filter(Visit::USER_ID.gt(0))));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT \"name\" FROM 'users' WHERE EXISTS \
             (SELECT \"id\" FROM 'visits' WHERE \"user_id\" > ?)"
        );

        let q = select(User::NAME).filter(in_select(User::ID, select(Visit::USER_ID)));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT \"name\" FROM 'users' WHERE \"id\" IN (SELECT \"user_id\" FROM 'visits')"
        );

        let q = select(subselect(select(User::ID).limit(1)));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT (SELECT \"id\" FROM 'users' LIMIT ?)"
        );
    }

    #[test]
    fn test_as_alias_and_distinct() {
        let q = select(as_alias(User::NAME, "n")).distinct();
        assert_eq!(
            q.fragment(false).sql,
            "SELECT DISTINCT \"name\" AS \"n\" FROM 'users'"
        );
    }

    #[test]
    fn test_rowid_in_projection() {
        let q = select(rowid::<User>()).filter(rowid::<User>().gt(0));
        assert_eq!(
            q.fragment(false).sql,
            "SELECT rowid FROM 'users' WHERE rowid > ?"
        );
    }

    #[test]
    fn test_assignment_metadata() {
        let a = assign(User::NAME, "x");
        assert_eq!(a.table, "users");
        assert_eq!(a.column, "name");

        let list = (assign(User::NAME, "x"), assign(User::AGE, Some(1))).into_assigns();
        assert_eq!(list.len(), 2);
    }
}
