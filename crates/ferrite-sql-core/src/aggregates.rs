//! Aggregate functions.
//!
//! Result types follow SQLite: `COUNT` is never NULL, `TOTAL` is always a
//! float, and the rest return NULL over an empty set, so they materialize
//! as `Option`.

use std::marker::PhantomData;

use crate::expr::{Expr, IntoExpr, QueryNode};
use crate::schema::Record;
use crate::value::{ToValue, Value};
use crate::writer::{SqlWriter, TableSet};

/// `COUNT(*)` over the table mapped by `R`.
pub struct CountAll<R> {
    _marker: PhantomData<fn() -> R>,
}

/// `COUNT(*)` over the table mapped by `R`.
#[must_use]
pub fn count_all<R: Record>() -> CountAll<R> {
    CountAll {
        _marker: PhantomData,
    }
}

impl<R: Record> QueryNode for CountAll<R> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("COUNT(*)");
    }

    fn tables(&self, out: &mut TableSet) {
        out.insert((R::TABLE_NAME.to_string(), String::new()));
    }
}

impl<R: Record> Expr for CountAll<R> {
    type Output = i64;
}

impl<R: Record> IntoExpr<i64> for CountAll<R> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

macro_rules! aggregate_fn {
    ($(#[$doc:meta])* $node:ident, $ctor:ident, $keyword:literal, $out:ty) => {
        $(#[$doc])*
        pub struct $node<E> {
            arg: E,
        }

        $(#[$doc])*
        #[must_use]
        pub fn $ctor<E: Expr>(arg: E) -> $node<E> {
            $node { arg }
        }

        impl<E: Expr> QueryNode for $node<E> {
            fn emit(&self, w: &mut SqlWriter) {
                w.push($keyword);
                w.push("(");
                self.arg.emit(w);
                w.push(")");
            }

            fn tables(&self, out: &mut TableSet) {
                self.arg.tables(out);
            }
        }

        impl<E: Expr> Expr for $node<E> {
            type Output = $out;
        }

        impl<E: Expr> IntoExpr<$out> for $node<E> {
            type E = Self;

            fn into_expr(self) -> Self {
                self
            }
        }
    };
}

aggregate_fn!(
    /// `COUNT(x)`.
    Count, count, "COUNT", i64
);
aggregate_fn!(
    /// `AVG(x)`.
    Avg, avg, "AVG", Option<f64>
);
aggregate_fn!(
    /// `TOTAL(x)`.
    Total, total, "TOTAL", f64
);

macro_rules! optional_aggregate_fn {
    ($(#[$doc:meta])* $node:ident, $ctor:ident, $keyword:literal) => {
        $(#[$doc])*
        pub struct $node<E> {
            arg: E,
        }

        $(#[$doc])*
        #[must_use]
        pub fn $ctor<E: Expr>(arg: E) -> $node<E> {
            $node { arg }
        }

        impl<E: Expr> QueryNode for $node<E> {
            fn emit(&self, w: &mut SqlWriter) {
                w.push($keyword);
                w.push("(");
                self.arg.emit(w);
                w.push(")");
            }

            fn tables(&self, out: &mut TableSet) {
                self.arg.tables(out);
            }
        }

        impl<E: Expr> Expr for $node<E> {
            type Output = Option<E::Output>;
        }

        impl<E: Expr> IntoExpr<Option<E::Output>> for $node<E> {
            type E = Self;

            fn into_expr(self) -> Self {
                self
            }
        }
    };
}

optional_aggregate_fn!(
    /// `SUM(x)`; NULL over an empty set.
    Sum, sum, "SUM"
);
optional_aggregate_fn!(
    /// `MIN(x)`; NULL over an empty set.
    Min, min, "MIN"
);
optional_aggregate_fn!(
    /// `MAX(x)`; NULL over an empty set.
    Max, max, "MAX"
);

/// `GROUP_CONCAT(x)` or `GROUP_CONCAT(x, sep)`; the separator is a
/// bindable leaf.
pub struct GroupConcat<E> {
    arg: E,
    separator: Option<Value>,
}

/// `GROUP_CONCAT(x)`.
#[must_use]
pub fn group_concat<E: Expr>(arg: E) -> GroupConcat<E> {
    GroupConcat {
        arg,
        separator: None,
    }
}

/// `GROUP_CONCAT(x, sep)`.
#[must_use]
pub fn group_concat_sep<E: Expr>(arg: E, separator: impl ToValue) -> GroupConcat<E> {
    GroupConcat {
        arg,
        separator: Some(separator.to_value()),
    }
}

impl<E: Expr> QueryNode for GroupConcat<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("GROUP_CONCAT(");
        self.arg.emit(w);
        if let Some(ref sep) = self.separator {
            w.push(", ");
            w.push_value(sep.clone());
        }
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.arg.tables(out);
    }
}

impl<E: Expr> Expr for GroupConcat<E> {
    type Output = Option<String>;
}

impl<E: Expr> IntoExpr<Option<String>> for GroupConcat<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}
