//! Core scalar functions.

use std::marker::PhantomData;

use crate::expr::{Expr, IntoExpr, QueryNode};
use crate::writer::{SqlWriter, TableSet};

macro_rules! unary_fn {
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

unary_fn!(
    /// `LENGTH(x)`.
    Length, length, "LENGTH", i64
);
unary_fn!(
    /// `LOWER(x)`.
    Lower, lower, "LOWER", String
);
unary_fn!(
    /// `UPPER(x)`.
    Upper, upper, "UPPER", String
);
unary_fn!(
    /// `TRIM(x)`.
    Trim, trim, "TRIM", String
);
unary_fn!(
    /// `LTRIM(x)`.
    LTrim, ltrim, "LTRIM", String
);
unary_fn!(
    /// `RTRIM(x)`.
    RTrim, rtrim, "RTRIM", String
);
unary_fn!(
    /// `HEX(x)`.
    Hex, hex, "HEX", String
);
unary_fn!(
    /// `QUOTE(x)`.
    Quote, quote, "QUOTE", String
);

/// `ABS(x)`; keeps its argument's type.
pub struct Abs<E> {
    arg: E,
}

/// `ABS(x)`.
#[must_use]
pub fn abs<E: Expr>(arg: E) -> Abs<E> {
    Abs { arg }
}

impl<E: Expr> QueryNode for Abs<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("ABS(");
        self.arg.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.arg.tables(out);
    }
}

impl<E: Expr> Expr for Abs<E> {
    type Output = E::Output;
}

impl<E: Expr> IntoExpr<E::Output> for Abs<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// `ROUND(x)` or `ROUND(x, digits)`.
pub struct Round<E> {
    arg: E,
    digits: Option<i64>,
}

/// `ROUND(x)`.
#[must_use]
pub fn round<E: Expr>(arg: E) -> Round<E> {
    Round { arg, digits: None }
}

/// `ROUND(x, digits)`.
#[must_use]
pub fn round_to<E: Expr>(arg: E, digits: i64) -> Round<E> {
    Round {
        arg,
        digits: Some(digits),
    }
}

impl<E: Expr> QueryNode for Round<E> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("ROUND(");
        self.arg.emit(w);
        if let Some(d) = self.digits {
            w.push(", ");
            w.push_value(crate::value::Value::Integer(d));
        }
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.arg.tables(out);
    }
}

impl<E: Expr> Expr for Round<E> {
    type Output = f64;
}

impl<E: Expr> IntoExpr<f64> for Round<E> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

macro_rules! fallback_fn {
    ($(#[$doc:meta])* $node:ident, $ctor:ident, $keyword:literal) => {
        $(#[$doc])*
        pub struct $node<A, B> {
            first: A,
            second: B,
        }

        $(#[$doc])*
        #[must_use]
        pub fn $ctor<T, A, B>(first: A, second: B) -> $node<A::E, B::E>
        where
            A: IntoExpr<Option<T>>,
            B: IntoExpr<T>,
        {
            $node {
                first: first.into_expr(),
                second: second.into_expr(),
            }
        }

        impl<A: Expr, B: Expr> QueryNode for $node<A, B> {
            fn emit(&self, w: &mut SqlWriter) {
                w.push($keyword);
                w.push("(");
                self.first.emit(w);
                w.push(", ");
                self.second.emit(w);
                w.push(")");
            }

            fn tables(&self, out: &mut TableSet) {
                self.first.tables(out);
                self.second.tables(out);
            }
        }

        impl<A: Expr, B: Expr> Expr for $node<A, B> {
            type Output = B::Output;
        }

        impl<A: Expr, B: Expr> IntoExpr<B::Output> for $node<A, B> {
            type E = Self;

            fn into_expr(self) -> Self {
                self
            }
        }
    };
}

fallback_fn!(
    /// `COALESCE(x, y)`: the fallback fixes the result type.
    Coalesce, coalesce, "COALESCE"
);
fallback_fn!(
    /// `IFNULL(x, y)`: the fallback fixes the result type.
    IfNull, ifnull, "IFNULL"
);

/// `INSTR(haystack, needle)`.
pub struct Instr<A, B> {
    haystack: A,
    needle: B,
}

/// `INSTR(haystack, needle)`.
#[must_use]
pub fn instr<A, B>(haystack: A, needle: B) -> Instr<A::E, B::E>
where
    A: IntoExpr<String>,
    B: IntoExpr<String>,
{
    Instr {
        haystack: haystack.into_expr(),
        needle: needle.into_expr(),
    }
}

impl<A: Expr, B: Expr> QueryNode for Instr<A, B> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("INSTR(");
        self.haystack.emit(w);
        w.push(", ");
        self.needle.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.haystack.tables(out);
        self.needle.tables(out);
    }
}

impl<A: Expr, B: Expr> Expr for Instr<A, B> {
    type Output = i64;
}

impl<A: Expr, B: Expr> IntoExpr<i64> for Instr<A, B> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// `REPLACE(x, from, to)`.
pub struct Replace<A, B, C> {
    arg: A,
    from: B,
    to: C,
}

/// `REPLACE(x, from, to)`.
#[must_use]
pub fn replace<A, B, C>(arg: A, from: B, to: C) -> Replace<A::E, B::E, C::E>
where
    A: IntoExpr<String>,
    B: IntoExpr<String>,
    C: IntoExpr<String>,
{
    Replace {
        arg: arg.into_expr(),
        from: from.into_expr(),
        to: to.into_expr(),
    }
}

impl<A: Expr, B: Expr, C: Expr> QueryNode for Replace<A, B, C> {
    fn emit(&self, w: &mut SqlWriter) {
        w.push("REPLACE(");
        self.arg.emit(w);
        w.push(", ");
        self.from.emit(w);
        w.push(", ");
        self.to.emit(w);
        w.push(")");
    }

    fn tables(&self, out: &mut TableSet) {
        self.arg.tables(out);
        self.from.tables(out);
        self.to.tables(out);
    }
}

impl<A: Expr, B: Expr, C: Expr> Expr for Replace<A, B, C> {
    type Output = String;
}

impl<A: Expr, B: Expr, C: Expr> IntoExpr<String> for Replace<A, B, C> {
    type E = Self;

    fn into_expr(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExprExt, Field};
    use crate::schema::{Record, TableSpec};
    use crate::value::{ToValue, Value};

    #[derive(Debug, Clone, Default)]
    struct Doc {
        title: String,
        score: Option<i32>,
    }

    impl Doc {
        const TITLE: Field<Doc, String> = Field::new("title");
        const SCORE: Field<Doc, Option<i32>> = Field::new("score");
    }

    impl Record for Doc {
        const TABLE_NAME: &'static str = "docs";
        const TYPE_NAME: &'static str = "Doc";

        fn table() -> TableSpec {
            TableSpec::new::<Doc>()
        }

        fn row_values(&self) -> Vec<Value> {
            vec![self.title.clone().to_value(), self.score.to_value()]
        }

        fn from_row(
            row: &mut crate::row::RowReader,
        ) -> Result<Self, crate::error::DecodeError> {
            Ok(Self {
                title: row.next_as()?,
                score: row.next_as()?,
            })
        }
    }

    fn render(node: &dyn crate::expr::QueryNode) -> crate::writer::Fragment {
        let mut w = crate::writer::SqlWriter::new(false, false);
        node.emit(&mut w);
        w.finish()
    }

    #[test]
    fn test_unary_functions() {
        assert_eq!(render(&length(Doc::TITLE)).sql, "LENGTH(\"title\")");
        assert_eq!(render(&lower(Doc::TITLE)).sql, "LOWER(\"title\")");
        assert_eq!(render(&upper(Doc::TITLE)).sql, "UPPER(\"title\")");
        assert_eq!(render(&trim(Doc::TITLE)).sql, "TRIM(\"title\")");
        assert_eq!(render(&hex(Doc::TITLE)).sql, "HEX(\"title\")");
        assert_eq!(render(&abs(Doc::SCORE)).sql, "ABS(\"score\")");
    }

    #[test]
    fn test_round_digits_are_bound() {
        let frag = render(&round_to(Doc::SCORE, 2));
        assert_eq!(frag.sql, "ROUND(\"score\", ?)");
        assert_eq!(frag.params, vec![Value::Integer(2)]);
        assert_eq!(render(&round(Doc::SCORE)).sql, "ROUND(\"score\")");
    }

    #[test]
    fn test_coalesce_fixes_result_type() {
        let frag = render(&coalesce(Doc::SCORE, 0).eq(5));
        assert_eq!(frag.sql, "COALESCE(\"score\", ?) = ?");
        assert_eq!(frag.params, vec![Value::Integer(0), Value::Integer(5)]);
    }

    #[test]
    fn test_instr_and_replace() {
        assert_eq!(
            render(&instr(Doc::TITLE, "x")).sql,
            "INSTR(\"title\", ?)"
        );
        assert_eq!(
            render(&replace(Doc::TITLE, "a", "b")).sql,
            "REPLACE(\"title\", ?, ?)"
        );
    }
}
