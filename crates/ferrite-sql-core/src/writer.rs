//! The SQL writer.
//!
//! Serialization and parameter collection happen in one traversal: every
//! node writes its SQL text and pushes its bindable leaves through the
//! same [`SqlWriter`]. That single walk is what guarantees the serializer
//! and the binder agree on parameter order.

use std::collections::BTreeSet;

use crate::value::{escape_single_quotes, Value};

/// A serialized statement: SQL text plus the parameters to bind, in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// The SQL text, with `?` placeholders.
    pub sql: String,
    /// Bind parameters in positional order.
    pub params: Vec<Value>,
}

/// The set of `(table, alias)` pairs referenced by an expression.
///
/// Ordered, so FROM-clause rendering is deterministic.
pub type TableSet = BTreeSet<(String, String)>;

/// Accumulates SQL text and bind parameters during one AST walk.
#[derive(Debug)]
pub struct SqlWriter {
    sql: String,
    params: Vec<Value>,
    qualify: bool,
    inline: bool,
}

impl SqlWriter {
    /// Creates a writer.
    ///
    /// `qualify` controls whether column references carry their table
    /// qualifier; `inline` renders literals escaped in place instead of
    /// as `?` placeholders.
    #[must_use]
    pub fn new(qualify: bool, inline: bool) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            qualify,
            inline,
        }
    }

    /// Whether column references are table-qualified.
    #[must_use]
    pub fn qualify(&self) -> bool {
        self.qualify
    }

    /// Switches table qualification on or off mid-statement (UPDATE SET
    /// targets are unqualified while the rest of the statement is not).
    pub fn set_qualify(&mut self, qualify: bool) {
        self.qualify = qualify;
    }

    /// Appends raw SQL text.
    pub fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Emits one bindable leaf: a `?` placeholder (collecting the value)
    /// or, in inline mode, the escaped literal.
    pub fn push_value(&mut self, v: Value) {
        if self.inline {
            self.sql.push_str(&v.to_sql_inline());
        } else {
            self.sql.push('?');
            self.params.push(v);
        }
    }

    /// Emits a single-quoted table identifier.
    pub fn push_table(&mut self, name: &str) {
        self.sql.push('\'');
        self.sql.push_str(&escape_single_quotes(name));
        self.sql.push('\'');
    }

    /// Emits a column reference, qualified with its table when the writer
    /// is in qualifying mode.
    pub fn push_column(&mut self, table: &str, column: &str) {
        if self.qualify {
            self.push_table(table);
            self.sql.push('.');
        }
        self.sql.push('"');
        self.sql.push_str(column);
        self.sql.push('"');
    }

    /// Emits a column reference through a table alias.
    pub fn push_aliased_column(&mut self, alias: &str, column: &str) {
        if self.qualify {
            self.sql.push_str(alias);
            self.sql.push('.');
        }
        self.sql.push('"');
        self.sql.push_str(column);
        self.sql.push('"');
    }

    /// Finishes the walk.
    #[must_use]
    pub fn finish(self) -> Fragment {
        Fragment {
            sql: self.sql,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_collects_param() {
        let mut w = SqlWriter::new(true, false);
        w.push("x = ");
        w.push_value(Value::Integer(3));
        let frag = w.finish();
        assert_eq!(frag.sql, "x = ?");
        assert_eq!(frag.params, vec![Value::Integer(3)]);
    }

    #[test]
    fn test_inline_mode_escapes() {
        let mut w = SqlWriter::new(true, true);
        w.push_value(Value::Text(String::from("it's")));
        let frag = w.finish();
        assert_eq!(frag.sql, "'it''s'");
        assert!(frag.params.is_empty());
    }

    #[test]
    fn test_column_qualification() {
        let mut w = SqlWriter::new(true, false);
        w.push_column("users", "name");
        assert_eq!(w.finish().sql, "'users'.\"name\"");

        let mut w = SqlWriter::new(false, false);
        w.push_column("users", "name");
        assert_eq!(w.finish().sql, "\"name\"");
    }

    #[test]
    fn test_table_identifier_escaping() {
        let mut w = SqlWriter::new(true, false);
        w.push_table("odd'name");
        assert_eq!(w.finish().sql, "'odd''name'");
    }
}
