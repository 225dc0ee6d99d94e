//! DDL rendering for the SQLite dialect.
//!
//! Identifiers follow the emitted-SQL conventions: table names are
//! single-quoted, column names double-quoted. DEFAULT literals are the
//! one place values render inline.

use crate::schema::{ColumnSpec, IndexSpec, TableSpec};
use crate::value::escape_single_quotes;

fn quote_table(name: &str) -> String {
    format!("'{}'", escape_single_quotes(name))
}

fn column_def(c: &ColumnSpec) -> String {
    let mut sql = format!("'{}' {}", c.name, c.field_type.as_sql());
    if c.primary_key {
        sql.push_str(" PRIMARY KEY");
        if let Some(order) = c.pk_order {
            sql.push(' ');
            sql.push_str(order.as_sql());
        }
        if c.autoincrement {
            sql.push_str(" AUTOINCREMENT");
        }
    }
    if c.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(ref default) = c.default {
        sql.push_str(" DEFAULT ");
        sql.push_str(&default.to_sql_inline());
    }
    if let Some(check) = c.check {
        sql.push_str(" CHECK (");
        sql.push_str(check);
        sql.push(')');
    }
    if let Some(collation) = c.collate {
        sql.push_str(" COLLATE ");
        sql.push_str(collation);
    }
    if c.not_null {
        sql.push_str(" NOT NULL");
    }
    sql
}

/// Renders `CREATE TABLE` for a spec, under the spec's own name.
#[must_use]
pub fn create_table_sql(t: &TableSpec) -> String {
    create_table_named_sql(t, t.name)
}

/// Renders `CREATE TABLE` for a spec under another name (used by the
/// backup migration path).
#[must_use]
pub fn create_table_named_sql(t: &TableSpec, name: &str) -> String {
    let mut defs: Vec<String> = t.columns.iter().map(column_def).collect();
    if !t.composite_primary_key.is_empty() {
        let cols: Vec<String> = t
            .composite_primary_key
            .iter()
            .map(|c| format!("'{c}'"))
            .collect();
        defs.push(format!("PRIMARY KEY({})", cols.join(", ")));
    }
    for fk in &t.foreign_keys {
        let children: Vec<String> = fk.columns.iter().map(|c| format!("'{c}'")).collect();
        let parents: Vec<String> = fk.parent_columns.iter().map(|c| format!("'{c}'")).collect();
        let mut clause = format!(
            "FOREIGN KEY({}) REFERENCES {}({})",
            children.join(", "),
            quote_table(fk.parent_table),
            parents.join(", ")
        );
        if let Some(action) = fk.on_update {
            clause.push_str(" ON UPDATE ");
            clause.push_str(action.as_sql());
        }
        if let Some(action) = fk.on_delete {
            clause.push_str(" ON DELETE ");
            clause.push_str(action.as_sql());
        }
        defs.push(clause);
    }
    let mut sql = format!("CREATE TABLE {} ({})", quote_table(name), defs.join(", "));
    if t.without_rowid {
        sql.push_str(" WITHOUT ROWID");
    }
    sql
}

/// Renders `CREATE [UNIQUE] INDEX IF NOT EXISTS`.
#[must_use]
pub fn create_index_sql(ix: &IndexSpec) -> String {
    let cols: Vec<String> = ix.columns.iter().map(|c| format!("'{c}'")).collect();
    format!(
        "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
        if ix.unique { "UNIQUE " } else { "" },
        quote_table(ix.name),
        quote_table(ix.table),
        cols.join(", ")
    )
}

/// Renders `DROP TABLE`.
#[must_use]
pub fn drop_table_sql(name: &str) -> String {
    format!("DROP TABLE {}", quote_table(name))
}

/// Renders `ALTER TABLE … RENAME TO …`.
#[must_use]
pub fn rename_table_sql(from: &str, to: &str) -> String {
    format!(
        "ALTER TABLE {} RENAME TO {}",
        quote_table(from),
        quote_table(to)
    )
}

/// Renders `ALTER TABLE … ADD COLUMN …`.
#[must_use]
pub fn add_column_sql(table: &str, c: &ColumnSpec) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {}",
        quote_table(table),
        column_def(c)
    )
}

/// Renders the row-copy statement of the backup migration path.
#[must_use]
pub fn copy_table_sql(from: &str, to: &str, columns: &[&str]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| format!("\"{c}\"")).collect();
    format!(
        "INSERT INTO {} ({}) SELECT {} FROM {}",
        quote_table(to),
        cols.join(", "),
        cols.join(", "),
        quote_table(from)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;
    use crate::schema::{FkAction, ForeignKeySpec, Record, SortOrder, TableSpec};
    use crate::value::Value;

    #[derive(Debug, Default, Clone)]
    struct User {
        id: i64,
        name: String,
    }

    impl Record for User {
        const TABLE_NAME: &'static str = "users";
        const TYPE_NAME: &'static str = "User";

        fn table() -> TableSpec {
            TableSpec::new::<User>()
                .column(
                    ColumnSpec::new("id", FieldType::Integer, true)
                        .primary_key()
                        .autoincrement(),
                )
                .column(ColumnSpec::new("name", FieldType::Text, true))
                .column(ColumnSpec::new("age", FieldType::Integer, false))
        }

        fn row_values(&self) -> Vec<Value> {
            vec![Value::Integer(self.id), Value::Text(self.name.clone())]
        }

        fn from_row(
            row: &mut crate::row::RowReader,
        ) -> Result<Self, crate::error::DecodeError> {
            Ok(Self {
                id: row.next_as()?,
                name: row.next_as()?,
            })
        }
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            create_table_sql(&User::table()),
            "CREATE TABLE 'users' ('id' INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, \
             'name' TEXT NOT NULL, 'age' INTEGER)"
        );
    }

    #[test]
    fn test_create_table_with_default_and_unique() {
        let t = TableSpec::new::<User>()
            .column(ColumnSpec::new("id", FieldType::Integer, true).primary_key())
            .column(
                ColumnSpec::new("email", FieldType::Text, true)
                    .unique()
                    .default_value(Value::Text(String::from("none"))),
            );
        assert_eq!(
            create_table_sql(&t),
            "CREATE TABLE 'users' ('id' INTEGER PRIMARY KEY NOT NULL, \
             'email' TEXT UNIQUE DEFAULT 'none' NOT NULL)"
        );
    }

    #[test]
    fn test_create_table_composite_pk_without_rowid() {
        let t = TableSpec::new::<User>()
            .column(ColumnSpec::new("x", FieldType::Integer, true))
            .column(ColumnSpec::new("y", FieldType::Integer, true))
            .primary_key(&["x", "y"])
            .without_rowid();
        assert_eq!(
            create_table_sql(&t),
            "CREATE TABLE 'users' ('x' INTEGER NOT NULL, 'y' INTEGER NOT NULL, \
             PRIMARY KEY('x', 'y')) WITHOUT ROWID"
        );
    }

    #[test]
    fn test_create_table_with_foreign_key() {
        let t = TableSpec::new::<User>()
            .column(ColumnSpec::new("id", FieldType::Integer, true).primary_key())
            .column(ColumnSpec::new("owner_id", FieldType::Integer, true))
            .foreign_key(
                ForeignKeySpec::to::<User>(&["owner_id"], &["id"])
                    .on_delete(FkAction::Cascade),
            );
        assert_eq!(
            create_table_sql(&t),
            "CREATE TABLE 'users' ('id' INTEGER PRIMARY KEY NOT NULL, \
             'owner_id' INTEGER NOT NULL, \
             FOREIGN KEY('owner_id') REFERENCES 'users'('id') ON DELETE CASCADE)"
        );
    }

    #[test]
    fn test_pk_direction() {
        let t = TableSpec::new::<User>().column(
            ColumnSpec::new("id", FieldType::Integer, true).primary_key_sorted(SortOrder::Desc),
        );
        assert_eq!(
            create_table_sql(&t),
            "CREATE TABLE 'users' ('id' INTEGER PRIMARY KEY DESC NOT NULL)"
        );
    }

    #[test]
    fn test_create_index() {
        let ix = IndexSpec {
            name: "idx_users_name",
            table: "users",
            unique: true,
            columns: vec!["name", "age"],
        };
        assert_eq!(
            create_index_sql(&ix),
            "CREATE UNIQUE INDEX IF NOT EXISTS 'idx_users_name' ON 'users' ('name', 'age')"
        );
    }

    #[test]
    fn test_copy_table() {
        assert_eq!(
            copy_table_sql("users", "users_backup", &["id", "name"]),
            "INSERT INTO 'users_backup' (\"id\", \"name\") SELECT \"id\", \"name\" FROM 'users'"
        );
    }

    #[test]
    fn test_add_column() {
        let c = ColumnSpec::new("age", FieldType::Integer, false);
        assert_eq!(
            add_column_sql("users", &c),
            "ALTER TABLE 'users' ADD COLUMN 'age' INTEGER"
        );
    }
}
