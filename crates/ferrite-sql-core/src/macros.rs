//! The `table!` declaration macro.

/// Declares a record struct mapped to a table.
///
/// Generates the struct itself, its [`Record`](crate::schema::Record)
/// implementation, and one typed [`Field`](crate::expr::Field) constant
/// per column for use in expressions.
///
/// ```ignore
/// table! {
///     #[derive(Debug, Clone, PartialEq, Default)]
///     pub struct User in "users" {
///         id: i64 => ID [primary_key autoincrement],
///         name: String => NAME,
///         age: Option<i32> => AGE,
///     }
/// }
/// ```
///
/// Column constraints go in the bracket list: `primary_key` (optionally
/// followed by `asc`/`desc`), `autoincrement`, `unique`,
/// `default(<expr>)`, `collate("NAME")`, `check("<sql>")`. Table-level
/// options (composite primary key, `WITHOUT ROWID`, foreign keys) are
/// applied to the [`TableSpec`](crate::schema::TableSpec) at
/// registration time.
#[macro_export]
macro_rules! table {
    (@constraints $c:ident) => {};
    (@constraints $c:ident primary_key asc $($rest:tt)*) => {
        $c = $c.primary_key_sorted($crate::schema::SortOrder::Asc);
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident primary_key desc $($rest:tt)*) => {
        $c = $c.primary_key_sorted($crate::schema::SortOrder::Desc);
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident primary_key $($rest:tt)*) => {
        $c = $c.primary_key();
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident autoincrement $($rest:tt)*) => {
        $c = $c.autoincrement();
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident unique $($rest:tt)*) => {
        $c = $c.unique();
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident default($e:expr) $($rest:tt)*) => {
        $c = $c.default_value($crate::value::ToValue::to_value($e));
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident collate($s:literal) $($rest:tt)*) => {
        $c = $c.collate($s);
        $crate::table!(@constraints $c $($rest)*);
    };
    (@constraints $c:ident check($s:literal) $($rest:tt)*) => {
        $c = $c.check($s);
        $crate::table!(@constraints $c $($rest)*);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $table:literal {
            $( $field:ident : $fty:ty => $constname:ident $([ $($cons:tt)* ])? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( pub $field: $fty, )+
        }

        impl $name {
            $(
                #[allow(missing_docs)]
                $vis const $constname: $crate::expr::Field<$name, $fty> =
                    $crate::expr::Field::new(stringify!($field));
            )+
        }

        impl $crate::schema::Record for $name {
            const TABLE_NAME: &'static str = $table;
            const TYPE_NAME: &'static str = stringify!($name);

            fn table() -> $crate::schema::TableSpec {
                $crate::schema::TableSpec::new::<$name>()
                $(
                    .column({
                        #[allow(unused_mut)]
                        let mut c = $crate::schema::ColumnSpec::new(
                            stringify!($field),
                            <$fty as $crate::fields::FieldValue>::FIELD_TYPE,
                            <$fty as $crate::fields::FieldValue>::NOT_NULL,
                        );
                        $( $crate::table!(@constraints c $($cons)*); )?
                        c
                    })
                )+
            }

            fn row_values(&self) -> ::std::vec::Vec<$crate::value::Value> {
                ::std::vec![
                    $( $crate::value::ToValue::to_value(::std::clone::Clone::clone(&self.$field)) ),+
                ]
            }

            fn from_row(
                row: &mut $crate::row::RowReader,
            ) -> ::std::result::Result<Self, $crate::error::DecodeError> {
                ::std::result::Result::Ok(Self {
                    $( $field: row.next_as::<$fty>()?, )+
                })
            }
        }
    };
}
