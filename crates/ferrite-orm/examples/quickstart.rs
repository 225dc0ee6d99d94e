//! End-to-end tour: declare a schema, sync it, and run typed queries.
//!
//! Run with `cargo run --example quickstart`.

use ferrite_orm::aggregates;
use ferrite_orm::{
    assign, columns, select, table, Conditions, ExprExt, Record, Schema, Storage,
};

table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct User in "users" {
        id: i64 => ID [primary_key autoincrement],
        name: String => NAME,
        age: Option<i32> => AGE,
    }
}

fn main() -> ferrite_orm::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let mut storage = Storage::open(":memory:", Schema::new().table(User::table()))?;
    for (table, status) in storage.sync_schema(false)? {
        println!("{table}: {status}");
    }

    storage.insert_range([
        User {
            id: 0,
            name: "Alice".into(),
            age: Some(30),
        },
        User {
            id: 0,
            name: "Bob".into(),
            age: Some(40),
        },
        User {
            id: 0,
            name: "Carol".into(),
            age: None,
        },
    ]
    .iter())?;

    println!("users: {}", storage.count::<User>(Conditions::new())?);
    println!(
        "average age: {}",
        storage.avg(User::AGE, Conditions::new())?
    );

    let rows = storage.select(
        select(columns((User::NAME, User::AGE)))
            .filter(User::AGE.is_not_null())
            .order_by(User::NAME.asc()),
    )?;
    for (name, age) in rows {
        println!("{name}: {age:?}");
    }

    // Everyone gets a year older.
    storage.update_all(
        assign(User::AGE, User::AGE.add(Some(1))),
        Conditions::new().filter(User::AGE.is_not_null()),
    )?;

    println!(
        "names: {}",
        storage.group_concat_sep(User::NAME, ", ", Conditions::new())?
    );

    let _ = storage.select(select(aggregates::max(User::AGE)))?;
    Ok(())
}
