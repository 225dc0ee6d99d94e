//! Shared model types and helpers for the integration tests.
#![allow(dead_code)]

use ferrite_orm::{table, Record, Schema, Storage};

table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct User in "users" {
        id: i64 => ID [primary_key autoincrement],
        name: String => NAME,
        age: Option<i32> => AGE,
    }
}

table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Visit in "visits" {
        id: i64 => ID [primary_key],
        user_id: i64 => USER_ID,
        url: String => URL,
    }
}

pub fn schema() -> Schema {
    Schema::new().table(User::table()).table(Visit::table())
}

pub fn memory_storage() -> Storage {
    let mut storage = Storage::open(":memory:", schema()).unwrap();
    storage.sync_schema(false).unwrap();
    storage
}

pub fn user(name: &str, age: Option<i32>) -> User {
    User {
        id: 0,
        name: name.into(),
        age,
    }
}

/// Seeds the three users of the aggregate scenarios.
pub fn seed_users(storage: &mut Storage) {
    storage
        .insert_range(
            [
                user("Alice", Some(30)),
                user("Bob", Some(40)),
                user("Carol", Some(50)),
            ]
            .iter(),
        )
        .unwrap();
}
