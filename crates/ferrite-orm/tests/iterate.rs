//! Streaming iteration.

mod common;

use common::{memory_storage, seed_users, user, User};
use ferrite_orm::{Conditions, ExprExt};

#[test]
fn cursor_yields_the_same_rows_as_get_all() {
    let mut storage = memory_storage();
    seed_users(&mut storage);

    let eager = storage.get_all::<User>(Conditions::new()).unwrap();
    let lazy: Vec<User> = storage
        .iterate::<User, _>(Conditions::new(), |cursor| {
            cursor.collect::<Result<Vec<User>, _>>()
        })
        .unwrap();
    assert_eq!(eager, lazy);
}

#[test]
fn cursor_honors_conditions() {
    let mut storage = memory_storage();
    seed_users(&mut storage);

    let names = storage
        .iterate::<User, _>(
            Conditions::new()
                .filter(User::AGE.ge(40))
                .order_by(User::NAME.asc()),
            |cursor| {
                let mut names = Vec::new();
                for row in cursor {
                    names.push(row?.name);
                }
                Ok(names)
            },
        )
        .unwrap();
    assert_eq!(names, vec!["Bob", "Carol"]);
}

#[test]
fn cursor_is_single_pass_and_can_stop_early() {
    let mut storage = memory_storage();
    seed_users(&mut storage);

    let first = storage
        .iterate::<User, _>(Conditions::new().order_by(User::NAME.asc()), |cursor| {
            match cursor.next() {
                Some(row) => row.map(Some),
                None => Ok(None),
            }
        })
        .unwrap();
    assert_eq!(first.map(|u| u.name), Some(String::from("Alice")));

    // The statement was finalized with its scope; the storage is free
    // for the next operation.
    storage.insert(&user("Dave", None)).unwrap();
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 4);
}

#[test]
fn empty_cursor_yields_nothing() {
    let mut storage = memory_storage();
    let count = storage
        .iterate::<User, _>(Conditions::new(), |cursor| Ok(cursor.count()))
        .unwrap();
    assert_eq!(count, 0);
}
