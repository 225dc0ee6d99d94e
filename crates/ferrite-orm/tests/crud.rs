//! CRUD round-trips and boundary cases.

mod common;

use common::{memory_storage, user, User};
use ferrite_orm::{Conditions, Error, ExprExt};

#[test]
fn insert_assigns_rowid_and_get_round_trips() {
    let mut storage = memory_storage();

    let id = storage.insert(&user("Alice", Some(30))).unwrap();
    assert_eq!(id, 1);

    let alice: User = storage.get(id).unwrap();
    assert_eq!(
        alice,
        User {
            id: 1,
            name: String::from("Alice"),
            age: Some(30),
        }
    );
    assert_eq!(storage.get_all::<User>(Conditions::new()).unwrap().len(), 1);
}

#[test]
fn get_on_missing_row_is_not_found() {
    let mut storage = memory_storage();
    let err = storage.get::<User, _>(42_i64).unwrap_err();
    assert!(matches!(err, Error::NotFound));
}

#[test]
fn get_optional_returns_none_instead_of_failing() {
    let mut storage = memory_storage();
    assert!(storage.get_optional::<User, _>(42_i64).unwrap().is_none());

    storage.insert(&user("Alice", None)).unwrap();
    assert!(storage.get_optional::<User, _>(1_i64).unwrap().is_some());
}

#[test]
fn update_rewrites_non_key_columns() {
    let mut storage = memory_storage();
    let id = storage.insert(&user("Alice", Some(30))).unwrap();

    let mut alice: User = storage.get(id).unwrap();
    alice.name = String::from("Alicia");
    alice.age = None;
    storage.update(&alice).unwrap();

    assert_eq!(storage.get::<User, _>(id).unwrap(), alice);
}

#[test]
fn replace_overwrites_by_primary_key() {
    let mut storage = memory_storage();
    let id = storage.insert(&user("Alice", Some(30))).unwrap();

    let replacement = User {
        id,
        name: String::from("Alyx"),
        age: Some(31),
    };
    storage.replace(&replacement).unwrap();

    assert_eq!(storage.get::<User, _>(id).unwrap(), replacement);
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 1);
}

#[test]
fn remove_deletes_by_primary_key() {
    let mut storage = memory_storage();
    let id = storage.insert(&user("Alice", Some(30))).unwrap();

    storage.remove::<User, _>(id).unwrap();
    assert!(matches!(
        storage.get::<User, _>(id),
        Err(Error::NotFound)
    ));
}

#[test]
fn insert_range_matches_repeated_inserts() {
    let mut one_by_one = memory_storage();
    for u in [user("a", Some(1)), user("b", None), user("c", Some(3))] {
        one_by_one.insert(&u).unwrap();
    }

    let mut bulk = memory_storage();
    bulk.insert_range(
        [user("a", Some(1)), user("b", None), user("c", Some(3))].iter(),
    )
    .unwrap();

    assert_eq!(
        one_by_one.get_all::<User>(Conditions::new()).unwrap(),
        bulk.get_all::<User>(Conditions::new()).unwrap()
    );
}

#[test]
fn empty_ranges_are_no_ops() {
    let mut storage = memory_storage();
    storage.insert_range::<User>(std::iter::empty()).unwrap();
    storage.replace_range::<User>(std::iter::empty()).unwrap();
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 0);
}

#[test]
fn replace_range_is_batched_upsert() {
    let mut storage = memory_storage();
    let id = storage.insert(&user("Alice", Some(30))).unwrap();

    let rows = [
        User {
            id,
            name: String::from("Alice II"),
            age: Some(31),
        },
        User {
            id: 9,
            name: String::from("New"),
            age: None,
        },
    ];
    storage.replace_range(rows.iter()).unwrap();

    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 2);
    assert_eq!(storage.get::<User, _>(id).unwrap().name, "Alice II");
    assert_eq!(storage.get::<User, _>(9_i64).unwrap().name, "New");
}

#[test]
fn insert_with_binds_only_listed_columns() {
    let mut storage = memory_storage();
    let id = storage
        .insert_with(&user("Alice", Some(30)), (User::NAME, User::AGE))
        .unwrap();
    assert_eq!(storage.get::<User, _>(id).unwrap().name, "Alice");

    let id = storage.insert_with(&user("Bob", Some(40)), User::NAME).unwrap();
    let bob: User = storage.get(id).unwrap();
    assert_eq!(bob.age, None);
}

#[test]
fn get_all_on_empty_table_is_empty() {
    let mut storage = memory_storage();
    assert!(storage.get_all::<User>(Conditions::new()).unwrap().is_empty());
}

#[test]
fn remove_all_honors_conditions() {
    let mut storage = memory_storage();
    common::seed_users(&mut storage);

    storage
        .remove_all::<User>(Conditions::new().filter(User::AGE.ge(40)))
        .unwrap();
    let left = storage.get_all::<User>(Conditions::new()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "Alice");
}

#[test]
fn primary_key_arity_is_checked() {
    let mut storage = memory_storage();
    let err = storage.get::<User, _>((1_i64, 2_i64)).unwrap_err();
    assert!(matches!(
        err,
        Error::PkArityMismatch {
            expected: 1,
            got: 2
        }
    ));
}
