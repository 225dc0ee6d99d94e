//! Transaction lifecycle and atomicity.

mod common;

use common::{memory_storage, schema, user, User};
use ferrite_orm::{Conditions, Error, Storage};

#[test]
fn rolled_back_transaction_leaves_state_unchanged() {
    let mut storage = memory_storage();
    storage.insert(&user("Alice", Some(30))).unwrap();

    let committed = storage
        .transaction(|s| {
            s.insert(&user("Dave", Some(20)))?;
            Ok(false)
        })
        .unwrap();
    assert!(!committed);
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 1);
}

#[test]
fn committed_transaction_persists() {
    let mut storage = memory_storage();

    let committed = storage
        .transaction(|s| {
            s.insert(&user("Alice", Some(30)))?;
            s.insert(&user("Bob", Some(40)))?;
            Ok(true)
        })
        .unwrap();
    assert!(committed);
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 2);
}

#[test]
fn failing_closure_rolls_back_and_propagates() {
    let mut storage = memory_storage();

    let result = storage.transaction(|s| {
        s.insert(&user("Ghost", None))?;
        s.get::<User, _>(999_i64)?;
        Ok(true)
    });
    assert!(matches!(result, Err(Error::NotFound)));
    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 0);
}

#[test]
fn nested_begin_is_rejected() {
    let mut storage = memory_storage();
    storage.begin_transaction().unwrap();
    assert!(matches!(
        storage.begin_transaction(),
        Err(Error::NestedTransaction)
    ));
    storage.rollback().unwrap();
}

#[test]
fn commit_and_rollback_require_a_transaction() {
    let mut storage = memory_storage();
    assert!(matches!(storage.commit(), Err(Error::NoActiveTransaction)));
    assert!(matches!(
        storage.rollback(),
        Err(Error::NoActiveTransaction)
    ));
}

#[test]
fn explicit_begin_commit_on_file_backed_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("txn.db");
    let path = path.to_str().unwrap();

    {
        let mut storage = Storage::open(path, schema()).unwrap();
        storage.sync_schema(false).unwrap();
        storage.begin_transaction().unwrap();
        storage.insert(&user("Alice", Some(30))).unwrap();
        storage.commit().unwrap();
    }

    // A fresh storage over the same file sees the committed row.
    let mut reopened = Storage::open(path, schema()).unwrap();
    assert_eq!(reopened.count::<User>(Conditions::new()).unwrap(), 1);
}

#[test]
fn rollback_discards_on_file_backed_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollback.db");
    let path = path.to_str().unwrap();

    let mut storage = Storage::open(path, schema()).unwrap();
    storage.sync_schema(false).unwrap();
    storage.begin_transaction().unwrap();
    storage.insert(&user("Alice", Some(30))).unwrap();
    storage.rollback().unwrap();

    assert_eq!(storage.count::<User>(Conditions::new()).unwrap(), 0);
}
