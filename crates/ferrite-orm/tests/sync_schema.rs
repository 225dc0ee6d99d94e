//! Schema synchronization: statuses, migrations and the dry run.

mod common;

use common::{schema, user, User};
use ferrite_orm::{table, Conditions, Index, Record, Schema, Storage, SyncStatus};

fn temp_db() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.db").to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn first_sync_creates_tables() {
    let mut storage = Storage::open(":memory:", schema()).unwrap();
    let result = storage.sync_schema(false).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::NewTableCreated));
    assert_eq!(result.get("visits"), Some(&SyncStatus::NewTableCreated));
}

#[test]
fn second_sync_is_idempotent() {
    let mut storage = Storage::open(":memory:", schema()).unwrap();
    storage.sync_schema(true).unwrap();
    let second = storage.sync_schema(true).unwrap();
    assert!(second.values().all(|s| *s == SyncStatus::AlreadyInSync));
}

#[test]
fn simulate_agrees_with_sync_and_does_not_mutate() {
    let mut storage = Storage::open(":memory:", schema()).unwrap();

    let simulated = storage.sync_schema_simulate(false).unwrap();
    assert!(!storage.table_exists("users").unwrap());

    let applied = storage.sync_schema(false).unwrap();
    assert_eq!(simulated, applied);

    let simulated = storage.sync_schema_simulate(false).unwrap();
    assert!(simulated.values().all(|s| *s == SyncStatus::AlreadyInSync));
}

// An older revision of the users table, missing the `age` column.
table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct UserV1 in "users" {
        id: i64 => ID [primary_key autoincrement],
        name: String => NAME,
    }
}

#[test]
fn adding_a_nullable_column_preserves_rows() {
    let (_dir, path) = temp_db();

    {
        let mut old = Storage::open(path.as_str(), Schema::new().table(UserV1::table())).unwrap();
        old.sync_schema(false).unwrap();
        old.insert(&UserV1 {
            id: 0,
            name: String::from("Alice"),
        })
        .unwrap();
    }

    let mut new = Storage::open(path.as_str(), schema()).unwrap();
    let result = new.sync_schema(true).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::NewColumnsAdded));

    let rows = new.get_all::<User>(Conditions::new()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Alice");
    assert_eq!(rows[0].age, None);
}

#[test]
fn removing_a_column_with_preserve_keeps_data() {
    let (_dir, path) = temp_db();

    {
        let mut wide = Storage::open(path.as_str(), schema()).unwrap();
        wide.sync_schema(false).unwrap();
        wide.insert(&user("Alice", Some(30))).unwrap();
    }

    let mut narrow =
        Storage::open(path.as_str(), Schema::new().table(UserV1::table())).unwrap();
    let result = narrow.sync_schema(true).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::OldColumnsRemoved));

    let rows = narrow.get_all::<UserV1>(Conditions::new()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Alice");
}

#[test]
fn removing_a_column_without_preserve_recreates() {
    let (_dir, path) = temp_db();

    {
        let mut wide = Storage::open(path.as_str(), schema()).unwrap();
        wide.sync_schema(false).unwrap();
        wide.insert(&user("Alice", Some(30))).unwrap();
    }

    let mut narrow =
        Storage::open(path.as_str(), Schema::new().table(UserV1::table())).unwrap();
    let result = narrow.sync_schema(false).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::DroppedAndRecreated));
    assert!(narrow.get_all::<UserV1>(Conditions::new()).unwrap().is_empty());
}

// Same column name, different type: the diff is deliberately coarse.
table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct UserTextAge in "users" {
        id: i64 => ID [primary_key autoincrement],
        name: String => NAME,
        age: Option<String> => AGE,
    }
}

#[test]
fn changed_column_type_drops_and_recreates() {
    let (_dir, path) = temp_db();

    {
        let mut original = Storage::open(path.as_str(), schema()).unwrap();
        original.sync_schema(false).unwrap();
        original.insert(&user("Alice", Some(30))).unwrap();
    }

    let mut changed =
        Storage::open(path.as_str(), Schema::new().table(UserTextAge::table())).unwrap();
    let result = changed.sync_schema(true).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::DroppedAndRecreated));
    assert!(changed
        .get_all::<UserTextAge>(Conditions::new())
        .unwrap()
        .is_empty());
}

#[test]
fn indices_sync_as_already_in_sync() {
    let mut storage = Storage::open(
        ":memory:",
        Schema::new()
            .table(User::table())
            .index(Index::<User>::new("idx_users_name").unique().on(User::NAME)),
    )
    .unwrap();

    let result = storage.sync_schema(false).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::NewTableCreated));
    assert_eq!(
        result.get("idx_users_name"),
        Some(&SyncStatus::AlreadyInSync)
    );

    // Unique index is live: a duplicate insert must fail.
    storage.insert(&user("Alice", None)).unwrap();
    assert!(storage.insert(&user("Alice", None)).is_err());
}

table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct Point in "points" {
        x: i64 => X,
        y: i64 => Y,
        label: String => LABEL,
    }
}

#[test]
fn composite_key_without_rowid_round_trips() {
    let mut storage = Storage::open(
        ":memory:",
        Schema::new().table(Point::table().primary_key(&["x", "y"]).without_rowid()),
    )
    .unwrap();
    storage.sync_schema(false).unwrap();

    let p = Point {
        x: 3,
        y: 4,
        label: String::from("origin-ish"),
    };
    storage.insert(&p).unwrap();

    let back: Point = storage.get((3_i64, 4_i64)).unwrap();
    assert_eq!(back, p);

    storage.remove::<Point, _>((3_i64, 4_i64)).unwrap();
    assert!(storage.get_optional::<Point, _>((3_i64, 4_i64)).unwrap().is_none());
}

table! {
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct WithDefault in "users" {
        id: i64 => ID [primary_key autoincrement],
        name: String => NAME,
        age: Option<i32> => AGE,
        role: String => ROLE [default("guest")],
    }
}

#[test]
fn new_not_null_column_with_default_is_added() {
    let (_dir, path) = temp_db();

    {
        let mut old = Storage::open(path.as_str(), schema()).unwrap();
        old.sync_schema(false).unwrap();
        old.insert(&user("Alice", Some(30))).unwrap();
    }

    let mut new =
        Storage::open(path.as_str(), Schema::new().table(WithDefault::table())).unwrap();
    let result = new.sync_schema(true).unwrap();
    assert_eq!(result.get("users"), Some(&SyncStatus::NewColumnsAdded));

    let rows = new.get_all::<WithDefault>(Conditions::new()).unwrap();
    assert_eq!(rows[0].role, "guest");
}
