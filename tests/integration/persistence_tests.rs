//! Saving and loading the library file

use std::fs;

use library_manager::{AppError, JsonFileStore, LibraryService};
use serde_json::Value;

use crate::{date, library};

/// A state touching every field: history, active loans, holds and a queue.
fn busy_library() -> LibraryService {
    let (mut lib, clock) = library();
    lib.add_book("Dune", "Frank Herbert", 1).unwrap();
    lib.add_book("Emma", "Jane Austen", 2).unwrap();
    lib.add_book("Ulysses", "James Joyce", 1).unwrap();
    let bob = lib.add_user("Bob").unwrap();
    let ann = lib.add_user("Ann").unwrap();
    let cid = lib.add_user("Cid").unwrap();
    let gone = lib.add_user("Gone").unwrap();
    lib.remove_user(gone).unwrap();

    lib.borrow_book(bob, "Emma").unwrap();
    clock.advance_days(3);
    lib.return_book(bob, "Emma").unwrap();

    lib.borrow_book(bob, "Dune").unwrap();
    lib.reserve_book(ann, "Dune").unwrap();
    lib.reserve_book(cid, "Dune").unwrap();
    clock.advance_days(2);
    lib.return_book(bob, "Dune").unwrap();

    lib.borrow_book(cid, "Ulysses").unwrap();
    lib
}

#[test]
fn test_round_trip_keeps_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let original = busy_library();

    original.save_to_file(&path).unwrap();
    let (mut restored, _) = library();
    restored.load_from_file(&path).unwrap();

    assert_eq!(restored.state(), original.state());
    let dune = restored.book("Dune").unwrap();
    assert_eq!(dune.held_for.iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(dune.reservation_queue.iter().copied().collect::<Vec<_>>(), vec![3]);
    assert_eq!(restored.state().next_user_id, 5);
}

#[test]
fn test_round_trip_of_empty_library() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let (empty, _) = library();

    empty.save_to_file(&path).unwrap();
    let (mut restored, _) = library();
    restored.add_user("Placeholder").unwrap();
    restored.load_from_file(&path).unwrap();

    assert_eq!(restored.state(), empty.state());
}

#[test]
fn test_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    busy_library().save_to_file(&path).unwrap();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["next_user_id"], 5);
    assert_eq!(doc["books"][0]["title"], "Dune");
    assert_eq!(doc["books"][0]["reservation_queue"], serde_json::json!([3]));

    let bob_loans = &doc["users"][0]["loans"];
    assert_eq!(bob_loans[0]["book_title"], "Emma");
    assert_eq!(bob_loans[0]["issue_date"], "2024-03-01");
    assert_eq!(bob_loans[0]["due_date"], "2024-03-15");
    assert_eq!(bob_loans[0]["return_date"], "2024-03-04");
    assert_eq!(doc["users"][2]["loans"][0]["return_date"], Value::Null);
}

#[test]
fn test_corrupt_file_leaves_registry_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let mut lib = busy_library();
    let before = lib.state().clone();

    fs::write(&path, r#"{"next_user_id": 1, "books": "#).unwrap();
    assert!(matches!(
        lib.load_from_file(&path),
        Err(AppError::CorruptFile { .. })
    ));

    fs::write(
        &path,
        r#"{"next_user_id": 1, "books": [{"title": "Dune", "author": "Frank Herbert",
            "total_copies": 1, "available_copies": 5, "reservation_queue": []}], "users": []}"#,
    )
    .unwrap();
    assert!(matches!(
        lib.load_from_file(&path),
        Err(AppError::CorruptFile { .. })
    ));

    assert!(matches!(
        lib.load_from_file(&dir.path().join("missing.json")),
        Err(AppError::Io { .. })
    ));

    assert_eq!(lib.state(), &before);
}

#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let lib = busy_library();
    lib.save_to_file(&path).unwrap();
    let saved = fs::read_to_string(&path).unwrap();

    // A plain file where the parent directory should be makes the save fail.
    let blocked = dir.path().join("library.json").join("nested.json");
    assert!(matches!(lib.save_to_file(&blocked), Err(AppError::Io { .. })));

    assert_eq!(fs::read_to_string(&path).unwrap(), saved);
}

#[test]
fn test_store_and_service_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let lib = busy_library();
    lib.save_to_file(&path).unwrap();

    let state = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(&state, lib.state());
    assert_eq!(state.users[&1].loans[1].due_date, date(2024, 3, 18));
}

#[test]
fn test_zero_user_counter_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, r#"{"next_user_id": 0, "books": [], "users": []}"#).unwrap();

    let (mut lib, _) = library();
    assert!(matches!(
        lib.load_from_file(&path),
        Err(AppError::CorruptFile { .. })
    ));
    assert_eq!(lib.add_user("Bob").unwrap(), 1);
}
