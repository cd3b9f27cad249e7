//! End-to-end refresh tests
//!
//! Refreshing rebuilds the namespace from the origin's current state; the
//! cache entry is dropped up front and old handles keep working on the old
//! structure.

mod common;

use std::sync::Arc;

use common::TestRepo;
use lazyrepo::eval::Value;

#[test]
fn test_update_picks_up_new_modules() {
    let repo = TestRepo::new();
    repo.create_file("utils.lzy", "fn add(a, b) { a + b }");
    let mut manager = repo.manager();

    let before = manager.import_repository(&repo.identifier(), "main").unwrap();
    assert_eq!(before.names().unwrap(), vec!["utils"]);

    repo.create_file("extra.lzy", "let answer = 42;");
    let after = manager.update_repository(&repo.identifier(), "main").unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.names().unwrap(), vec!["extra", "utils"]);
    assert_eq!(
        after.get_path("extra.answer").unwrap().as_value(),
        Some(&Value::Int(42))
    );
}

#[test]
fn test_update_drops_removed_modules() {
    let repo = TestRepo::new();
    repo.create_file("utils.lzy", "fn add(a, b) { a + b }");
    repo.create_file("old.lzy", "let gone = 1;");
    let mut manager = repo.manager();

    manager.import_repository(&repo.identifier(), "main").unwrap();

    repo.remove_file("old.lzy");
    let after = manager.update_repository(&repo.identifier(), "main").unwrap();

    assert_eq!(after.names().unwrap(), vec!["utils"]);
    assert!(after.get("old").is_err());
}

#[test]
fn test_updated_tree_starts_unresolved() {
    let repo = TestRepo::new();
    repo.create_file("utils.lzy", "let x = 1;");
    let mut manager = repo.manager();

    let before = manager.import_repository(&repo.identifier(), "main").unwrap();
    let utils = before.get("utils").unwrap();
    utils.as_module().unwrap().names().unwrap();

    let after = manager.update_repository(&repo.identifier(), "main").unwrap();
    let utils = after.get("utils").unwrap();
    assert!(!utils.as_module().unwrap().is_resolved());
}

#[test]
fn test_invalidate_then_import_rescans() {
    let repo = TestRepo::new();
    repo.create_file("utils.lzy", "let x = 1;");
    let mut manager = repo.manager();

    let before = manager.import_repository(&repo.identifier(), "main").unwrap();
    assert!(manager.invalidate(&repo.identifier(), "main"));

    let after = manager.import_repository(&repo.identifier(), "main").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
}
