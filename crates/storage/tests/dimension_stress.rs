#![expect(clippy::unwrap_used, reason = "test code")]

use herbarium_storage::{Dimension, Storage};
use std::sync::{Arc, Barrier};
use tempfile::tempdir;

/// Ten threads split across two connections to the same database race to
/// resolve the same bilingual pair. A resolver on one connection can lose
/// the insert to the other and must recover by re-running the lookup;
/// exactly one row may exist afterwards and every thread must see its id.
#[test]
fn test_dimension_resolve_race() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let stores = [
        Arc::new(Storage::new(&db_path).unwrap()),
        Arc::new(Storage::new(&db_path).unwrap()),
    ];

    let barrier = Arc::new(Barrier::new(10));
    let mut handles = vec![];
    for i in 0..10 {
        let storage = Arc::clone(&stores[i % 2]);
        let barrier = Arc::clone(&barrier);
        handles.push(std::thread::spawn(move || {
            barrier.wait();
            storage.resolve_dimension(Dimension::Location, "Greenhouse", "温室")
        }));
    }

    let ids: Vec<i64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    assert!(ids.windows(2).all(|w| w[0] == w[1]), "ids diverged: {ids:?}");
    assert_eq!(stores[0].stats().unwrap().locations, 1);
}
