//! Concurrent writers sharing one store root
//!
//! No in-process lock guards `put`; these tests rely only on link(2)
//! refusing to replace an existing name.

use hashstore_store::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const NUM_THREADS: usize = 16;

#[test]
fn test_identical_content_has_one_unique_writer() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("store");
    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let created = Arc::new(AtomicUsize::new(0));
    let duplicates = Arc::new(AtomicUsize::new(0));
    let content = vec![7u8; 256 * 1024];

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let created = Arc::clone(&created);
            let duplicates = Arc::clone(&duplicates);
            let root = root.clone();
            let content = content.clone();

            thread::spawn(move || {
                // Each thread opens its own store, as separate processes would
                let store = Store::at(&root).unwrap();
                barrier.wait();

                let address = store.put_bytes(&content).unwrap();
                if address.is_duplicate {
                    duplicates.fetch_add(1, Ordering::SeqCst);
                } else {
                    created.fetch_add(1, Ordering::SeqCst);
                }
                address.digest
            })
        })
        .collect();

    let digests: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(duplicates.load(Ordering::SeqCst), NUM_THREADS - 1);
    assert!(digests.windows(2).all(|pair| pair[0] == pair[1]));

    let store = Store::at(&root).unwrap();
    assert_eq!(store.count(), 1);
    assert_eq!(store.size(), content.len() as u64);
    assert_eq!(
        std::fs::read_dir(store.staging_root()).unwrap().count(),
        0,
        "staged files leaked"
    );
}

#[test]
fn test_distinct_content_is_independent() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::at(temp_dir.path()).unwrap();
    let barrier = Arc::new(Barrier::new(NUM_THREADS));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let store = store.clone();

            thread::spawn(move || {
                barrier.wait();
                let address = store.put_str(&format!("content {i}")).unwrap();
                assert!(!address.is_duplicate);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.count(), NUM_THREADS);
    assert_eq!(store.corrupted().count(), 0);
}
