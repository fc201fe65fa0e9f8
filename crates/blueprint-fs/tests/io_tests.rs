//! Overwrite and concurrency behaviour of the atomic writer

use blueprint_fs::{read_locked, write_text};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_overwrite_replaces_whole_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cache.json");

    write_text(&path, "{\"a\":1,\"b\":2}").unwrap();
    write_text(&path, "{}").unwrap();

    assert_eq!(read_locked(&path).unwrap(), Some("{}".to_string()));
}

#[test]
fn test_concurrent_writers_never_tear_the_file() {
    let dir = tempdir().unwrap();
    let path = Arc::new(dir.path().join("journal.toml"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = Arc::clone(&path);
            thread::spawn(move || {
                let body = format!("writer = {i}\n").repeat(64);
                write_text(&path, &body).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let content = read_locked(&path).unwrap().unwrap();
    let first = content.lines().next().unwrap().to_string();
    assert!(content.lines().all(|line| line == first));
    assert_eq!(content.lines().count(), 64);
}
