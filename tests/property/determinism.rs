//! Property-based tests for determinism guarantees

use context_hash::hash_context;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn file_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z]{1,6}){0,2}\\.txt"
}

fn tree() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(file_name(), prop::collection::vec(any::<u8>(), 0..2048), 0..12)
}

fn materialize(files: &BTreeMap<String, Vec<u8>>, order: &[usize]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();
    let entries: Vec<_> = files.iter().collect();
    for &i in order {
        let (name, content) = entries[i];
        let path = temp_dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp_dir
}

/// Creation order of files does not affect the digest
#[test]
fn test_creation_order_does_not_matter() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(24));

    runner
        .run(&tree(), |files| {
            let forward: Vec<usize> = (0..files.len()).collect();
            let backward: Vec<usize> = forward.iter().rev().copied().collect();

            let a = materialize(&files, &forward);
            let b = materialize(&files, &backward);
            prop_assert_eq!(
                hash_context(a.path(), "Dockerfile").unwrap(),
                hash_context(b.path(), "Dockerfile").unwrap()
            );
            Ok(())
        })
        .unwrap();
}

/// Rewriting modification times never changes the digest
#[test]
fn test_mtimes_do_not_matter() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(24));

    runner
        .run(&(tree(), 0u64..1_000_000_000), |(files, offset)| {
            let order: Vec<usize> = (0..files.len()).collect();
            let ctx = materialize(&files, &order);
            let before = hash_context(ctx.path(), "Dockerfile").unwrap();

            for name in files.keys() {
                let file = File::options()
                    .write(true)
                    .open(ctx.path().join(name))
                    .unwrap();
                file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(offset))
                    .unwrap();
            }

            prop_assert_eq!(hash_context(ctx.path(), "Dockerfile").unwrap(), before);
            Ok(())
        })
        .unwrap();
}

/// Flipping one byte of one file always changes the digest
#[test]
fn test_single_byte_change_is_detected() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(24));

    runner
        .run(
            &(prop::collection::vec(any::<u8>(), 1..4096), any::<prop::sample::Index>()),
            |(content, index)| {
                let ctx = TempDir::new().unwrap();
                fs::write(ctx.path().join("Dockerfile"), "FROM scratch\n").unwrap();
                let path = ctx.path().join("data.bin");
                fs::write(&path, &content).unwrap();
                let before = hash_context(ctx.path(), "Dockerfile").unwrap();

                let mut changed = content.clone();
                let i = index.index(changed.len());
                changed[i] ^= 0xff;
                fs::write(&path, &changed).unwrap();
                let changed_digest = hash_context(ctx.path(), "Dockerfile").unwrap();
                prop_assert_ne!(&changed_digest, &before);

                fs::write(&path, &content).unwrap();
                let restored_digest = hash_context(ctx.path(), "Dockerfile").unwrap();
                prop_assert_eq!(&restored_digest, &before);
                Ok(())
            },
        )
        .unwrap();
}
