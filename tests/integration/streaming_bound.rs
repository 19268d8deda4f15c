//! Integration tests for trees much larger than the pipe buffer

use super::test_utils::{context_with, write_file};
use context_hash::{hash_context, ContextHasher};

/// Many files through a one-chunk pipe
#[test]
fn test_many_files_through_small_pipe() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch")]);
    let block = vec![b'x'; 4096];
    for dir in 0..20 {
        for file in 0..100 {
            write_file(ctx.path(), &format!("d{:02}/f{:03}.bin", dir, file), &block);
        }
    }

    let small = ContextHasher::new(ctx.path(), "Dockerfile")
        .with_pipe_capacity(1)
        .hash()
        .unwrap();
    assert_eq!(small, hash_context(ctx.path(), "Dockerfile").unwrap());
}

/// One file several times larger than everything the pipe can hold
#[test]
fn test_large_file_through_small_pipe() {
    let content: Vec<u8> = (0..32 * 1024 * 1024u32).map(|i| (i % 251) as u8).collect();
    let ctx = context_with(&[("Dockerfile", b"FROM scratch"), ("big.bin", &content)]);

    let first = ContextHasher::new(ctx.path(), "Dockerfile")
        .with_pipe_capacity(1)
        .hash()
        .unwrap();
    let second = ContextHasher::new(ctx.path(), "Dockerfile")
        .with_pipe_capacity(1)
        .hash()
        .unwrap();
    assert_eq!(first, second);
}
