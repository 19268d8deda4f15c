//! Input path checks.

use crate::error::ContextHashError;
use std::fs;
use std::path::Path;

/// Succeeds when `path` exists and is a directory (symlinks are followed).
pub fn ensure_directory(path: &Path) -> Result<(), ContextHashError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(ContextHashError::NotADirectory {
            path: path.to_path_buf(),
        }),
    }
}

/// Succeeds when `path` exists and is a regular file (symlinks are followed).
pub fn ensure_file(path: &Path) -> Result<(), ContextHashError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ContextHashError::NotAFile {
            path: path.to_path_buf(),
        }),
    }
}
