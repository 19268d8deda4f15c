//! Relative path rendering for archive names and pattern matching

use std::path::{Component, Path};

/// Render `path` relative to `root` with `/` separators.
///
/// Returns an empty string for the root itself. Components that are not valid
/// UTF-8 are rendered lossily; use [`relative_bytes`] for archive names.
pub fn relative_slash(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&name.to_string_lossy());
        }
    }
    out
}

/// Byte form of [`relative_slash`], exact on Unix.
#[cfg(unix)]
pub fn relative_bytes(root: &Path, path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;

    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut out = Vec::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            if !out.is_empty() {
                out.push(b'/');
            }
            out.extend_from_slice(name.as_bytes());
        }
    }
    out
}

#[cfg(not(unix))]
pub fn relative_bytes(root: &Path, path: &Path) -> Vec<u8> {
    relative_slash(root, path).into_bytes()
}

/// Byte form of a symlink target as stored in the archive.
#[cfg(unix)]
pub fn link_bytes(target: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    target.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
pub fn link_bytes(target: &Path) -> Vec<u8> {
    target.to_string_lossy().replace('\\', "/").into_bytes()
}
