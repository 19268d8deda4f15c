//! Tar header encoding for archive entries.
//!
//! Headers use the GNU layout. Names and link targets that do not fit the
//! 100-byte header fields are carried by a preceding `././@LongLink` entry,
//! the same extension `tar::Builder` writes and `tar::Archive` reads.

use std::fs::Metadata;
use std::io;
use tar::{EntryType, Header, HeaderMode};

/// Size of one tar block.
pub const BLOCK_SIZE: u64 = 512;

const LONG_LINK: &[u8] = b"././@LongLink";

/// Bytes needed to pad `len` up to a block boundary.
pub fn padding(len: u64) -> u64 {
    match len % BLOCK_SIZE {
        0 => 0,
        rem => BLOCK_SIZE - rem,
    }
}

/// Encode the header block(s) for one entry.
///
/// Ownership is written as uid 0 / gid 0 with empty user and group names.
/// Everything else comes from `meta`, including the modification time and,
/// for device nodes, the device numbers.
pub fn encode(name: &[u8], meta: &Metadata, link_target: Option<&[u8]>) -> io::Result<Vec<u8>> {
    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(meta, HeaderMode::Complete);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mode(permission_bits(meta));
    if let Some((major, minor)) = device_numbers(meta) {
        header.set_device_major(major)?;
        header.set_device_minor(minor)?;
    }

    let mut out = Vec::with_capacity(BLOCK_SIZE as usize);
    {
        let fields = header.as_old_mut();
        fill_field(&mut out, &mut fields.name, name, EntryType::GNULongName);
        if let Some(target) = link_target {
            fill_field(&mut out, &mut fields.linkname, target, EntryType::GNULongLink);
        }
    }
    header.set_cksum();
    out.extend_from_slice(header.as_bytes());
    Ok(out)
}

/// Copy `value` into a fixed header field, spilling to a long-link entry
/// written to `out` when it does not fit.
fn fill_field(out: &mut Vec<u8>, field: &mut [u8; 100], value: &[u8], kind: EntryType) {
    if value.len() > field.len() {
        push_long_entry(out, value, kind);
    }
    let n = value.len().min(field.len());
    field.fill(0);
    field[..n].copy_from_slice(&value[..n]);
}

fn push_long_entry(out: &mut Vec<u8>, value: &[u8], kind: EntryType) {
    let mut ext = Header::new_gnu();
    ext.as_old_mut().name[..LONG_LINK.len()].copy_from_slice(LONG_LINK);
    ext.set_mode(0o644);
    ext.set_uid(0);
    ext.set_gid(0);
    ext.set_mtime(0);
    // NUL-terminated, as GNU tar writes it
    let size = value.len() as u64 + 1;
    ext.set_size(size);
    ext.set_entry_type(kind);
    ext.set_cksum();

    out.extend_from_slice(ext.as_bytes());
    out.extend_from_slice(value);
    out.push(0);
    out.resize(out.len() + padding(size) as usize, 0);
}

/// Major and minor number of a character or block device.
#[cfg(unix)]
fn device_numbers(meta: &Metadata) -> Option<(u32, u32)> {
    use std::os::unix::fs::{FileTypeExt, MetadataExt};

    let file_type = meta.file_type();
    if !file_type.is_char_device() && !file_type.is_block_device() {
        return None;
    }
    Some(split_rdev(meta.rdev()))
}

#[cfg(not(unix))]
fn device_numbers(_meta: &Metadata) -> Option<(u32, u32)> {
    None
}

// glibc's dev_t layout
#[cfg(target_os = "linux")]
fn split_rdev(rdev: u64) -> (u32, u32) {
    let major = ((rdev >> 8) & 0xfff) | ((rdev >> 32) & !0xfff);
    let minor = (rdev & 0xff) | ((rdev >> 12) & !0xff);
    (major as u32, minor as u32)
}

// BSD layout, also used by macOS
#[cfg(all(unix, not(target_os = "linux")))]
fn split_rdev(rdev: u64) -> (u32, u32) {
    (((rdev >> 24) & 0xff) as u32, (rdev & 0xff_ffff) as u32)
}

#[cfg(unix)]
fn permission_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &Metadata) -> u32 {
    match (meta.is_dir(), meta.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
