//! Deterministic context archiver.
//!
//! [`ArchiveStream`] renders the entries of a build context as a tar byte
//! stream on demand: each call to `read` pulls only as much of the tree as it
//! needs, so at most one header and one file handle are live at a time.

pub mod header;

use crate::error::ArchiveError;
use crate::ignore::PatternMatcher;
use crate::tree::path;
use crate::tree::walker::ContextWalker;
use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Content of the regular file currently being streamed.
struct Body {
    path: PathBuf,
    file: File,
    remaining: u64,
    padding: u64,
}

/// Lazily produced tar stream of the entries a matcher leaves in a context.
///
/// Entries appear in walk order: depth first, siblings sorted by file name.
/// The stream ends with the two zero blocks that mark the end of an archive.
pub struct ArchiveStream {
    walker: ContextWalker,
    pending: Cursor<Vec<u8>>,
    body: Option<Body>,
    entries: u64,
    finished: bool,
}

impl ArchiveStream {
    pub fn new(root: &Path, matcher: PatternMatcher) -> Self {
        Self {
            walker: ContextWalker::new(root, matcher),
            pending: Cursor::new(Vec::new()),
            body: None,
            entries: 0,
            finished: false,
        }
    }

    /// Number of entries emitted so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Queue the next entry, or the end-of-archive marker once the walk is done.
    fn advance(&mut self) -> Result<(), ArchiveError> {
        let entry = match self.walker.next() {
            Some(entry) => entry?,
            None => {
                debug!(entries = self.entries, "Archive complete");
                self.pending = Cursor::new(vec![0; 2 * header::BLOCK_SIZE as usize]);
                self.finished = true;
                return Ok(());
            }
        };

        let file_type = entry.file_type();
        if is_socket(&file_type) {
            warn!(path = %entry.relative(), "Skipping socket");
            return Ok(());
        }

        let meta = entry.metadata()?;
        let mut name = path::relative_bytes(self.walker.root(), entry.path());
        if file_type.is_dir() {
            name.push(b'/');
        }
        let link = if file_type.is_symlink() {
            let target =
                fs::read_link(entry.path()).map_err(|e| ArchiveError::new(entry.path(), e))?;
            Some(path::link_bytes(&target))
        } else {
            None
        };

        if file_type.is_file() && meta.len() > 0 {
            let file = File::open(entry.path()).map_err(|e| ArchiveError::new(entry.path(), e))?;
            self.body = Some(Body {
                path: entry.path().to_path_buf(),
                file,
                remaining: meta.len(),
                padding: header::padding(meta.len()),
            });
        }

        trace!(path = %entry.relative(), size = meta.len(), "Archiving entry");
        let encoded = header::encode(&name, &meta, link.as_deref())
            .map_err(|e| ArchiveError::new(entry.path(), e))?;
        self.pending = Cursor::new(encoded);
        self.entries += 1;
        Ok(())
    }

    /// Stream file content, then queue its padding once the recorded size is read.
    fn read_body(&mut self, buf: &mut [u8]) -> Result<Option<usize>, ArchiveError> {
        let Some(body) = self.body.as_mut() else {
            return Ok(None);
        };
        if body.remaining == 0 {
            let padding = body.padding as usize;
            self.body = None;
            self.pending = Cursor::new(vec![0; padding]);
            return Ok(Some(0));
        }
        let want = usize::try_from(body.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = body
            .file
            .read(&mut buf[..want])
            .map_err(|e| ArchiveError::new(&body.path, e))?;
        if n == 0 {
            return Err(ArchiveError::new(
                &body.path,
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "file shrank while being archived",
                ),
            ));
        }
        body.remaining -= n as u64;
        Ok(Some(n))
    }
}

impl Read for ArchiveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.pending.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            match self.read_body(buf)? {
                Some(0) => continue,
                Some(n) => return Ok(n),
                None => {}
            }
            if self.finished {
                return Ok(0);
            }
            self.advance()?;
        }
    }
}

#[cfg(unix)]
fn is_socket(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_socket()
}

#[cfg(not(unix))]
fn is_socket(_file_type: &fs::FileType) -> bool {
    false
}
