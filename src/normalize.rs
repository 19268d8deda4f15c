//! Header normalizer.
//!
//! Re-reads a tar stream entry by entry, clears the modification time of
//! every header and writes the entry back out unchanged otherwise. Output goes
//! to a [`PipeSink`], which is closed normally at the end of the input and
//! closed with the error if reading or writing fails.

use crate::error::FatalError;
use crate::pipe::PipeSink;
use crate::trace::PathTrace;
use std::io::{self, Read, Write};
use tar::{Archive, Builder, EntryType};
use tracing::debug;

/// Rewrite every header in `input` with a zero mtime, streaming into `output`.
///
/// Recoverable failures are delivered through the sink (`close_with_error`);
/// only a failure to finish the output archive for a reason other than the
/// reader having gone away is returned, as a [`FatalError`].
pub fn rewrite_headers<R, W>(
    input: R,
    output: W,
    trace: &mut dyn PathTrace,
) -> Result<(), FatalError>
where
    R: Read,
    W: PipeSink,
{
    let mut archive = Archive::new(input);
    let mut builder = Builder::new(output);

    match copy_entries(&mut archive, &mut builder, trace) {
        Ok(count) => debug!(entries = count, "Normalized archive"),
        Err(err) => {
            debug!(error = %err, "Normalizer failed, closing pipe with error");
            builder.get_mut().close_with_error(err);
            return Ok(());
        }
    }

    finish(builder)
}

fn copy_entries<R: Read, W: Write>(
    archive: &mut Archive<R>,
    builder: &mut Builder<W>,
    trace: &mut dyn PathTrace,
) -> io::Result<u64> {
    let mut count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let mut header = entry.header().clone();
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let path = entry.path()?.into_owned();

        trace.record(&name);
        header.set_mtime(0);

        match header.entry_type() {
            EntryType::Symlink | EntryType::Link => {
                let target = entry
                    .link_name()?
                    .ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("link entry {} has no target", name),
                        )
                    })?
                    .into_owned();
                builder.append_link(&mut header, &path, &target)?;
            }
            _ => builder.append_data(&mut header, &path, &mut entry)?,
        }
        count += 1;
    }
    Ok(count)
}

/// Write the end-of-archive marker and close the sink.
fn finish<W: PipeSink>(builder: Builder<W>) -> Result<(), FatalError> {
    match builder.into_inner() {
        Ok(mut output) => {
            output.close();
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Reader closed before the archive was finished");
            Ok(())
        }
        Err(err) => Err(FatalError::new("failed to close tar writer", err)),
    }
}
