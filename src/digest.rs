//! SHA-256 digest of a byte stream.

use crate::error::ContextHashError;
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use tracing::debug;

/// Consume `reader` to the end and return the lowercase hex SHA-256 of
/// everything read.
///
/// Read failures are classified with [`ContextHashError::from_stream`], so an
/// error the producing side closed the pipe with surfaces as that error
/// rather than as a generic read failure.
pub fn digest_stream<R: Read>(mut reader: R) -> Result<String, ContextHashError> {
    let mut hasher = Sha256::new();
    let bytes = io::copy(&mut reader, &mut hasher).map_err(ContextHashError::from_stream)?;
    let digest = hex::encode(hasher.finalize());
    debug!(bytes, digest = %digest, "Digest complete");
    Ok(digest)
}
