//! Bounded in-process byte pipe.
//!
//! One writer, one reader, a fixed number of in-flight chunks. Writes block
//! while the buffer is full and reads block while it is empty. The writer ends
//! the stream with [`PipeWriter::close`] or [`PipeWriter::close_with_error`];
//! the latter surfaces on the reader as a `BrokenPipe` error whose inner error
//! is [`ClosedWithError`].

use crate::error::ClosedWithError;
use crossbeam_channel::{Receiver, Sender};
use std::io::{self, Cursor, Read, Write};

/// Default number of chunks the pipe holds before writes block.
pub const DEFAULT_CAPACITY: usize = 16;

type Chunk = Result<Vec<u8>, io::Error>;

/// Create a connected writer/reader pair holding at most `capacity` chunks.
///
/// A capacity of zero is raised to one.
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (
        PipeWriter { tx: Some(tx) },
        PipeReader {
            rx,
            chunk: Cursor::new(Vec::new()),
            state: ReadState::Open,
        },
    )
}

/// Write half of a stream that can be closed, optionally with a terminal error.
pub trait PipeSink: Write {
    /// End the stream normally. Closing twice is a no-op.
    fn close(&mut self);

    /// End the stream with `cause`. A no-op when already closed.
    fn close_with_error(&mut self, cause: io::Error);
}

/// Producer half of [`pipe`].
#[derive(Debug)]
pub struct PipeWriter {
    tx: Option<Sender<Chunk>>,
}

impl PipeWriter {
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

impl PipeSink for PipeWriter {
    fn close(&mut self) {
        self.tx.take();
    }

    fn close_with_error(&mut self, cause: io::Error) {
        if let Some(tx) = self.tx.take() {
            // The reader may already be gone; nobody is left to tell.
            let _ = tx.send(Err(cause));
        }
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let tx = self.tx.as_ref().ok_or_else(closed_pipe)?;
        tx.send(Ok(buf.to_vec())).map_err(|_| closed_pipe())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        if !self.is_closed() {
            self.close_with_error(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "pipe writer dropped without being closed",
            ));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Open,
    Eof,
    Failed,
}

/// Consumer half of [`pipe`].
#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Chunk>,
    chunk: Cursor<Vec<u8>>,
    state: ReadState,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.chunk.read(buf)?;
            if n > 0 || buf.is_empty() {
                return Ok(n);
            }
            match self.state {
                ReadState::Eof => return Ok(0),
                ReadState::Failed => return Err(closed_pipe()),
                ReadState::Open => {}
            }
            match self.rx.recv() {
                Ok(Ok(chunk)) => self.chunk = Cursor::new(chunk),
                Ok(Err(cause)) => {
                    self.state = ReadState::Failed;
                    return Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        ClosedWithError { cause },
                    ));
                }
                Err(_) => self.state = ReadState::Eof,
            }
        }
    }
}

fn closed_pipe() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "io: read/write on closed pipe")
}
