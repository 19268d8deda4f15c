//! Path trace sinks.
//!
//! The normalizer reports the name of every entry it rewrites to a
//! [`PathTrace`]. Tracing is a side channel: nothing recorded here reaches the
//! digest.

use std::io::Write;
use tracing::{info, warn};

/// Receives one call per archived entry, in archive order.
pub trait PathTrace {
    fn record(&mut self, path: &str);
}

impl<F: FnMut(&str)> PathTrace for F {
    fn record(&mut self, path: &str) {
        self(path)
    }
}

/// Discards every path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl PathTrace for NoTrace {
    fn record(&mut self, _path: &str) {}
}

/// Emits each path as an `info` event on the `context_hash::trace` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

/// Log target [`LogTrace`] emits on.
pub const TRACE_TARGET: &str = "context_hash::trace";

impl PathTrace for LogTrace {
    fn record(&mut self, path: &str) {
        info!(target: TRACE_TARGET, path, "+ {}", path);
    }
}

/// Writes `+ <path>` lines to any writer, typically stderr.
#[derive(Debug)]
pub struct WriterTrace<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> WriterTrace<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PathTrace for WriterTrace<W> {
    fn record(&mut self, path: &str) {
        if self.failed {
            return;
        }
        if let Err(e) = writeln!(self.writer, "+ {}", path) {
            // The listing is diagnostic only; stop writing but keep hashing.
            warn!(error = %e, "Path trace output failed");
            self.failed = true;
        }
    }
}
