//! Record destinations.
//!
//! A sink receives already-encoded lines. Implementations must make each
//! `write` call atomic with respect to other writes on the same sink, so
//! concurrent callers never interleave partial lines.

pub mod ring_buffer;
pub mod writer;

pub use ring_buffer::*;
pub use writer::*;

use crate::error::SinkError;

/// A destination for encoded records.
pub trait Sink: Send + Sync {
    /// Write one encoded record.
    fn write(&self, encoded: &[u8]) -> Result<(), SinkError>;

    /// Push buffered bytes to the destination.
    fn flush(&self) -> Result<(), SinkError>;

    /// Flush and release the destination. Later writes fail with
    /// [`SinkError::Closed`]. Closing twice is a no-op.
    fn close(&self) -> Result<(), SinkError>;

    /// Short label used in diagnostics, e.g. `stderr` or `file:/tmp/x.log`.
    fn describe(&self) -> String;
}
