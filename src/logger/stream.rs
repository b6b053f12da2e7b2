//! A sink paired with its threshold.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::diagnostics::DiagContext;
use crate::level::{Severity, Threshold};
use crate::sink::Sink;

/// One output of a logger: a sink, its threshold and a failure counter.
///
/// Streams are shared by a logger and every child derived from it, so a
/// threshold change is seen by all of them.
pub struct Stream {
    id: String,
    threshold: Threshold,
    sink: Arc<dyn Sink>,
    failed_writes: AtomicU64,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("threshold", &self.threshold.get())
            .field("sink", &self.sink.describe())
            .field("failed_writes", &self.failed_writes())
            .finish()
    }
}

impl Stream {
    pub fn new(id: &str, sink: Arc<dyn Sink>, level: Severity) -> Self {
        Self {
            id: id.to_string(),
            threshold: Threshold::new(level),
            sink,
            failed_writes: AtomicU64::new(0),
        }
    }

    /// Stream identified by the sink's own description.
    pub fn from_sink(sink: Arc<dyn Sink>, level: Severity) -> Self {
        let id = sink.describe();
        Self::new(&id, sink, level)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn threshold(&self) -> Severity {
        self.threshold.get()
    }

    pub fn set_threshold(&self, level: Severity) {
        self.threshold.set(level);
    }

    pub fn passes(&self, level: Severity) -> bool {
        self.threshold.passes(level)
    }

    /// Writes dropped because the sink failed.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Write one encoded record, recording rather than returning failures.
    pub(crate) fn deliver(&self, line: &[u8], logger: &str) -> bool {
        match self.sink.write(line) {
            Ok(()) => true,
            Err(e) => {
                let failed = self.failed_writes.fetch_add(1, Ordering::Relaxed) + 1;
                log::warn!(
                    "{} SINK_WRITE_FAILED error={} failed_total={}",
                    DiagContext::logger(logger).stream(&self.id),
                    e,
                    failed
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RingBufferSink;

    #[test]
    fn test_deliver_counts_failures() {
        let ring = Arc::new(RingBufferSink::new(4));
        let stream = Stream::from_sink(ring.clone(), Severity::Info);
        assert_eq!(stream.id(), "ring-buffer:4");

        assert!(stream.deliver(b"one\n", "t"));
        ring.close().unwrap();
        assert!(!stream.deliver(b"two\n", "t"));
        assert!(!stream.deliver(b"three\n", "t"));

        assert_eq!(stream.failed_writes(), 2);
        assert_eq!(ring.lines(), vec!["one"]);
    }

    #[test]
    fn test_threshold_is_mutable() {
        let stream = Stream::new("s", Arc::new(RingBufferSink::default()), Severity::Warn);
        assert!(!stream.passes(Severity::Info));
        stream.set_threshold(Severity::Info);
        assert!(stream.passes(Severity::Info));
        assert_eq!(stream.threshold(), Severity::Info);
    }
}
