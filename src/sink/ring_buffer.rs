//! In-memory ring buffer sink.
//!
//! Keeps the most recent `limit` lines. Mostly useful in tests, where the
//! lines can be read back and decoded.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::{decode, LogRecord};

use super::Sink;

/// Default number of lines kept.
pub const DEFAULT_RING_LIMIT: usize = 100;

#[derive(Debug)]
struct RingState {
    lines: VecDeque<String>,
    closed: bool,
}

#[derive(Debug)]
pub struct RingBufferSink {
    limit: usize,
    state: Mutex<RingState>,
}

impl Default for RingBufferSink {
    fn default() -> Self {
        Self::new(DEFAULT_RING_LIMIT)
    }
}

impl RingBufferSink {
    /// A `limit` of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            state: Mutex::new(RingState {
                lines: VecDeque::with_capacity(limit.min(DEFAULT_RING_LIMIT)),
                closed: false,
            }),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.state.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().lines.is_empty()
    }

    /// Stored lines, oldest first, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.state.lock().lines.iter().cloned().collect()
    }

    /// Stored lines decoded back into records. Lines that fail to decode
    /// are skipped.
    pub fn records(&self) -> Vec<LogRecord> {
        self.state
            .lock()
            .lines
            .iter()
            .filter_map(|line| decode(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().lines.clear();
    }
}

impl Sink for RingBufferSink {
    fn write(&self, encoded: &[u8]) -> Result<(), SinkError> {
        let line = String::from_utf8_lossy(encoded);
        let line = line.trim_end_matches('\n').to_string();

        let mut state = self.state.lock();
        if state.closed {
            return Err(SinkError::Closed);
        }
        if state.lines.len() == self.limit {
            state.lines.pop_front();
        }
        state.lines.push_back(line);
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Stops accepting writes; stored lines stay readable.
    fn close(&self) -> Result<(), SinkError> {
        self.state.lock().closed = true;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("ring-buffer:{}", self.limit)
    }
}
