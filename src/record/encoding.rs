//! JSON-line encoding.
//!
//! One record is one JSON object followed by `\n`.

use crate::diagnostics::DiagContext;
use crate::error::DecodeError;

use super::builder::LogRecord;

/// Encode a record as a newline-terminated JSON line.
///
/// Never fails. If the record cannot be encoded, a degraded record is
/// encoded in its place.
pub fn encode(record: &LogRecord) -> Vec<u8> {
    match serde_json::to_vec(record) {
        Ok(mut line) => {
            line.push(b'\n');
            line
        }
        Err(e) => {
            log::warn!(
                "{} ENCODE_FAILED level={} reason={}",
                DiagContext::logger(record.name()),
                record.level(),
                e
            );
            let degraded = LogRecord::degraded(record.level(), record.name(), &e.to_string());
            match serde_json::to_vec(&degraded) {
                Ok(mut line) => {
                    line.push(b'\n');
                    line
                }
                Err(_) => format!(
                    "{{\"version\":0,\"level\":{},\"message\":\"record degraded\"}}\n",
                    record.level().as_int()
                )
                .into_bytes(),
            }
        }
    }
}

/// Parse one encoded line back into a record.
pub fn decode(line: &str) -> Result<LogRecord, DecodeError> {
    let trimmed = line.trim_end_matches(&['\n', '\r'][..]);
    if trimmed.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Decode every non-empty line of `text`, skipping lines that fail.
pub fn decode_lines(text: &str) -> Vec<LogRecord> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| match decode(l) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("DECODE_SKIPPED reason={}", e);
                None
            }
        })
        .collect()
}
