//! Level filtering.
//!
//! A record passes a threshold when its severity is at least the threshold.

use std::sync::atomic::{AtomicU8, Ordering};

use super::severity::Severity;

/// Environment variable that selects the default stream threshold.
pub const LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// Returns true when a record at `level` should reach a stream at `threshold`.
pub fn passes(level: Severity, threshold: Severity) -> bool {
    level >= threshold
}

/// Mutable per-stream threshold.
///
/// Stored as the integer level code so reads and updates from different
/// threads never observe a torn value.
#[derive(Debug)]
pub struct Threshold {
    code: AtomicU8,
}

impl Threshold {
    pub fn new(level: Severity) -> Self {
        Self {
            code: AtomicU8::new(level.as_int()),
        }
    }

    pub fn get(&self) -> Severity {
        // Only valid codes are ever stored.
        Severity::from_int(u64::from(self.code.load(Ordering::Acquire))).unwrap_or(Severity::Trace)
    }

    /// Takes effect for subsequent `passes` checks.
    pub fn set(&self, level: Severity) {
        self.code.store(level.as_int(), Ordering::Release);
    }

    pub fn passes(&self, level: Severity) -> bool {
        passes(level, self.get())
    }
}

/// Resolve a raw level setting, falling back when absent or unrecognized.
pub fn resolve_level(raw: Option<&str>, fallback: Severity) -> Severity {
    match raw {
        Some(value) => match value.parse::<Severity>() {
            Ok(level) => level,
            Err(_) => {
                log::warn!(
                    "LEVEL_UNRECOGNIZED value={:?} fallback={}",
                    value,
                    fallback
                );
                fallback
            }
        },
        None => fallback,
    }
}

/// Read the default threshold from `var`.
pub fn level_from_env(var: &str, fallback: Severity) -> Severity {
    let raw = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
    resolve_level(raw.as_deref(), fallback)
}
