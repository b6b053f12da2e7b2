//! Severity levels and threshold filtering.

pub mod filter;
pub mod severity;

pub use filter::*;
pub use severity::*;
