//! Log records.
//!
//! - `fields` - call-site fields
//! - `context` - immutable per-logger fields
//! - `builder` - record assembly
//! - `encoding` - JSON-line encode/decode

pub mod builder;
pub mod context;
pub mod encoding;
pub mod fields;

pub use builder::*;
pub use context::*;
pub use encoding::*;
pub use fields::*;
