//! Field serializers.
//!
//! - `registry` - per-logger map of field name to serializer
//! - `standard` - the `err`, `req` and `res` serializers

pub mod registry;
pub mod standard;

pub use registry::*;
pub use standard::{error_value, register_standard};
