//! Logger façade, streams and configuration.

pub mod config;
pub mod facade;
pub mod stream;

pub use config::*;
pub use facade::*;
pub use stream::*;
