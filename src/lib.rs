//! Portolan Log - structured JSON-line logging
//!
//! A small logging facility for services and test suites. Every record is a
//! single JSON object on its own line, carrying a fixed header (name,
//! hostname, pid, level, message, timestamp, version) plus fields from the
//! logger's context and from the call site.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `level` - Severity ordering and threshold filtering
//! - `serializers` - Per-logger field serializers (`err`, `req`, `res`, custom)
//! - `record` - Fields, contexts, record assembly and JSON-line encoding
//! - `sink` - Destinations: stderr, stdout, files, in-memory ring buffer
//! - `logger` - The `Logger` façade, its streams and configuration
//! - `diagnostics` - Reports about the logger itself, via the `log` crate
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use portolan_log::{fields, LoggerConfig, RingBufferSink, Severity};
//!
//! let ring = Arc::new(RingBufferSink::default());
//! let logger = LoggerConfig::builder("svc")
//!     .standard_serializers()
//!     .stream(ring.clone(), Severity::Info)
//!     .build()
//!     .unwrap();
//!
//! logger.child(fields! { reqId = "abc" }).warn("slow request", fields! { ms = 1200 });
//! assert_eq!(ring.records()[0].field("reqId"), Some(&serde_json::json!("abc")));
//! ```

mod macros;

pub mod diagnostics;
pub mod error;
pub mod level;
pub mod logger;
pub mod record;
pub mod serializers;
pub mod sink;

pub use diagnostics::{init_diagnostics, DiagContext};
pub use error::{DecodeError, LoggerError, SerializationError, SinkError};
pub use level::{passes, Severity, LEVEL_ENV_VAR};
pub use logger::{
    create_logger, test_logger, Logger, LoggerConfig, LoggerConfigBuilder, LoggerSpec, SinkSpec,
    Stream, StreamConfig, StreamSpec, TEST_LOGGER_NAME,
};
pub use record::{decode, encode, Context, Fields, LogRecord};
pub use serializers::{error_value, SerializerRegistry};
pub use sink::{FileSink, RingBufferSink, Sink, StderrSink, StdoutSink, WriterSink};
