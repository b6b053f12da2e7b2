//! Record assembly.
//!
//! Builds one immutable [`LogRecord`] from the logger context, the call-site
//! fields and the message. Building never fails: anything unexpected
//! produces a degraded record that still carries the timestamp, level, name
//! and a note about what went wrong.

use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, SubsecRound, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::diagnostics::DiagContext;
use crate::level::Severity;
use crate::serializers::SerializerRegistry;

use super::context::Context;
use super::fields::Fields;

/// Current record format version.
pub const RECORD_VERSION: u8 = 0;

/// Keys owned by the record header. Fields with these names are dropped.
pub const RESERVED_KEYS: &[&str] = &[
    "version",
    "name",
    "hostname",
    "pid",
    "level",
    "message",
    "timestamp",
];

lazy_static! {
    static ref HOSTNAME: String = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
}

/// One fully assembled log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    version: u8,
    name: String,
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    pid: u32,
    level: Severity,
    message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

impl LogRecord {
    fn header(level: Severity, name: &str, message: String) -> Self {
        Self {
            version: RECORD_VERSION,
            name: name.to_string(),
            hostname: HOSTNAME.clone(),
            pid: std::process::id(),
            level,
            message,
            // Truncated to what the wire format carries.
            timestamp: Utc::now().trunc_subsecs(3),
            fields: Map::new(),
        }
    }

    /// Minimal record reporting that the real one could not be produced.
    pub fn degraded(level: Severity, name: &str, reason: &str) -> Self {
        Self::header(level, name, format!("record degraded: {}", reason))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Assemble a record.
///
/// Call-site fields with a registered serializer are serialized first, then
/// laid over the context. Context values are expected to be serialized
/// already (the logger does that when deriving a child).
pub fn build(
    context: &Context,
    level: Severity,
    name: &str,
    message: &str,
    fields: Fields,
    registry: &SerializerRegistry,
) -> LogRecord {
    let diag = DiagContext::logger(name);
    let assembled = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut record = LogRecord::header(level, name, message.to_string());
        let mut merged = context.as_map().clone();
        for (key, value) in fields {
            let value = registry.serialize_in(diag, &key, value);
            merged.insert(key, value);
        }

        for key in RESERVED_KEYS {
            if merged.remove(*key).is_some() {
                log::debug!("{} RESERVED_FIELD_DROPPED", diag.field(key));
            }
        }
        record.fields = merged;
        record
    }));

    match assembled {
        Ok(record) => record,
        Err(_) => {
            log::warn!("{} RECORD_DEGRADED reason=panic during build", diag);
            LogRecord::degraded(level, name, "panic while assembling fields")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerializationError;
    use serde_json::json;

    #[test]
    fn test_build_merges_context_under_fields() {
        let registry = SerializerRegistry::new();
        let context = Context::from(Fields::new().with("svc", "portolan").with("a", &0));
        let fields = Fields::new().with("a", &1).with("b", "two");

        let record = build(&context, Severity::Info, "portolan-test", "hello", fields, &registry);

        assert_eq!(record.name(), "portolan-test");
        assert_eq!(record.level(), Severity::Info);
        assert_eq!(record.message(), "hello");
        assert_eq!(record.version(), RECORD_VERSION);
        assert_eq!(record.pid(), std::process::id());
        assert_eq!(record.field("svc"), Some(&json!("portolan")));
        assert_eq!(record.field("a"), Some(&json!(1)));
        assert_eq!(record.field("b"), Some(&json!("two")));
    }

    #[test]
    fn test_build_applies_serializers_to_fields() {
        let registry = SerializerRegistry::with_standard();
        let fields = Fields::new()
            .with("err", &json!({"message": "boom", "stack": "s", "extra": 1}))
            .with("other", &json!({"message": "kept", "extra": 1}));

        let record = build(&Context::new(), Severity::Error, "t", "m", fields, &registry);
        assert_eq!(record.field("err"), Some(&json!({"message": "boom", "stack": "s"})));
        assert_eq!(record.field("other"), Some(&json!({"message": "kept", "extra": 1})));
    }

    #[test]
    fn test_failing_serializer_keeps_siblings() {
        let registry = SerializerRegistry::new();
        registry.register("err", |_| Err(SerializationError::new("err", "nope")));
        let fields = Fields::new().with("err", "x").with("a", &1);

        let record = build(&Context::new(), Severity::Error, "t", "m", fields, &registry);
        assert_eq!(record.field("err").unwrap()["error"], json!("serialization failed"));
        assert_eq!(record.field("a"), Some(&json!(1)));
    }

    #[test]
    fn test_reserved_keys_dropped() {
        let registry = SerializerRegistry::new();
        let fields = Fields::new().with("level", "spoofed").with("message", "x").with("ok", &true);

        let record = build(&Context::new(), Severity::Warn, "t", "real", fields, &registry);
        assert_eq!(record.level(), Severity::Warn);
        assert_eq!(record.message(), "real");
        assert!(record.field("level").is_none());
        assert_eq!(record.fields().len(), 1);
    }

    #[test]
    fn test_degraded_record() {
        let record = LogRecord::degraded(Severity::Fatal, "t", "oops");
        assert_eq!(record.level(), Severity::Fatal);
        assert_eq!(record.name(), "t");
        assert!(record.message().contains("oops"));
        assert!(record.fields().is_empty());
    }

    #[test]
    fn test_build_is_deterministic_apart_from_time() {
        let registry = SerializerRegistry::with_standard();
        let context = Context::from(Fields::new().with("svc", "p"));
        let fields = || Fields::new().with("a", &[1, 2, 3]).with("req", &json!({"method": "GET"}));

        let mut first = build(&context, Severity::Info, "t", "m", fields(), &registry);
        let second = build(&context, Severity::Info, "t", "m", fields(), &registry);
        first.timestamp = second.timestamp;
        assert_eq!(first, second);
    }
}
