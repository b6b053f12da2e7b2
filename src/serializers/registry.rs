//! Field serializer registry.
//!
//! Maps field names to functions that turn a domain value into its logged
//! JSON form. A registry is owned by whoever builds the logger; there is no
//! process-wide registry.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::diagnostics::DiagContext;
use crate::error::SerializationError;

/// A field serializer.
pub type SerializerFn = Arc<dyn Fn(&Value) -> Result<Value, SerializationError> + Send + Sync>;

/// Named field serializers.
#[derive(Default)]
pub struct SerializerRegistry {
    serializers: RwLock<HashMap<String, SerializerFn>>,
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.field_names();
        names.sort();
        f.debug_struct("SerializerRegistry")
            .field("fields", &names)
            .finish()
    }
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the `err`, `req` and `res` serializers.
    pub fn with_standard() -> Self {
        let registry = Self::new();
        super::standard::register_standard(&registry);
        registry
    }

    /// Register `serializer` for `field`, replacing any previous one.
    pub fn register<F>(&self, field: &str, serializer: F)
    where
        F: Fn(&Value) -> Result<Value, SerializationError> + Send + Sync + 'static,
    {
        self.register_arc(field, Arc::new(serializer));
    }

    pub fn register_arc(&self, field: &str, serializer: SerializerFn) {
        let replaced = self
            .serializers
            .write()
            .insert(field.to_string(), serializer)
            .is_some();
        log::debug!(
            "{} SERIALIZER_REGISTERED replaced={}",
            DiagContext::default().field(field),
            replaced
        );
    }

    pub fn contains(&self, field: &str) -> bool {
        self.serializers.read().contains_key(field)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.serializers.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.serializers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.read().is_empty()
    }

    /// Serialize `value` for `field`.
    ///
    /// Returns `value` unchanged when no serializer is registered. A failing
    /// or panicking serializer yields a placeholder; this never errors.
    pub fn serialize(&self, field: &str, value: Value) -> Value {
        self.serialize_in(DiagContext::default(), field, value)
    }

    /// [`serialize`](Self::serialize) with failures reported against `diag`.
    pub(crate) fn serialize_in(&self, diag: DiagContext<'_>, field: &str, value: Value) -> Value {
        // Clone the handle out so the lock is not held while user code runs.
        let serializer = match self.serializers.read().get(field) {
            Some(s) => Arc::clone(s),
            None => return value,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| (*serializer)(&value))) {
            Ok(Ok(serialized)) => serialized,
            Ok(Err(e)) => {
                log::warn!(
                    "{} SERIALIZER_FAILED type={} reason={}",
                    diag.field(field),
                    json_type_name(&value),
                    e.reason
                );
                placeholder(json_type_name(&value), &e.reason)
            }
            Err(_) => {
                log::warn!(
                    "{} SERIALIZER_PANICKED type={}",
                    diag.field(field),
                    json_type_name(&value)
                );
                placeholder(json_type_name(&value), "serializer panicked")
            }
        }
    }
}

/// Value logged in place of a field that could not be serialized.
pub fn placeholder(type_name: &str, reason: &str) -> Value {
    json!({
        "error": "serialization failed",
        "type": type_name,
        "reason": reason,
    })
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
