//! Logger context.
//!
//! A `Context` is immutable. Deriving a child context copies the parent's
//! entries into a new map and overlays the extra fields; the parent is left
//! untouched and stays shareable.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::fields::Fields;

/// Fields attached to every record of one logger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: Arc<Map<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// New context with `extra` overlaid; `extra` wins on key collisions.
    pub fn overlay(&self, extra: Fields) -> Context {
        if extra.is_empty() {
            return self.clone();
        }
        let mut merged = (*self.fields).clone();
        for (key, value) in extra {
            merged.insert(key, value);
        }
        Context {
            fields: Arc::new(merged),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Fields> for Context {
    fn from(fields: Fields) -> Self {
        Context {
            fields: Arc::new(fields.into_map()),
        }
    }
}
