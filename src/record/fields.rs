//! Call-site fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diagnostics::DiagContext;
use crate::serializers::placeholder;

/// Fields attached to a single log call. Keys are unique; the last insert wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert any serializable value.
    ///
    /// A value that cannot be represented as JSON is replaced by a
    /// placeholder naming its Rust type.
    pub fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                let type_name = std::any::type_name::<T>();
                log::warn!(
                    "{} FIELD_CONVERSION_FAILED type={} reason={}",
                    DiagContext::default().field(key),
                    type_name,
                    e
                );
                placeholder(type_name, &e.to_string())
            }
        };
        self.map.insert(key.to_string(), value);
    }

    pub fn insert_value(&mut self, key: &str, value: Value) {
        self.map.insert(key.to_string(), value);
    }

    /// Builder form of [`Fields::insert`].
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.map.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self { map }
    }
}

/// An object becomes one field per key; any other value is stored under
/// `value`.
impl From<Value> for Fields {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self { map },
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                Self { map }
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
