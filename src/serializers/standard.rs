//! Standard serializers for errors, HTTP requests and HTTP responses.
//!
//! Each one keeps a fixed set of well-known keys. Inputs that do not look like
//! the expected object are logged unchanged.

use std::error::Error;

use serde_json::{Map, Value};

use super::registry::SerializerRegistry;

const ERR_KEYS: &[&str] = &["message", "name", "stack", "code", "signal"];
const REQ_KEYS: &[&str] = &["method", "url", "headers", "remoteAddress", "remotePort"];
const RES_KEYS: &[&str] = &["statusCode", "header"];

pub fn register_standard(registry: &SerializerRegistry) {
    registry.register("err", |v| Ok(err_serializer(v)));
    registry.register("req", |v| Ok(req_serializer(v)));
    registry.register("res", |v| Ok(res_serializer(v)));
}

/// `err`: `{message, name, stack, code, signal}`; a bare string becomes
/// `{message}`.
pub fn err_serializer(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let mut out = Map::new();
            out.insert("message".to_string(), Value::String(s.clone()));
            Value::Object(out)
        }
        Value::Object(obj) if obj.contains_key("message") || obj.contains_key("stack") => {
            pick(obj, ERR_KEYS)
        }
        _ => value.clone(),
    }
}

/// `req`: `{method, url, headers, remoteAddress, remotePort}`.
pub fn req_serializer(value: &Value) -> Value {
    match value {
        Value::Object(obj) if obj.contains_key("method") || obj.contains_key("url") => {
            pick(obj, REQ_KEYS)
        }
        _ => value.clone(),
    }
}

/// `res`: `{statusCode, header}`.
pub fn res_serializer(value: &Value) -> Value {
    match value {
        Value::Object(obj) if obj.contains_key("statusCode") => pick(obj, RES_KEYS),
        _ => value.clone(),
    }
}

fn pick(obj: &Map<String, Value>, keys: &[&str]) -> Value {
    let mut out = Map::new();
    for key in keys {
        if let Some(v) = obj.get(*key) {
            out.insert((*key).to_string(), v.clone());
        }
    }
    Value::Object(out)
}

/// Render a Rust error in the shape the `err` serializer expects.
///
/// `stack` holds the error followed by each `source()` on its own
/// `Caused by:` line.
pub fn error_value<E: Error + ?Sized>(err: &E) -> Value {
    let mut stack = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        stack.push_str("\nCaused by: ");
        stack.push_str(&cause.to_string());
        source = cause.source();
    }

    let full_name = std::any::type_name::<E>();
    let name = full_name.rsplit("::").next().unwrap_or(full_name);

    let mut out = Map::new();
    out.insert("message".to_string(), Value::String(err.to_string()));
    out.insert("name".to_string(), Value::String(name.to_string()));
    out.insert("stack".to_string(), Value::String(stack));
    Value::Object(out)
}
