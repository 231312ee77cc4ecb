// src/query.rs
//! Queries are opaque to the engine: whatever JSON the adapter understands.
//! The engine only needs a stable key per distinct query.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub type Query = Value;

/// Cache key for a (possibly absent) query.
///
/// Object keys are sorted at every depth before serializing, so two queries
/// that differ only in key order share a key. Array order is significant.
pub fn query_hash(query: Option<&Query>) -> String {
    let canonical = match query {
        Some(q) => canonicalize(q),
        None => Value::Null,
    };
    let text = canonical.to_string();
    hex::encode(Sha256::digest(text.as_bytes()))
}

fn canonicalize(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), canonicalize(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
