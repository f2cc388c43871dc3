//! Walks a parsed JSON document into loader calls
//!
//! Key markers:
//! - `#key`: link from `key` to the path (or paths, for an array) in the value
//! - `key!Type`: instantiate `Type` at `key` before loading the value

use blueprint_core::{Kind, LoadError, Loader, PathAddress, Value};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as Json};

const LINK_MARKER: char = '#';
const TYPE_MARKER: char = '!';

/// Feed the top-level JSON object into `loader`
pub(crate) fn load_document(loader: &mut Loader, document: Json) {
    match document {
        Json::Object(entries) => load_object(loader, &PathAddress::root(), entries),
        other => loader.error_at(
            LoadError::MalformedInput(format!(
                "expected a JSON object at the top level, got {}",
                json_kind(&other)
            )),
            &PathAddress::root(),
        ),
    }
}

fn load(loader: &mut Loader, current: &PathAddress, value: Json) {
    match value {
        Json::Object(entries) => {
            materialize(loader, current, || Value::Map(IndexMap::new()));
            load_object(loader, current, entries);
        }
        Json::Array(items) => {
            materialize(loader, current, || Value::List(Vec::new()));
            for (i, item) in items.into_iter().enumerate() {
                load(loader, &current.index(i), item);
            }
        }
        scalar => match scalar_value(scalar) {
            Ok(value) => loader.add(current, value),
            Err(err) => loader.error_at(err, current),
        },
    }
}

/// Place an empty container at an unset dynamic location
fn materialize(loader: &mut Loader, current: &PathAddress, empty: impl FnOnce() -> Value) {
    let unset = current.get(loader.root()).map_or(true, |value| value.is_null());
    if unset && matches!(current.declared_kind(loader.root()), Ok(Kind::Any)) {
        loader.add(current, empty());
    }
}

fn load_object(loader: &mut Loader, current: &PathAddress, entries: Map<String, Json>) {
    for (key, value) in entries {
        if let Some(source) = key.strip_prefix(LINK_MARKER) {
            if source.is_empty() {
                loader.error_at(
                    LoadError::MalformedInput("link without a name".to_string()),
                    current,
                );
            } else {
                load_links(loader, &current.child(source), value);
            }
            continue;
        }

        let child = match key.find(TYPE_MARKER) {
            Some(i) if i > 0 => {
                let path = current.child(&key[..i]);
                loader.instantiate(&path, &key[i + 1..]);
                path
            }
            _ => current.child(key),
        };

        load(loader, &child, value);
    }
}

fn load_links(loader: &mut Loader, current: &PathAddress, value: Json) {
    match value {
        Json::String(target) => match target.parse::<PathAddress>() {
            Ok(target) => loader.link(current, &target),
            Err(err) => loader.error_at(
                LoadError::MalformedInput(format!("bad link target '{target}': {err}")),
                current,
            ),
        },
        Json::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                load_links(loader, &current.index(i), item);
            }
        }
        other => loader.error_at(
            LoadError::MalformedInput(format!(
                "unknown object type '{}' for links",
                json_kind(&other)
            )),
            current,
        ),
    }
}

fn scalar_value(value: Json) -> Result<Value, LoadError> {
    match value {
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => number_value(&n),
        Json::String(s) => Ok(Value::Str(s)),
        Json::Null | Json::Array(_) | Json::Object(_) => Ok(Value::Null),
    }
}

/// Integers past `i64` are rejected rather than rounded to a float
fn number_value(n: &Number) -> Result<Value, LoadError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    if n.is_u64() {
        return Err(LoadError::MalformedInput(format!("integer {n} out of range")));
    }
    Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
