//! The nested configuration document and dotted key-path helpers.
//!
//! A [`Document`] is a mapping of string keys to scalars, strings, or further
//! mappings. Every non-mapping value is a *leaf* addressed by a dotted key path
//! such as `KOS.version`; the top-level key of a nested leaf is its namespace.
//!
//! The map type is backed by a `BTreeMap`, so iteration over a document (and
//! everything derived from it) is in sorted key order.

use serde_json::Value;

use crate::constants::DYNAMIC_MARKER;

/// A nested configuration document.
pub type Document = serde_json::Map<String, Value>;

/// One leaf of a flattened document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    /// Dotted address of the leaf.
    pub key_path: String,
    /// The stored value.
    pub value: &'a Value,
    /// Top-level ancestor key, empty for root-level leaves.
    pub namespace: String,
}

/// Returns true if the string carries the leading dynamic marker.
#[must_use]
pub fn is_dynamic(value: &str) -> bool {
    value.starts_with(DYNAMIC_MARKER)
}

/// Removes a single leading dynamic marker, if present.
#[must_use]
pub fn strip_marker(value: &str) -> &str {
    value.strip_prefix(DYNAMIC_MARKER).unwrap_or(value)
}

/// Joins a parent path and a key into a dotted key path.
#[must_use]
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Flattens a document into one entry per leaf, in sorted key order.
#[must_use]
pub fn flatten(document: &Document) -> Vec<FlatEntry<'_>> {
    let mut entries = Vec::new();
    flatten_into(document, "", "", &mut entries);
    entries
}

fn flatten_into<'a>(
    map: &'a Document,
    parent: &str,
    namespace: &str,
    entries: &mut Vec<FlatEntry<'a>>,
) {
    for (key, value) in map {
        let key_path = join_path(parent, key);
        match value {
            Value::Object(children) => {
                // The namespace is fixed by the top-level key and inherited below it
                let child_namespace = if parent.is_empty() { key.as_str() } else { namespace };
                flatten_into(children, &key_path, child_namespace, entries);
            }
            _ => entries.push(FlatEntry {
                key_path,
                value,
                namespace: namespace.to_string(),
            }),
        }
    }
}

/// Looks up the value stored at a dotted key path.
#[must_use]
pub fn get_path<'a>(document: &'a Document, key_path: &str) -> Option<&'a Value> {
    let mut segments = key_path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes a value at a dotted key path, creating intermediate mappings.
///
/// Returns `false` without modifying anything when an intermediate segment
/// already holds a non-mapping value.
pub fn set_path(document: &mut Document, key_path: &str, value: Value) -> bool {
    let segments: Vec<&str> = key_path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = document;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Document::new()));
        match entry {
            Value::Object(map) => current = map,
            _ => return false,
        }
    }

    current.insert((*last).to_string(), value);
    true
}

/// Deep-merges `source` into `destination`; values from `source` win.
///
/// Mappings present on both sides are merged recursively, anything else is
/// replaced wholesale.
pub fn deep_merge(source: Document, destination: &mut Document) {
    for (key, value) in source {
        let Value::Object(incoming) = value else {
            destination.insert(key, value);
            continue;
        };
        if let Some(Value::Object(existing)) = destination.get_mut(&key) {
            deep_merge(incoming, existing);
            continue;
        }
        destination.insert(key, Value::Object(incoming));
    }
}
