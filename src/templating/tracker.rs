//! Recording proxies for dry-run dependency discovery.
//!
//! A dry run renders a consumer template against a [`RecordingProxy`] built
//! from the raw document instead of against real values. Every lookup records
//! the fully-qualified key path it touched into a shared [`AccessRecorder`].
//!
//! Lookups answer as follows:
//! - a stored mapping yields a nested proxy over that mapping;
//! - a missing key, or a value carrying the dynamic marker, yields an opaque
//!   proxy, so the directive is never rendered, read, or executed;
//! - any other stored value is returned literally.
//!
//! Proxies render as the empty string, are falsy, and iterate as an empty
//! sequence (a mapping proxy iterates its own keys). A probed template
//! therefore cannot be steered by placeholder values into branches that touch
//! unrelated keys.

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::document::{Document, is_dynamic, join_path};

/// Shared sink for key paths touched during a dry run.
///
/// Cloning is cheap and every clone records into the same set.
#[derive(Debug, Clone, Default)]
pub struct AccessRecorder {
    paths: Arc<Mutex<BTreeSet<String>>>,
}

impl AccessRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accessed key path.
    pub fn record(&self, path: &str) {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner).insert(path.to_string());
    }

    /// Snapshot of every path recorded so far.
    #[must_use]
    pub fn accessed_paths(&self) -> BTreeSet<String> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A template value that records every lookup made through it.
#[derive(Debug)]
pub struct RecordingProxy {
    path: String,
    /// Backing mapping; `None` for opaque proxies standing in for unknown
    /// or dynamic values.
    entries: Option<Arc<Document>>,
    recorder: AccessRecorder,
}

impl RecordingProxy {
    /// Build the root proxy for a whole document.
    #[must_use]
    pub fn root(document: &Document, recorder: AccessRecorder) -> Value {
        Value::from_object(Self {
            path: String::new(),
            entries: Some(Arc::new(document.clone())),
            recorder,
        })
    }

    fn nested(&self, path: String, entries: &Document) -> Value {
        Value::from_object(Self {
            path,
            entries: Some(Arc::new(entries.clone())),
            recorder: self.recorder.clone(),
        })
    }

    fn opaque(&self, path: String) -> Value {
        Value::from_object(Self {
            path,
            entries: None,
            recorder: self.recorder.clone(),
        })
    }

    /// Key path this proxy stands for (empty for the root).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Object for RecordingProxy {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str().map_or_else(|| key.to_string(), str::to_string);
        let path = join_path(&self.path, &name);
        self.recorder.record(&path);

        let stored = self.entries.as_ref().and_then(|entries| entries.get(&name));
        Some(match stored {
            Some(JsonValue::Object(children)) => self.nested(path, children),
            Some(JsonValue::String(raw)) if is_dynamic(raw) => self.opaque(path),
            Some(literal) => Value::from_serialize(literal),
            None => self.opaque(path),
        })
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        match &self.entries {
            Some(entries) => {
                Enumerator::Values(entries.keys().map(|key| Value::from(key.as_str())).collect())
            }
            None => Enumerator::Empty,
        }
    }

    fn is_true(self: &Arc<Self>) -> bool {
        false
    }

    fn render(self: &Arc<Self>, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}
