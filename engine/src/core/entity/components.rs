//! Bookkeeping components every stored entity carries

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parent component establishing a parent-child relationship
///
/// `hecs::Entity` is not serializable; scenes store parents by scene-local id
/// and remap them on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Display name of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Component kinds with no registered type, kept verbatim as JSON
///
/// Scene files routinely carry kinds this crate has no typed record for
/// (scripts, rigid bodies, ...). They ride along here so loading and
/// re-capturing a scene does not drop authored data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraComponents(pub BTreeMap<String, Value>);

impl ExtraComponents {
    pub fn get(&self, kind: &str) -> Option<&Value> {
        self.0.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.0.contains_key(kind)
    }

    pub fn insert(&mut self, kind: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(kind.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(kind, value)| (kind.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
