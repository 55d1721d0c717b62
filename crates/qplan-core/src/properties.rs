//! Plan head: opaque metadata (version, generator info, ...) carried verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque `head` object of a plan document.
///
/// The core never interprets these keys; they are stored in input order and
/// written back unchanged. The accessors below are conveniences for the
/// conventional `version` / `generator` keys only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanProperties(Map<String, Value>);

impl PlanProperties {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn version(&self) -> Option<&Value> {
        self.get("version")
    }

    pub fn generator(&self) -> Option<&Value> {
        self.get("generator")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for PlanProperties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
