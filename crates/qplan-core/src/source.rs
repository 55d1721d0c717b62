//! Named external data sources and the name-keyed registry a plan owns.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};

/// Capability set every data source kind must provide.
///
/// Concrete kinds (files, tables, ...) are defined outside the core and
/// resolved through the `VariantRegistry` by their `"type"` discriminator.
pub trait DataSource: fmt::Debug + Send + Sync + 'static {
    /// Discriminator this kind is registered under.
    fn kind(&self) -> &str;

    /// Unique name operators use to refer to this source.
    fn name(&self) -> &str;

    /// Variant payload, without the discriminator. Must be a JSON object.
    fn to_value(&self) -> Result<Value>;

    fn as_any(&self) -> &dyn Any;
}

/// Data sources keyed by name.
///
/// Iteration is ordered by name. That order is stable, but it is not part of
/// the contract: source identity is the name, never the position.
#[derive(Debug, Default)]
pub struct DataSourceRegistry {
    by_name: BTreeMap<String, Box<dyn DataSource>>,
}

impl DataSourceRegistry {
    /// Build the registry, failing on the first repeated name.
    pub fn build(sources: Vec<Box<dyn DataSource>>) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for source in sources {
            let name = source.name().to_string();
            if by_name.contains_key(&name) {
                return Err(Error::DuplicateSourceName(name));
            }
            by_name.insert(name, source);
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Option<&dyn DataSource> {
        self.by_name.get(name).map(|s| s.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn values(&self) -> impl Iterator<Item = &dyn DataSource> + '_ {
        self.by_name.values().map(|s| s.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
