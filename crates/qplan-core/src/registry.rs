//! Discriminator → factory registry for the open source/operator variant sets.
//!
//! Callers build one registry up front (registration rejects duplicate tags)
//! and pass it to every parse call. There is no process-wide registration.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result, VariantFamily};
use crate::operator::LogicalOperator;
use crate::source::DataSource;

/// Builds an operator from its payload (discriminator already removed).
pub type OperatorFactory = fn(Value) -> Result<Box<dyn LogicalOperator>>;

/// Builds a data source from its payload (discriminator already removed).
pub type SourceFactory = fn(Value) -> Result<Box<dyn DataSource>>;

#[derive(Default, Clone)]
pub struct VariantRegistry {
    operators: BTreeMap<String, OperatorFactory>,
    sources: BTreeMap<String, SourceFactory>,
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator kind decoded with serde.
    pub fn register_operator<T>(&mut self, tag: &str) -> Result<()>
    where
        T: LogicalOperator + DeserializeOwned,
    {
        self.register_operator_with(tag, decode_operator::<T>)
    }

    pub fn register_operator_with(&mut self, tag: &str, factory: OperatorFactory) -> Result<()> {
        if self.operators.contains_key(tag) {
            return Err(Error::DuplicateVariant {
                family: VariantFamily::Operator,
                tag: tag.to_string(),
            });
        }
        self.operators.insert(tag.to_string(), factory);
        Ok(())
    }

    /// Register a data source kind decoded with serde.
    pub fn register_source<T>(&mut self, tag: &str) -> Result<()>
    where
        T: DataSource + DeserializeOwned,
    {
        self.register_source_with(tag, decode_source::<T>)
    }

    pub fn register_source_with(&mut self, tag: &str, factory: SourceFactory) -> Result<()> {
        if self.sources.contains_key(tag) {
            return Err(Error::DuplicateVariant {
                family: VariantFamily::Source,
                tag: tag.to_string(),
            });
        }
        self.sources.insert(tag.to_string(), factory);
        Ok(())
    }

    /// Resolve one `query` element into an operator.
    pub fn operator(&self, element: Value) -> Result<Box<dyn LogicalOperator>> {
        let (tag, payload) = split_discriminator(VariantFamily::Operator, element)?;
        match self.operators.get(&tag) {
            Some(factory) => factory(payload).map_err(|e| with_tag(e, &tag)),
            None => Err(Error::UnknownVariant {
                family: VariantFamily::Operator,
                tag,
            }),
        }
    }

    /// Resolve one `sources` element into a data source.
    pub fn source(&self, element: Value) -> Result<Box<dyn DataSource>> {
        let (tag, payload) = split_discriminator(VariantFamily::Source, element)?;
        match self.sources.get(&tag) {
            Some(factory) => factory(payload).map_err(|e| with_tag(e, &tag)),
            None => Err(Error::UnknownVariant {
                family: VariantFamily::Source,
                tag,
            }),
        }
    }

    pub fn operator_kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.operators.keys().map(String::as_str)
    }

    pub fn source_kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.keys().map(String::as_str)
    }

    pub fn has_operator(&self, tag: &str) -> bool {
        self.operators.contains_key(tag)
    }

    pub fn has_source(&self, tag: &str) -> bool {
        self.sources.contains_key(tag)
    }
}

/// Split `{"<key>": tag, ...rest}` into the tag and the remaining object.
fn split_discriminator(family: VariantFamily, element: Value) -> Result<(String, Value)> {
    let key = family.discriminator();
    let mut fields: Map<String, Value> = match element {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::MalformedDocument(format!(
                "{family} element must be an object, got {}",
                json_type(&other)
            )))
        }
    };
    match fields.remove(key) {
        Some(Value::String(tag)) => Ok((tag, Value::Object(fields))),
        Some(other) => Err(Error::MalformedDocument(format!(
            "{family} discriminator '{key}' must be a string, got {}",
            json_type(&other)
        ))),
        None => Err(Error::MissingDiscriminator { family, key }),
    }
}

/// Inverse of `split_discriminator`: discriminator first, payload fields after.
pub(crate) fn join_discriminator(
    family: VariantFamily,
    tag: &str,
    payload: Value,
) -> Result<Value> {
    let key = family.discriminator();
    let fields = match payload {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::Serialize(format!(
                "'{tag}' {family} payload must be an object, got {}",
                json_type(&other)
            )))
        }
    };
    let mut out = Map::with_capacity(fields.len() + 1);
    out.insert(key.to_string(), Value::String(tag.to_string()));
    for (k, v) in fields {
        if k == key {
            return Err(Error::Serialize(format!(
                "'{tag}' {family} payload must not contain the '{key}' key"
            )));
        }
        out.insert(k, v);
    }
    Ok(Value::Object(out))
}

/// Factories don't see the tag they were registered under; fill it in.
fn with_tag(err: Error, tag: &str) -> Error {
    match err {
        Error::InvalidVariant {
            family,
            tag: t,
            message,
        } if t.is_empty() => Error::InvalidVariant {
            family,
            tag: tag.to_string(),
            message,
        },
        other => other,
    }
}

/// Deserialize a variant payload into `T`. Shape errors become
/// `InvalidVariant`; an empty `tag` is filled in by the registry when the
/// factory runs under a registered tag.
pub fn decode_payload<T: DeserializeOwned>(
    family: VariantFamily,
    tag: &str,
    payload: Value,
) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::InvalidVariant {
        family,
        tag: tag.to_string(),
        message: e.to_string(),
    })
}

fn decode_operator<T>(payload: Value) -> Result<Box<dyn LogicalOperator>>
where
    T: LogicalOperator + DeserializeOwned,
{
    let op: T = decode_payload(VariantFamily::Operator, "", payload)?;
    Ok(Box::new(op))
}

fn decode_source<T>(payload: Value) -> Result<Box<dyn DataSource>>
where
    T: DataSource + DeserializeOwned,
{
    let source: T = decode_payload(VariantFamily::Source, "", payload)?;
    Ok(Box::new(source))
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
