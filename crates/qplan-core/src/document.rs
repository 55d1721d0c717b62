//! Plan document codec.
//!
//! Input is lenient (JSON5-style JSON by default, or YAML); output is always
//! strict, indented JSON with keys in canonical order:
//!
//! ```json
//! {
//!   "head": { "version": 1 },
//!   "sources": [ { "type": "file", "name": "logs", "path": "/data/logs" } ],
//!   "query": [
//!     { "op": "scan", "@id": 1, "source": "logs" },
//!     { "op": "store", "@id": 2, "input": 1, "sink": "out" }
//!   ]
//! }
//! ```
//!
//! Elements of `sources` / `query` stay as raw JSON here; turning them into
//! typed values is the `VariantRegistry`'s job.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::config::PlanConfig;
use crate::error::{Error, Result, VariantFamily};
use crate::operator::LogicalOperator;
use crate::properties::PlanProperties;
use crate::registry::join_discriminator;
use crate::source::DataSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDocument {
    pub head: PlanProperties,
    pub sources: Vec<Value>,
    pub query: Vec<Value>,
}

/// Text syntax of an incoming document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yaml` / `.yml` are YAML; everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "json5" => Ok(InputFormat::Json),
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            other => Err(Error::Config(format!("unknown input format '{other}'"))),
        }
    }
}

impl PlanDocument {
    /// Parse document text. Nothing is resolved against a registry yet.
    pub fn parse(text: &str, format: InputFormat, config: &PlanConfig) -> Result<Self> {
        let value: Value = match format {
            InputFormat::Json if config.lenient_input => parse_lenient(text)?,
            InputFormat::Json => serde_json::from_str(text)?,
            InputFormat::Yaml => serde_yaml::from_str::<FiniteValue>(text)?.0,
        };
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::MalformedDocument(
                "plan document must be an object with 'head', 'sources' and 'query'".into(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Strict, indented JSON.
    pub fn render(&self, config: &PlanConfig) -> Result<String> {
        config.validate()?;
        let indent = vec![b' '; config.indent_width];
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| Error::Serialize(e.to_string()))?;
        let mut out = String::from_utf8(buf).map_err(|e| Error::Serialize(e.to_string()))?;
        if config.trailing_newline {
            out.push('\n');
        }
        Ok(out)
    }
}

/// Strict JSON goes through serde_json even in lenient mode, so text both
/// readers accept (a `u64` id above `i64::MAX`, say) reads the same in both
/// modes. Only JSON5-only syntax reaches the JSON5 reader.
fn parse_lenient(text: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }
    #[cfg(feature = "tracing")]
    tracing::trace!("input is not strict JSON; reading it as JSON5");
    let FiniteValue(value) = json5::from_str(text)?;
    Ok(value)
}

/// A `Value` read from JSON5 or YAML. Both can spell NaN and infinities,
/// which a JSON document can't hold; those are errors here rather than
/// `null`.
struct FiniteValue(Value);

impl<'de> Deserialize<'de> for FiniteValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FiniteVisitor).map(FiniteValue)
    }
}

struct FiniteVisitor;

impl<'de> Visitor<'de> for FiniteVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON-representable value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| E::custom(format!("{v} is not a valid JSON number")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        FiniteValue::deserialize(deserializer).map(|FiniteValue(v)| v)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(FiniteValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = Map::new();
        while let Some((key, FiniteValue(value))) = map.next_entry::<String, FiniteValue>()? {
            out.insert(key, value);
        }
        Ok(Value::Object(out))
    }
}

/// Serialize a variant's payload for `DataSource::to_value` /
/// `LogicalOperator::to_value` implementations.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Serialize(e.to_string()))
}

/// `query` element for `op`: `"op"` first, then the payload's own keys.
pub fn encode_operator(op: &dyn LogicalOperator) -> Result<Value> {
    join_discriminator(VariantFamily::Operator, op.kind(), op.to_value()?)
}

/// `sources` element for `source`: `"type"` first, then the payload's own keys.
pub fn encode_source(source: &dyn DataSource) -> Result<Value> {
    join_discriminator(VariantFamily::Source, source.kind(), source.to_value()?)
}
