//! `scan`: read from a named data source. Has no inputs.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scan {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Name of a data source in the same plan.
    pub source: String,
    /// Field the scanned records are bound to.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub output_ref: Option<String>,
    /// Source-specific selection (paths, partitions, pushdowns). Opaque.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub selection: Value,
}

impl Scan {
    pub fn new(id: u64, source: impl Into<String>) -> Self {
        Self {
            id: Some(OperatorId::new(id)),
            memo: None,
            source: source.into(),
            output_ref: None,
            selection: Value::Null,
        }
    }
}

impl OperatorKind for Scan {
    const KIND: &'static str = "scan";

    fn check(&self) -> Result<(), OpError> {
        if self.source.trim().is_empty() {
            return Err(OpError::Empty("source"));
        }
        Ok(())
    }
}

logical_operator!(Scan, |_op| Vec::new());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::decode_operator;
    use serde_json::json;

    #[test]
    fn scan_keeps_selection_verbatim() {
        let payload = json!({
            "@id": 1,
            "source": "logs",
            "ref": "rec",
            "selection": {"files": ["a.json", "b.json"]}
        });
        let op = decode_operator::<Scan>(payload.clone()).unwrap();
        assert_eq!(op.kind(), "scan");
        assert!(op.inputs().is_empty());
        assert_eq!(op.to_value().unwrap(), payload);
    }

    #[test]
    fn scan_needs_a_source_name() {
        assert!(decode_operator::<Scan>(json!({"source": ""})).is_err());
    }
}
