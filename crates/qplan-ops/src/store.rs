//! `store`: write `input` into a named data source. Usually the plan's sink.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Store {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    /// Name of a data source in the same plan.
    pub sink: String,
    /// Sink-specific target (file name, partitioning). Opaque.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub target: Value,
}

impl OperatorKind for Store {
    const KIND: &'static str = "store";

    fn check(&self) -> Result<(), OpError> {
        if self.sink.trim().is_empty() {
            return Err(OpError::Empty("sink"));
        }
        Ok(())
    }
}

logical_operator!(Store, |op| vec![op.input]);
