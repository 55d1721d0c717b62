//! `limit`: the records of `input` in positions `first..last`.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limit {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    #[serde(default)]
    pub first: u64,
    /// Exclusive; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u64>,
}

impl Limit {
    /// Number of records let through, if bounded.
    pub fn count(&self) -> Option<u64> {
        self.last.map(|last| last.saturating_sub(self.first))
    }
}

impl OperatorKind for Limit {
    const KIND: &'static str = "limit";

    fn check(&self) -> Result<(), OpError> {
        match self.last {
            Some(last) if last < self.first => Err(OpError::Invalid(format!(
                "'last' ({last}) is before 'first' ({})",
                self.first
            ))),
            _ => Ok(()),
        }
    }
}

logical_operator!(Limit, |op| vec![op.input]);
