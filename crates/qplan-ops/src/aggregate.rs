//! `aggregate`: group `input` by `keys` and compute `aggregations` per group.
//! No keys means one group over the whole input.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::expr::{check_expr, check_named, NamedExpression};
use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Aggregate {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    pub aggregations: Vec<NamedExpression>,
}

impl OperatorKind for Aggregate {
    const KIND: &'static str = "aggregate";

    fn check(&self) -> Result<(), OpError> {
        self.keys.iter().try_for_each(|k| check_expr(k))?;
        check_named("aggregations", &self.aggregations)
    }
}

logical_operator!(Aggregate, |op| vec![op.input]);
