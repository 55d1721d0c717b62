//! `filter`: keep the records of `input` for which `expr` holds.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::expr::check_expr;
use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    pub expr: String,
}

impl OperatorKind for Filter {
    const KIND: &'static str = "filter";

    fn check(&self) -> Result<(), OpError> {
        check_expr(&self.expr)
    }
}

logical_operator!(Filter, |op| vec![op.input]);
