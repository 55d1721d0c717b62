//! `join`: combine two inputs on key conditions.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::expr::check_expr;
use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinCondition {
    #[serde(default = "JoinCondition::default_relationship")]
    pub relationship: String,
    pub left: String,
    pub right: String,
}

impl JoinCondition {
    fn default_relationship() -> String {
        "==".to_string()
    }

    pub fn equals(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            relationship: Self::default_relationship(),
            left: left.into(),
            right: right.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Join {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub left: OperatorId,
    pub right: OperatorId,
    #[serde(rename = "type", default)]
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
}

const RELATIONSHIPS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];

impl OperatorKind for Join {
    const KIND: &'static str = "join";

    fn check(&self) -> Result<(), OpError> {
        if self.conditions.is_empty() {
            return Err(OpError::Empty("conditions"));
        }
        for c in &self.conditions {
            if !RELATIONSHIPS.contains(&c.relationship.as_str()) {
                return Err(OpError::Invalid(format!(
                    "unsupported join relationship '{}'",
                    c.relationship
                )));
            }
            check_expr(&c.left)?;
            check_expr(&c.right)?;
        }
        Ok(())
    }
}

logical_operator!(Join, |op| vec![op.left, op.right]);
