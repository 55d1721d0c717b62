//! Expression fragments shared by several operator kinds.
//!
//! Expressions are carried as source text. Nothing here parses them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::traits::OpError;

/// `expr` evaluated and bound to the output field `ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedExpression {
    #[serde(rename = "ref")]
    pub output_ref: String,
    pub expr: String,
}

impl NamedExpression {
    pub fn new(output_ref: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            output_ref: output_ref.into(),
            expr: expr.into(),
        }
    }
}

/// Fails on an empty list, a blank expression, or an output ref bound twice.
pub(crate) fn check_named(field: &'static str, exprs: &[NamedExpression]) -> Result<(), OpError> {
    if exprs.is_empty() {
        return Err(OpError::Empty(field));
    }
    let mut seen = BTreeSet::new();
    for e in exprs {
        check_expr(&e.expr)?;
        if !seen.insert(e.output_ref.as_str()) {
            return Err(OpError::Invalid(format!(
                "output ref '{}' is bound more than once in '{field}'",
                e.output_ref
            )));
        }
    }
    Ok(())
}

pub(crate) fn check_expr(expr: &str) -> Result<(), OpError> {
    if expr.trim().is_empty() {
        return Err(OpError::Empty("expr"));
    }
    Ok(())
}
