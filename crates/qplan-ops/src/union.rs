//! `union`: concatenate two or more inputs.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Union {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub inputs: Vec<OperatorId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub distinct: bool,
}

impl OperatorKind for Union {
    const KIND: &'static str = "union";

    fn check(&self) -> Result<(), OpError> {
        if self.inputs.len() < 2 {
            return Err(OpError::Invalid(format!(
                "needs at least two inputs, got {}",
                self.inputs.len()
            )));
        }
        Ok(())
    }
}

logical_operator!(Union, |op| op.inputs.clone());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::decode_operator;
    use serde_json::json;

    #[test]
    fn union_arity() {
        assert!(decode_operator::<Union>(json!({"inputs": [1]})).is_err());

        let op = decode_operator::<Union>(json!({"inputs": [1, 2, 3]})).unwrap();
        assert_eq!(op.inputs().len(), 3);
        // `distinct: false` is the default and stays implicit
        assert_eq!(op.to_value().unwrap(), json!({"inputs": [1, 2, 3]}));
    }
}
