//! `project`: compute a new record shape from `input`.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::expr::{check_named, NamedExpression};
use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    pub projections: Vec<NamedExpression>,
}

impl OperatorKind for Project {
    const KIND: &'static str = "project";

    fn check(&self) -> Result<(), OpError> {
        check_named("projections", &self.projections)
    }
}

logical_operator!(Project, |op| vec![op.input]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::decode_operator;
    use qplan_core::Error;
    use serde_json::json;

    #[test]
    fn projections_use_ref_on_the_wire() {
        let payload = json!({
            "@id": 3,
            "input": 2,
            "projections": [{"ref": "out.total", "expr": "a + b"}]
        });
        let op = decode_operator::<Project>(payload.clone()).unwrap();
        assert_eq!(op.inputs(), vec![OperatorId::new(2)]);
        assert_eq!(op.to_value().unwrap(), payload);

        let project = op.as_any().downcast_ref::<Project>().unwrap();
        assert_eq!(project.projections[0].output_ref, "out.total");
    }

    #[test]
    fn empty_projection_list_is_invalid() {
        let err = decode_operator::<Project>(json!({"input": 1, "projections": []})).unwrap_err();
        assert!(matches!(err, Error::InvalidVariant { ref tag, .. } if tag == "project"));
    }
}
