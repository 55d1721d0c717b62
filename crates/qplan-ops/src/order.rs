//! `order`: sort the records of `input`.

use qplan_core::OperatorId;
use serde::{Deserialize, Serialize};

use crate::expr::check_expr;
use crate::traits::{logical_operator, OpError, OperatorKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrdering {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ordering {
    pub expr: String,
    #[serde(default)]
    pub order: Direction,
    /// Unset means the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullOrdering>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Order {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub input: OperatorId,
    pub orderings: Vec<Ordering>,
}

impl OperatorKind for Order {
    const KIND: &'static str = "order";

    fn check(&self) -> Result<(), OpError> {
        if self.orderings.is_empty() {
            return Err(OpError::Empty("orderings"));
        }
        self.orderings.iter().try_for_each(|o| check_expr(&o.expr))
    }
}

logical_operator!(Order, |op| vec![op.input]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::decode_operator;
    use serde_json::json;

    #[test]
    fn direction_defaults_to_ascending() {
        let op = decode_operator::<Order>(json!({
            "input": 4,
            "orderings": [{"expr": "ts"}, {"expr": "id", "order": "desc", "nulls": "last"}]
        }))
        .unwrap();
        let order = op.as_any().downcast_ref::<Order>().unwrap();
        assert_eq!(order.orderings[0].order, Direction::Asc);
        assert_eq!(order.orderings[0].nulls, None);
        assert_eq!(order.orderings[1].nulls, Some(NullOrdering::Last));
        assert_eq!(
            op.to_value().unwrap()["orderings"][0],
            json!({"expr": "ts", "order": "asc"})
        );
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert!(decode_operator::<Order>(json!({
            "input": 4,
            "orderings": [{"expr": "ts", "order": "sideways"}]
        }))
        .is_err());
    }
}
