//! Minimal source/operator kinds for unit tests inside this crate.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::to_payload;
use crate::error::Result;
use crate::id::OperatorId;
use crate::operator::LogicalOperator;
use crate::registry::VariantRegistry;
use crate::source::DataSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSource {
    pub name: String,
}

impl TestSource {
    pub fn boxed(name: &str) -> Box<dyn DataSource> {
        Box::new(Self { name: name.into() })
    }
}

impl DataSource for TestSource {
    fn kind(&self) -> &str {
        "test"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_value(&self) -> Result<Value> {
        to_payload(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestOp {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OperatorId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<OperatorId>,
}

impl TestOp {
    pub fn boxed(id: u64, inputs: &[u64]) -> Box<dyn LogicalOperator> {
        Box::new(Self {
            id: Some(OperatorId::new(id)),
            inputs: inputs.iter().copied().map(OperatorId::new).collect(),
        })
    }

    pub fn anonymous(inputs: &[u64]) -> Box<dyn LogicalOperator> {
        Box::new(Self {
            id: None,
            inputs: inputs.iter().copied().map(OperatorId::new).collect(),
        })
    }
}

impl LogicalOperator for TestOp {
    fn kind(&self) -> &str {
        "node"
    }

    fn id(&self) -> Option<OperatorId> {
        self.id
    }

    fn inputs(&self) -> Vec<OperatorId> {
        self.inputs.clone()
    }

    fn to_value(&self) -> Result<Value> {
        to_payload(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn registry() -> VariantRegistry {
    let mut reg = VariantRegistry::new();
    reg.register_source::<TestSource>("test")
        .expect("fresh registry");
    reg.register_operator::<TestOp>("node")
        .expect("fresh registry");
    reg
}

/// `@id`s of the operators in `order`, for compact assertions.
pub fn ids(ops: &[&dyn LogicalOperator]) -> Vec<u64> {
    ops.iter()
        .filter_map(|op| op.id())
        .map(OperatorId::get)
        .collect()
}
