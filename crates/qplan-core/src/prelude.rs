//! Convenient re-exports for downstream crates.

pub use crate::config::PlanConfig;
pub use crate::document::{encode_operator, encode_source, to_payload, InputFormat, PlanDocument};
pub use crate::error::{Error, Result, VariantFamily};
pub use crate::graph::{OpNode, OperatorGraph};
pub use crate::hash::Hash256;
pub use crate::id::{NodeId, OperatorId};
pub use crate::operator::LogicalOperator;
pub use crate::plan::LogicalPlan;
pub use crate::properties::PlanProperties;
pub use crate::registry::VariantRegistry;
pub use crate::source::{DataSource, DataSourceRegistry};
