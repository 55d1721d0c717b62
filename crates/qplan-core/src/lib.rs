#![forbid(unsafe_code)]
//! qplan-core: the logical plan container.
//!
//! Responsibilities:
//! - Hold a plan's opaque properties, its named data sources, and its operator graph.
//! - Enforce structural invariants (unique source names, resolvable operator
//!   references, acyclic graph at read time).
//! - Present operators in a deterministic topological order.
//! - Read plan documents (lenient JSON or YAML) and emit canonical indented JSON.
//!
//! Concrete source/operator kinds live outside this crate; they are resolved
//! through a `VariantRegistry` value handed to the parse call.
//!
//! **No optimization, no execution, no schema inference** here.

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod hash;
pub mod id;
pub mod operator;
pub mod plan;
pub mod prelude;
pub mod properties;
pub mod registry;
pub mod source;
pub mod topo;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::PlanConfig;
pub use document::{InputFormat, PlanDocument};
pub use error::{Error, Result, VariantFamily};
pub use graph::{OpNode, OperatorGraph};
pub use id::{NodeId, OperatorId};
pub use operator::LogicalOperator;
pub use plan::LogicalPlan;
pub use properties::PlanProperties;
pub use registry::VariantRegistry;
pub use source::{DataSource, DataSourceRegistry};

/// Crate version, reported by the CLI and embedded in generated plan heads.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
