#![forbid(unsafe_code)]
//! qplan: logical query plans as validated operator graphs.
//!
//! Re-exports the plan container (`qplan-core`) and the built-in kinds
//! (`qplan-ops`) so most callers need a single dependency:
//!
//! ```no_run
//! use qplan::prelude::*;
//!
//! let registry = builtin_registry()?;
//! let plan = LogicalPlan::parse(
//!     r#"{ head: {}, sources: [], query: [] }"#,
//!     &registry,
//! )?;
//! println!("{}", plan.to_json_pretty()?);
//! # Ok::<(), qplan::Error>(())
//! ```

pub use qplan_core as core;
pub use qplan_ops as ops;

pub use qplan_core::{
    DataSource, DataSourceRegistry, Error, InputFormat, LogicalOperator, LogicalPlan, NodeId,
    OperatorGraph, OperatorId, PlanConfig, PlanDocument, PlanProperties, Result, VariantRegistry,
    VERSION,
};
pub use qplan_ops::{builtin_registry, register_builtins};

pub mod prelude {
    pub use qplan_core::prelude::*;
    pub use qplan_ops::{builtin_registry, register_builtins, OperatorKind, SourceKind};
}
