//! Operator capability contract.
//!
//! The core treats an operator as an opaque payload that may carry a
//! reference handle (`"@id"`) and declares the operators it consumes.

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::id::OperatorId;

/// Capability set every operator kind must provide.
///
/// Invariants:
/// - `inputs()` must be a pure function of the payload; the graph is built
///   from it once and never re-queried.
/// - `to_value()` must round-trip through the kind's registered factory.
pub trait LogicalOperator: fmt::Debug + Send + Sync + 'static {
    /// Discriminator this kind is registered under (the `"op"` value).
    fn kind(&self) -> &str;

    /// Handle other operators use to reference this one, if declared.
    fn id(&self) -> Option<OperatorId>;

    /// Operators whose output this one consumes, in declared order.
    fn inputs(&self) -> Vec<OperatorId>;

    /// Variant payload, without the discriminator. Must be a JSON object.
    fn to_value(&self) -> Result<Value>;

    fn as_any(&self) -> &dyn Any;
}
