#![forbid(unsafe_code)]
//! qplan-ops: the built-in data source and operator kinds.
//!
//! Each kind is a serde struct registered under its discriminator:
//! - sources (`"type"`): `file`, `table`
//! - operators (`"op"`): `scan`, `filter`, `project`, `order`, `limit`,
//!   `join`, `union`, `aggregate`, `store`
//!
//! Kinds only carry and check their payload. Expressions stay as text and
//! no kind knows how to run.

pub mod expr;
pub mod registry;
pub mod sources;
pub mod traits;

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod limit;
pub mod order;
pub mod project;
pub mod scan;
pub mod store;
pub mod union;

pub use registry::{builtin_registry, register_builtins};
pub use traits::{OpError, OperatorKind, SourceKind};
