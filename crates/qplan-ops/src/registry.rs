//! Registration of the built-in kinds into a `VariantRegistry`.

use qplan_core::prelude::{Result, VariantRegistry};

use crate::aggregate::Aggregate;
use crate::filter::Filter;
use crate::join::Join;
use crate::limit::Limit;
use crate::order::Order;
use crate::project::Project;
use crate::scan::Scan;
use crate::sources::{FileSource, TableSource};
use crate::store::Store;
use crate::traits::{decode_operator, decode_source, OperatorKind, SourceKind};
use crate::union::Union;

/// Add every built-in kind to `registry`. Fails if a tag is already taken,
/// so callers can layer their own kinds before or after without silent
/// shadowing.
pub fn register_builtins(registry: &mut VariantRegistry) -> Result<()> {
    registry.register_source_with(FileSource::KIND, decode_source::<FileSource>)?;
    registry.register_source_with(TableSource::KIND, decode_source::<TableSource>)?;

    registry.register_operator_with(Scan::KIND, decode_operator::<Scan>)?;
    registry.register_operator_with(Filter::KIND, decode_operator::<Filter>)?;
    registry.register_operator_with(Project::KIND, decode_operator::<Project>)?;
    registry.register_operator_with(Order::KIND, decode_operator::<Order>)?;
    registry.register_operator_with(Limit::KIND, decode_operator::<Limit>)?;
    registry.register_operator_with(Join::KIND, decode_operator::<Join>)?;
    registry.register_operator_with(Union::KIND, decode_operator::<Union>)?;
    registry.register_operator_with(Aggregate::KIND, decode_operator::<Aggregate>)?;
    registry.register_operator_with(Store::KIND, decode_operator::<Store>)?;
    Ok(())
}

/// A fresh registry holding only the built-in kinds.
pub fn builtin_registry() -> Result<VariantRegistry> {
    let mut registry = VariantRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}
