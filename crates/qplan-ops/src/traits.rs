//! Kind traits + the serde-backed factories the registry calls.
//!
//! Every built-in kind is a plain serde struct. Decoding is two steps: the
//! core's `decode_payload` for the serde shape, then `check()` for the
//! constraints serde can't express (non-empty lists, bounds, ...). Either
//! failure becomes `Error::InvalidVariant` tagged with the kind's discriminator.

use qplan_core::prelude::{DataSource, Error, LogicalOperator, VariantFamily};
use qplan_core::registry::decode_payload;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Built-in operator kind.
pub trait OperatorKind: LogicalOperator + DeserializeOwned {
    /// The `"op"` discriminator.
    const KIND: &'static str;

    /// Constraints beyond the serde shape.
    fn check(&self) -> Result<(), OpError> {
        Ok(())
    }
}

/// Built-in data source kind.
pub trait SourceKind: DataSource + DeserializeOwned {
    /// The `"type"` discriminator.
    const KIND: &'static str;

    fn check(&self) -> Result<(), OpError> {
        if self.name().trim().is_empty() {
            return Err(OpError::Empty("name"));
        }
        Ok(())
    }
}

fn invalid(family: VariantFamily, tag: &str, err: OpError) -> Error {
    Error::InvalidVariant {
        family,
        tag: tag.to_string(),
        message: err.to_string(),
    }
}

pub(crate) fn decode_operator<T: OperatorKind>(
    payload: Value,
) -> qplan_core::Result<Box<dyn LogicalOperator>> {
    let op: T = decode_payload(VariantFamily::Operator, T::KIND, payload)?;
    op.check()
        .map_err(|e| invalid(VariantFamily::Operator, T::KIND, e))?;
    Ok(Box::new(op))
}

pub(crate) fn decode_source<T: SourceKind>(payload: Value) -> qplan_core::Result<Box<dyn DataSource>> {
    let source: T = decode_payload(VariantFamily::Source, T::KIND, payload)?;
    source
        .check()
        .map_err(|e| invalid(VariantFamily::Source, T::KIND, e))?;
    Ok(Box::new(source))
}

/// `LogicalOperator` for a serde struct with an `id: Option<OperatorId>` field.
/// The closure-like tail computes the declared inputs.
macro_rules! logical_operator {
    ($ty:ty, |$this:ident| $inputs:expr) => {
        impl qplan_core::LogicalOperator for $ty {
            fn kind(&self) -> &str {
                <Self as $crate::traits::OperatorKind>::KIND
            }

            fn id(&self) -> Option<qplan_core::OperatorId> {
                self.id
            }

            fn inputs(&self) -> Vec<qplan_core::OperatorId> {
                let $this = self;
                $inputs
            }

            fn to_value(&self) -> qplan_core::Result<serde_json::Value> {
                qplan_core::document::to_payload(self)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
}

pub(crate) use logical_operator;
