use std::fmt;

use thiserror::Error;

use crate::id::{NodeId, OperatorId};

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Which open variant set a discriminator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantFamily {
    Source,
    Operator,
}

impl VariantFamily {
    /// Document key holding the discriminator for this family.
    pub const fn discriminator(self) -> &'static str {
        match self {
            VariantFamily::Source => "type",
            VariantFamily::Operator => "op",
        }
    }
}

impl fmt::Display for VariantFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantFamily::Source => f.write_str("data source"),
            VariantFamily::Operator => f.write_str("operator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Malformed plan document: {0}")]
    MalformedDocument(String),

    #[error("Unknown {family} variant '{tag}'")]
    UnknownVariant { family: VariantFamily, tag: String },

    #[error("{family} element is missing its '{key}' discriminator")]
    MissingDiscriminator {
        family: VariantFamily,
        key: &'static str,
    },

    #[error("Invalid '{tag}' {family}: {message}")]
    InvalidVariant {
        family: VariantFamily,
        tag: String,
        message: String,
    },

    #[error("Variant '{tag}' is already registered as a {family}")]
    DuplicateVariant { family: VariantFamily, tag: String },

    #[error("Each data source must have a unique name; more than one data source is named '{0}'")]
    DuplicateSourceName(String),

    #[error("Operator id {0} is declared by more than one operator")]
    DuplicateOperatorId(OperatorId),

    #[error("Operator at {node} references {target}, which no operator declares")]
    DanglingReference { node: NodeId, target: OperatorId },

    #[error("Operator graph contains a cycle through {}", display_nodes(.nodes))]
    CycleDetected { nodes: Vec<NodeId> },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

fn display_nodes(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}

impl From<json5::Error> for Error {
    fn from(e: json5::Error) -> Self {
        Error::MalformedDocument(e.to_string())
    }
}
