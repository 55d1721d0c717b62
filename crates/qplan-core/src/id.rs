//! Strongly-typed identifiers used across the plan model.
//!
//! `OperatorId` is the user-declared `"@id"` other operators reference in their
//! inputs. `NodeId` is the graph identity of an operator: its position in the
//! document's `query` array. Keep the two apart; an operator may have no
//! `OperatorId` at all, but every node has a `NodeId`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident, $fmt:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $fmt, self.0)
            }
        }
    };
}

new_id!(OperatorId, "#{}");
new_id!(NodeId, "query[{}]");

impl NodeId {
    pub const fn from_index(index: usize) -> Self {
        Self(index as u64)
    }

    /// Position of the node in the graph's node list.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for OperatorId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_id_is_transparent_on_the_wire() {
        let id = OperatorId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: OperatorId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_forms() {
        assert_eq!(OperatorId::new(3).to_string(), "#3");
        assert_eq!(NodeId::from_index(4).to_string(), "query[4]");
        assert_eq!(NodeId::from_index(4).index(), 4);
    }
}
