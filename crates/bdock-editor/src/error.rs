#![forbid(unsafe_code)]

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::node::NodeId;

/// Why an insertion operation did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The host has no factory for the block type.
    #[error("block type {0} is not registered")]
    BlockNotRegistered(String),
    /// The operation needs a selected node and none is selected.
    #[error("no node is selected")]
    NoSelection,
    /// A node the operation refers to is not in the document.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// No preset with this id exists in the registry.
    #[error("preset {0} not found")]
    PresetNotFound(String),
    /// A batch insert was given nothing to insert.
    #[error("nothing to insert")]
    EmptyBatch,
}

impl InsertError {
    /// Stable machine-readable code, as reported in [`crate::InsertOutcome`].
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BlockNotRegistered(_) => "BlockNotRegistered",
            Self::NoSelection => "NoSelection",
            Self::NodeNotFound(_) => "NodeNotFound",
            Self::PresetNotFound(_) => "PresetNotFound",
            Self::EmptyBatch => "EmptyBatch",
        }
    }
}

impl Serialize for InsertError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
