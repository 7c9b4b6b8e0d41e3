#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use bdock_registry::Attributes;

/// Host-assigned node identifier. The empty id names the document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The root scope (`""`).
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A content node and its subtree, as handed out by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    pub id: NodeId,
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    /// Number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Ids of this node and all descendants, depth-first.
    #[must_use]
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, out: &mut Vec<NodeId>) {
        out.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// Where a new node goes: position `index` among the children of `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionPoint {
    pub index: usize,
    #[serde(rename = "parentNodeId")]
    pub parent: NodeId,
}

impl InsertionPoint {
    #[must_use]
    pub fn new(index: usize, parent: NodeId) -> Self {
        Self { index, parent }
    }

    /// Index `index` in the root scope.
    #[must_use]
    pub fn root(index: usize) -> Self {
        Self::new(index, NodeId::root())
    }
}
