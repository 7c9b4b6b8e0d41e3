#![forbid(unsafe_code)]

//! The host editor boundary.
//!
//! These traits mirror the host's data store and block factory. bdock never
//! persists document state itself; every mutation goes through them.

use bdock_registry::Attributes;

use crate::node::{BlockNode, InsertionPoint, NodeId};

/// Read and mutate the host's document state.
///
/// Each mutating call is one host transaction (one undo step).
pub trait StateStore {
    /// Where the host would insert a new node right now, derived from its
    /// selection or cursor.
    fn insertion_point(&self) -> InsertionPoint;

    /// Currently selected node, if any.
    fn selected_node_id(&self) -> Option<NodeId>;

    /// Position of `id` among the children of `parent`.
    fn node_index(&self, id: &NodeId, parent: &NodeId) -> Option<usize>;

    /// Parent scope of `id` (the root id for top-level nodes). `None` when
    /// the node does not exist.
    fn node_root_parent(&self, id: &NodeId) -> Option<NodeId>;

    /// Child ids of `parent`, in document order.
    fn node_child_order(&self, parent: &NodeId) -> Vec<NodeId>;

    /// Snapshot of a node and its subtree.
    fn node(&self, id: &NodeId) -> Option<BlockNode>;

    fn insert_node(&mut self, node: BlockNode, index: usize, parent: &NodeId, select: bool);

    /// Insert several sibling nodes as a single transaction.
    fn insert_nodes(&mut self, nodes: Vec<BlockNode>, index: usize, parent: &NodeId, select: bool);

    fn replace_node(&mut self, id: &NodeId, node: BlockNode);

    fn remove_node(&mut self, id: &NodeId);
}

/// Instantiate content nodes.
pub trait NodeFactory {
    /// Create a node with a fresh host-assigned id.
    fn create_node(
        &mut self,
        type_name: &str,
        attributes: Attributes,
        children: Vec<BlockNode>,
    ) -> BlockNode;

    fn is_type_registered(&self, type_name: &str) -> bool;
}

/// Restrict which block types the host offers. Used by the loader.
pub trait BlockTypeFilter {
    /// `None` lifts the restriction.
    fn set_allowed_block_types(&mut self, names: Option<Vec<String>>);
}

/// Everything [`crate::BlockInserter`] needs from the host.
pub trait EditorHost: StateStore + NodeFactory {}

impl<T: StateStore + NodeFactory> EditorHost for T {}
