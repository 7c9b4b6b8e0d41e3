#![forbid(unsafe_code)]

//! In-memory editor host.
//!
//! Holds a node tree, a selection, a registered-type set and an undo stack
//! with one entry per mutating call, so "one transaction" is observable as
//! "one undo step".

use std::collections::BTreeSet;

use bdock_registry::{Attributes, BlockRegistry};

use crate::host::{BlockTypeFilter, NodeFactory, StateStore};
use crate::node::{BlockNode, InsertionPoint, NodeId};

/// Count of mutating store calls, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationCounts {
    pub insert_node: usize,
    pub insert_nodes: usize,
    pub replace_node: usize,
    pub remove_node: usize,
}

impl MutationCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.insert_node + self.insert_nodes + self.replace_node + self.remove_node
    }
}

/// In-memory [`StateStore`] + [`NodeFactory`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    roots: Vec<BlockNode>,
    selected: Option<NodeId>,
    registered: BTreeSet<String>,
    allowed: Option<BTreeSet<String>>,
    next_id: u64,
    history: Vec<(Vec<BlockNode>, Option<NodeId>)>,
    counts: MutationCounts,
}

impl MemoryEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A host with every type in `names` registered.
    #[must_use]
    pub fn with_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registered: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A host with every registry block (disabled ones included) registered.
    #[must_use]
    pub fn for_registry(registry: &BlockRegistry) -> Self {
        Self::with_types(registry.list_names(true))
    }

    /// Top-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[BlockNode] {
        &self.roots
    }

    /// Type names of the top-level nodes, in order.
    #[must_use]
    pub fn root_names(&self) -> Vec<&str> {
        self.roots.iter().map(|n| n.name.as_str()).collect()
    }

    /// Select `id` (or clear the selection).
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    #[must_use]
    pub fn mutation_counts(&self) -> MutationCounts {
        self.counts
    }

    /// Number of undo steps recorded.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Revert the last transaction. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some((roots, selected)) => {
                self.roots = roots;
                self.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Build and append a node outside of any transaction (fixture setup).
    pub fn seed(&mut self, parent: &NodeId, name: &str, attributes: Attributes) -> NodeId {
        let node = self.create_node(name, attributes, Vec::new());
        let id = node.id.clone();
        if let Some(children) = self.children_mut(parent) {
            children.push(node);
        }
        id
    }

    fn checkpoint(&mut self) {
        self.history.push((self.roots.clone(), self.selected.clone()));
    }

    fn children(&self, parent: &NodeId) -> Option<&Vec<BlockNode>> {
        if parent.is_root() {
            Some(&self.roots)
        } else {
            find(&self.roots, parent).map(|n| &n.children)
        }
    }

    fn children_mut(&mut self, parent: &NodeId) -> Option<&mut Vec<BlockNode>> {
        if parent.is_root() {
            Some(&mut self.roots)
        } else {
            find_mut(&mut self.roots, parent).map(|n| &mut n.children)
        }
    }

    /// Splice `nodes` under `parent` as one undo step. An unknown parent
    /// leaves the store and the history untouched.
    fn insert_at(&mut self, nodes: Vec<BlockNode>, index: usize, parent: &NodeId, select: bool) {
        if self.children(parent).is_none() {
            tracing::warn!(target: "bdock.insert", parent = %parent, "insert into unknown parent ignored");
            return;
        }
        self.checkpoint();
        let first = nodes.first().map(|n| n.id.clone());
        let Some(children) = self.children_mut(parent) else {
            return;
        };
        let at = index.min(children.len());
        children.splice(at..at, nodes);
        if select {
            self.selected = first;
        }
    }
}

fn find<'n>(nodes: &'n [BlockNode], id: &NodeId) -> Option<&'n BlockNode> {
    for node in nodes {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_mut<'n>(nodes: &'n mut [BlockNode], id: &NodeId) -> Option<&'n mut BlockNode> {
    for node in nodes.iter_mut() {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn parent_of(nodes: &[BlockNode], scope: &NodeId, id: &NodeId) -> Option<NodeId> {
    for node in nodes {
        if node.id == *id {
            return Some(scope.clone());
        }
        if let Some(found) = parent_of(&node.children, &node.id, id) {
            return Some(found);
        }
    }
    None
}

impl StateStore for MemoryEditor {
    fn insertion_point(&self) -> InsertionPoint {
        if let Some(selected) = &self.selected
            && let Some(parent) = self.node_root_parent(selected)
            && let Some(index) = self.node_index(selected, &parent)
        {
            return InsertionPoint::new(index + 1, parent);
        }
        InsertionPoint::root(self.roots.len())
    }

    fn selected_node_id(&self) -> Option<NodeId> {
        self.selected.clone()
    }

    fn node_index(&self, id: &NodeId, parent: &NodeId) -> Option<usize> {
        self.children(parent)?.iter().position(|n| n.id == *id)
    }

    fn node_root_parent(&self, id: &NodeId) -> Option<NodeId> {
        parent_of(&self.roots, &NodeId::root(), id)
    }

    fn node_child_order(&self, parent: &NodeId) -> Vec<NodeId> {
        self.children(parent)
            .map(|children| children.iter().map(|n| n.id.clone()).collect())
            .unwrap_or_default()
    }

    fn node(&self, id: &NodeId) -> Option<BlockNode> {
        find(&self.roots, id).cloned()
    }

    fn insert_node(&mut self, node: BlockNode, index: usize, parent: &NodeId, select: bool) {
        self.counts.insert_node += 1;
        self.insert_at(vec![node], index, parent, select);
    }

    fn insert_nodes(&mut self, nodes: Vec<BlockNode>, index: usize, parent: &NodeId, select: bool) {
        self.counts.insert_nodes += 1;
        self.insert_at(nodes, index, parent, select);
    }

    fn replace_node(&mut self, id: &NodeId, node: BlockNode) {
        self.counts.replace_node += 1;
        let Some(parent) = self.node_root_parent(id) else {
            return;
        };
        let Some(index) = self.node_index(id, &parent) else {
            return;
        };
        self.checkpoint();
        let new_id = node.id.clone();
        if let Some(children) = self.children_mut(&parent) {
            children[index] = node;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = Some(new_id);
        }
    }

    fn remove_node(&mut self, id: &NodeId) {
        self.counts.remove_node += 1;
        let Some(parent) = self.node_root_parent(id) else {
            return;
        };
        self.checkpoint();
        if let Some(children) = self.children_mut(&parent) {
            children.retain(|n| n.id != *id);
        }
        if let Some(selected) = &self.selected
            && find(&self.roots, selected).is_none()
        {
            self.selected = None;
        }
    }
}

impl NodeFactory for MemoryEditor {
    fn create_node(
        &mut self,
        type_name: &str,
        attributes: Attributes,
        children: Vec<BlockNode>,
    ) -> BlockNode {
        self.next_id += 1;
        BlockNode {
            id: NodeId::new(format!("node-{}", self.next_id)),
            name: type_name.to_string(),
            attributes,
            children,
        }
    }

    fn is_type_registered(&self, type_name: &str) -> bool {
        self.registered.contains(type_name)
            && self
                .allowed
                .as_ref()
                .is_none_or(|allowed| allowed.contains(type_name))
    }
}

impl BlockTypeFilter for MemoryEditor {
    fn set_allowed_block_types(&mut self, names: Option<Vec<String>>) {
        self.allowed = names.map(|names| names.into_iter().collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_point_follows_selection() {
        let mut editor = MemoryEditor::with_types(["core/text"]);
        let a = editor.seed(&NodeId::root(), "core/text", Attributes::new());
        let _b = editor.seed(&NodeId::root(), "core/text", Attributes::new());
        assert_eq!(editor.insertion_point(), InsertionPoint::root(2));
        editor.select(Some(a));
        assert_eq!(editor.insertion_point(), InsertionPoint::root(1));
    }

    #[test]
    fn undo_reverts_one_transaction() {
        let mut editor = MemoryEditor::with_types(["core/text"]);
        let n1 = editor.create_node("core/text", Attributes::new(), Vec::new());
        let n2 = editor.create_node("core/text", Attributes::new(), Vec::new());
        editor.insert_nodes(vec![n1, n2], 0, &NodeId::root(), true);
        assert_eq!(editor.roots().len(), 2);
        assert_eq!(editor.undo_depth(), 1);
        assert!(editor.undo());
        assert!(editor.roots().is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn unknown_parent_records_no_undo_step() {
        let mut editor = MemoryEditor::with_types(["core/text"]);
        let node = editor.create_node("core/text", Attributes::new(), Vec::new());
        editor.insert_node(node, 0, &NodeId::new("gone"), true);
        assert!(editor.roots().is_empty());
        assert_eq!(editor.undo_depth(), 0);
        assert_eq!(editor.selected_node_id(), None);
    }

    #[test]
    fn nested_parent_lookup() {
        let mut editor = MemoryEditor::with_types(["core/group", "core/text"]);
        let group = editor.seed(&NodeId::root(), "core/group", Attributes::new());
        let text = editor.seed(&group, "core/text", Attributes::new());
        assert_eq!(editor.node_root_parent(&text), Some(group.clone()));
        assert_eq!(editor.node_root_parent(&group), Some(NodeId::root()));
        assert_eq!(editor.node_index(&text, &group), Some(0));
        assert_eq!(editor.node_root_parent(&NodeId::new("nope")), None);
    }

    #[test]
    fn allowed_types_restrict_registration() {
        let mut editor = MemoryEditor::with_types(["core/text", "core/audio"]);
        editor.set_allowed_block_types(Some(vec!["core/text".to_string()]));
        assert!(editor.is_type_registered("core/text"));
        assert!(!editor.is_type_registered("core/audio"));
        editor.set_allowed_block_types(None);
        assert!(editor.is_type_registered("core/audio"));
    }

    #[test]
    fn removing_selected_clears_selection() {
        let mut editor = MemoryEditor::with_types(["core/text"]);
        let a = editor.seed(&NodeId::root(), "core/text", Attributes::new());
        editor.select(Some(a.clone()));
        editor.remove_node(&a);
        assert_eq!(editor.selected_node_id(), None);
        assert_eq!(editor.mutation_counts().remove_node, 1);
    }
}
