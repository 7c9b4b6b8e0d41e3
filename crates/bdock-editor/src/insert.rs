#![forbid(unsafe_code)]

//! The insertion façade.
//!
//! Internally every operation is a `Result<NodeId, InsertError>` pipeline;
//! the public methods fold that into an [`InsertOutcome`] so callers (UI
//! gestures, JS hosts) get one uniform shape and never a fault.

use serde::Serialize;

use bdock_registry::{Attributes, BlockRegistry, NodeSpec};

use crate::error::InsertError;
use crate::host::EditorHost;
use crate::node::{BlockNode, InsertionPoint, NodeId};

/// Uniform result of an insertion API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub success: bool,
    pub id: Option<NodeId>,
    pub error: Option<InsertError>,
}

impl InsertOutcome {
    #[must_use]
    pub fn ok(id: NodeId) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: InsertError) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error),
        }
    }

    /// Stable error code, e.g. `"BlockNotRegistered"`.
    #[must_use]
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(InsertError::code)
    }
}

impl From<Result<NodeId, InsertError>> for InsertOutcome {
    fn from(result: Result<NodeId, InsertError>) -> Self {
        match result {
            Ok(id) => Self::ok(id),
            Err(err) => Self::failed(err),
        }
    }
}

/// Placement options. Omitted fields fall back to the host's insertion
/// point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOptions {
    pub index: Option<usize>,
    pub parent: Option<NodeId>,
    pub select_after_insert: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            index: None,
            parent: None,
            select_after_insert: true,
        }
    }
}

impl InsertOptions {
    #[must_use]
    pub fn at(index: usize, parent: NodeId) -> Self {
        Self {
            index: Some(index),
            parent: Some(parent),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn without_select(mut self) -> Self {
        self.select_after_insert = false;
        self
    }
}

/// One entry of a batch insert.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRequest {
    pub name: String,
    pub attributes: Attributes,
}

impl BlockRequest {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Insertion API bound to one registry and one host.
pub struct BlockInserter<'a, H: EditorHost> {
    registry: &'a BlockRegistry,
    host: &'a mut H,
}

impl<'a, H: EditorHost> BlockInserter<'a, H> {
    pub fn new(registry: &'a BlockRegistry, host: &'a mut H) -> Self {
        Self { registry, host }
    }

    /// Read access to the host store.
    #[must_use]
    pub fn host(&self) -> &H {
        &*self.host
    }

    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        self.registry
    }

    /// Whether the host can instantiate `name`.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.host.is_type_registered(name)
    }

    /// Insert one node.
    pub fn insert(&mut self, name: &str, attributes: Attributes, options: InsertOptions) -> InsertOutcome {
        self.try_insert(name, attributes, &options).into()
    }

    /// Insert right after the selected node, in the same parent.
    pub fn insert_after_selected(&mut self, name: &str, attributes: Attributes) -> InsertOutcome {
        let result = self.point_after_selected().and_then(|point| {
            self.try_insert(name, attributes, &InsertOptions::at(point.index, point.parent))
        });
        result.into()
    }

    /// Append as the last child of the selected node.
    pub fn insert_as_child(&mut self, name: &str, attributes: Attributes) -> InsertOutcome {
        let result = self.selected().and_then(|selected| {
            let index = self.host.node_child_order(&selected).len();
            self.try_insert(name, attributes, &InsertOptions::at(index, selected))
        });
        result.into()
    }

    /// Insert several sibling nodes as one host transaction.
    ///
    /// Nothing is inserted if any entry names an unregistered type. The
    /// outcome id is the first inserted node.
    pub fn insert_multiple(&mut self, requests: &[BlockRequest], options: InsertOptions) -> InsertOutcome {
        self.try_insert_multiple(requests, &options).into()
    }

    /// Deep-copy the selected node and insert the copy right after it.
    pub fn duplicate_selected(&mut self) -> InsertOutcome {
        self.try_duplicate_selected().into()
    }

    /// Replace the selected node with a new node of type `name`.
    pub fn replace_selected(&mut self, name: &str, attributes: Attributes) -> InsertOutcome {
        self.try_replace_selected(name, attributes).into()
    }

    /// Remove the selected node. The outcome id is the removed node.
    pub fn remove_selected(&mut self) -> InsertOutcome {
        let result = self.selected().map(|selected| {
            self.host.remove_node(&selected);
            tracing::debug!(target: "bdock.insert", id = %selected, "node removed");
            selected
        });
        result.into()
    }

    /// Expand a registry preset and insert it as one transaction.
    pub fn insert_preset(&mut self, preset_id: &str, options: InsertOptions) -> InsertOutcome {
        self.try_insert_preset(preset_id, &options).into()
    }

    /// Resolve where `options` would insert, clamped to a valid index.
    ///
    /// - index and parent given: used as is.
    /// - only parent given: appended to that parent.
    /// - only index given: that index in the root scope.
    /// - neither: the host's current insertion point.
    ///
    /// A parent missing from the store is `NodeNotFound`.
    pub fn resolve_point(&self, options: &InsertOptions) -> Result<InsertionPoint, InsertError> {
        let point = match (options.index, &options.parent) {
            (Some(index), Some(parent)) => InsertionPoint::new(index, parent.clone()),
            (None, Some(parent)) => {
                InsertionPoint::new(self.host.node_child_order(parent).len(), parent.clone())
            }
            (Some(index), None) => InsertionPoint::root(index),
            (None, None) => self.host.insertion_point(),
        };
        if !point.parent.is_root() && self.host.node(&point.parent).is_none() {
            tracing::debug!(target: "bdock.insert", parent = %point.parent, "insertion parent not found");
            return Err(InsertError::NodeNotFound(point.parent));
        }
        let len = self.host.node_child_order(&point.parent).len();
        Ok(InsertionPoint::new(point.index.min(len), point.parent))
    }

    /// Registry defaults with caller attributes layered on top.
    #[must_use]
    pub fn merged_attributes(&self, name: &str, attributes: Attributes) -> Attributes {
        let mut merged = self
            .registry
            .get_by_name(name)
            .map(|d| d.default_attributes.clone())
            .unwrap_or_default();
        merged.extend(attributes);
        merged
    }

    fn try_insert(
        &mut self,
        name: &str,
        attributes: Attributes,
        options: &InsertOptions,
    ) -> Result<NodeId, InsertError> {
        self.ensure_registered(name)?;
        let point = self.resolve_point(options)?;
        let attributes = self.merged_attributes(name, attributes);
        let node = self.host.create_node(name, attributes, Vec::new());
        let id = node.id.clone();
        self.host
            .insert_node(node, point.index, &point.parent, options.select_after_insert);
        tracing::debug!(
            target: "bdock.insert",
            block = name,
            id = %id,
            index = point.index,
            parent = %point.parent,
            "node inserted"
        );
        Ok(id)
    }

    fn try_insert_multiple(
        &mut self,
        requests: &[BlockRequest],
        options: &InsertOptions,
    ) -> Result<NodeId, InsertError> {
        if requests.is_empty() {
            return Err(InsertError::EmptyBatch);
        }
        for request in requests {
            self.ensure_registered(&request.name)?;
        }
        let point = self.resolve_point(options)?;
        let mut nodes = Vec::with_capacity(requests.len());
        for request in requests {
            let attributes = self.merged_attributes(&request.name, request.attributes.clone());
            nodes.push(self.host.create_node(&request.name, attributes, Vec::new()));
        }
        self.commit_batch(nodes, point, options.select_after_insert)
    }

    fn try_duplicate_selected(&mut self) -> Result<NodeId, InsertError> {
        let selected = self.selected()?;
        let original = self
            .host
            .node(&selected)
            .ok_or_else(|| InsertError::NodeNotFound(selected.clone()))?;
        let parent = self
            .host
            .node_root_parent(&selected)
            .ok_or_else(|| InsertError::NodeNotFound(selected.clone()))?;
        let index = self
            .host
            .node_index(&selected, &parent)
            .ok_or_else(|| InsertError::NodeNotFound(selected.clone()))?;

        let copy = self.clone_subtree(&original);
        let id = copy.id.clone();
        self.host.insert_node(copy, index + 1, &parent, true);
        tracing::debug!(
            target: "bdock.insert",
            original = %selected,
            id = %id,
            descendants = original.descendant_count(),
            "node duplicated"
        );
        Ok(id)
    }

    fn try_replace_selected(&mut self, name: &str, attributes: Attributes) -> Result<NodeId, InsertError> {
        let selected = self.selected()?;
        self.ensure_registered(name)?;
        if self.host.node(&selected).is_none() {
            return Err(InsertError::NodeNotFound(selected));
        }
        let attributes = self.merged_attributes(name, attributes);
        let node = self.host.create_node(name, attributes, Vec::new());
        let id = node.id.clone();
        self.host.replace_node(&selected, node);
        tracing::debug!(target: "bdock.insert", replaced = %selected, id = %id, "node replaced");
        Ok(id)
    }

    fn try_insert_preset(&mut self, preset_id: &str, options: &InsertOptions) -> Result<NodeId, InsertError> {
        let registry = self.registry;
        let preset = registry
            .preset(preset_id)
            .ok_or_else(|| InsertError::PresetNotFound(preset_id.to_string()))?;
        for spec in &preset.nodes {
            self.ensure_spec_registered(spec)?;
        }
        let point = self.resolve_point(options)?;
        let mut nodes = Vec::with_capacity(preset.nodes.len());
        for spec in &preset.nodes {
            nodes.push(self.instantiate(spec));
        }
        if nodes.is_empty() {
            return Err(InsertError::EmptyBatch);
        }
        self.commit_batch(nodes, point, options.select_after_insert)
    }

    fn commit_batch(
        &mut self,
        nodes: Vec<BlockNode>,
        point: InsertionPoint,
        select: bool,
    ) -> Result<NodeId, InsertError> {
        let first = nodes.first().map(|n| n.id.clone()).ok_or(InsertError::EmptyBatch)?;
        let count = nodes.len();
        self.host.insert_nodes(nodes, point.index, &point.parent, select);
        tracing::debug!(
            target: "bdock.insert",
            count,
            first = %first,
            index = point.index,
            parent = %point.parent,
            "nodes inserted"
        );
        Ok(first)
    }

    fn instantiate(&mut self, spec: &NodeSpec) -> BlockNode {
        let mut children = Vec::with_capacity(spec.children.len());
        for child in &spec.children {
            children.push(self.instantiate(child));
        }
        let attributes = self.merged_attributes(&spec.name, spec.attributes.clone());
        self.host.create_node(&spec.name, attributes, children)
    }

    fn clone_subtree(&mut self, node: &BlockNode) -> BlockNode {
        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            children.push(self.clone_subtree(child));
        }
        self.host
            .create_node(&node.name, node.attributes.clone(), children)
    }

    fn ensure_spec_registered(&self, spec: &NodeSpec) -> Result<(), InsertError> {
        self.ensure_registered(&spec.name)?;
        spec.children
            .iter()
            .try_for_each(|child| self.ensure_spec_registered(child))
    }

    fn ensure_registered(&self, name: &str) -> Result<(), InsertError> {
        if self.host.is_type_registered(name) {
            Ok(())
        } else {
            tracing::debug!(target: "bdock.insert", block = name, "block type not registered");
            Err(InsertError::BlockNotRegistered(name.to_string()))
        }
    }

    fn selected(&self) -> Result<NodeId, InsertError> {
        self.host.selected_node_id().ok_or(InsertError::NoSelection)
    }

    fn point_after_selected(&self) -> Result<InsertionPoint, InsertError> {
        let selected = self.selected()?;
        let parent = self
            .host
            .node_root_parent(&selected)
            .ok_or_else(|| InsertError::NodeNotFound(selected.clone()))?;
        let index = self
            .host
            .node_index(&selected, &parent)
            .ok_or_else(|| InsertError::NodeNotFound(selected.clone()))?;
        Ok(InsertionPoint::new(index + 1, parent))
    }
}
