#![forbid(unsafe_code)]

//! Where a drop at a given pointer position lands.
//!
//! The nearest top-level wrapper is the one whose top or bottom edge is
//! closest to the pointer's Y coordinate; the drop goes before it when the
//! top edge is strictly closer. An empty surface yields index 0 in its own
//! scope.

use serde::Serialize;

use bdock_core::config::DragConfig;
use bdock_core::geometry::{Point, Rect};
use bdock_editor::{InsertionPoint, NodeId, StateStore};

use crate::dom::{DomHost, ElementId};
use crate::surface::SurfaceHandle;

/// Computed drop target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTargetDescriptor {
    /// Nearest wrapper, `None` for an empty surface.
    pub anchor: Option<ElementId>,
    /// Node id carried by the anchor wrapper.
    pub anchor_node_id: Option<NodeId>,
    pub insert_before: bool,
    /// Scope of the surface root (`""` for the document root).
    #[serde(rename = "parentNodeId")]
    pub parent: NodeId,
    /// Index into the rendered wrapper order.
    pub index: usize,
    pub is_empty_container: bool,
}

impl DropTargetDescriptor {
    /// The synthetic target of an empty surface.
    #[must_use]
    pub fn empty(parent: NodeId) -> Self {
        Self {
            anchor: None,
            anchor_node_id: None,
            insert_before: true,
            parent,
            index: 0,
            is_empty_container: true,
        }
    }

    /// Compute the target for `pointer` (surface document coordinates).
    #[must_use]
    pub fn compute<D: DomHost + ?Sized>(
        dom: &D,
        surface: &SurfaceHandle,
        pointer: Point,
        config: &DragConfig,
    ) -> Self {
        let parent = dom
            .attribute(surface.root, &config.node_id_attribute)
            .map_or_else(NodeId::root, NodeId::new);
        let wrappers = dom.query_all(surface.root, &config.block_selector);
        let rects: Vec<Rect> = wrappers.iter().map(|&w| dom.bounding_rect(w)).collect();
        let Some((position, insert_before)) = nearest_edge(&rects, pointer.y) else {
            return Self::empty(parent);
        };
        let anchor = wrappers[position];
        Self {
            anchor: Some(anchor),
            anchor_node_id: dom.attribute(anchor, &config.node_id_attribute).map(NodeId::new),
            insert_before,
            parent,
            index: position + usize::from(!insert_before),
            is_empty_container: false,
        }
    }

    /// Insertion point against the store's current child order.
    ///
    /// Uses the anchor's live index when the store knows the anchor node,
    /// otherwise the rendered index clamped to the parent's child count.
    #[must_use]
    pub fn insertion_point<S: StateStore + ?Sized>(&self, store: &S) -> InsertionPoint {
        if let Some(anchor) = &self.anchor_node_id
            && let Some(index) = store.node_index(anchor, &self.parent)
        {
            return InsertionPoint::new(index + usize::from(!self.insert_before), self.parent.clone());
        }
        let len = store.node_child_order(&self.parent).len();
        InsertionPoint::new(self.index.min(len), self.parent.clone())
    }
}

/// Position of the wrapper whose edge is closest to `y`, and whether the
/// drop goes before it. Ties keep the earlier wrapper.
#[must_use]
pub fn nearest_edge(rects: &[Rect], y: f64) -> Option<(usize, bool)> {
    let mut best: Option<(usize, bool, f64)> = None;
    for (position, rect) in rects.iter().enumerate() {
        let to_top = rect.distance_to_top(y);
        let to_bottom = rect.distance_to_bottom(y);
        let distance = to_top.min(to_bottom);
        if best.is_none_or(|(_, _, d)| distance < d) {
            best = Some((position, to_top < to_bottom, distance));
        }
    }
    best.map(|(position, before, _)| (position, before))
}
