#![forbid(unsafe_code)]

//! Editing surface discovery and binding.
//!
//! The surface root may live in the top document or in a same-origin frame
//! and is replaced whenever the host re-renders its canvas. Resolution is
//! therefore never cached across a render: [`SurfaceBinder::ensure_bound`]
//! revalidates the bound root on every call and re-resolves when it has been
//! detached.

use bdock_core::config::DragConfig;

use crate::dom::{DocumentId, DomHost, ElementId};
use crate::feedback::inject_stylesheet;

/// A resolved editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle {
    pub root: ElementId,
    pub document: DocumentId,
    pub is_cross_document: bool,
}

/// Result of one surface lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceResolution {
    SameDocument(SurfaceHandle),
    CrossDocument(SurfaceHandle),
    NotFound,
}

impl SurfaceResolution {
    #[must_use]
    pub const fn handle(&self) -> Option<SurfaceHandle> {
        match self {
            Self::SameDocument(handle) | Self::CrossDocument(handle) => Some(*handle),
            Self::NotFound => None,
        }
    }
}

/// Find the surface root: the top document first, then same-origin frames
/// breadth-first.
#[must_use]
pub fn resolve_surface<D: DomHost + ?Sized>(dom: &D, selector: &str) -> SurfaceResolution {
    let top = dom.top_document();
    if let Some(root) = dom.query(dom.document_element(top), selector) {
        return SurfaceResolution::SameDocument(SurfaceHandle {
            root,
            document: top,
            is_cross_document: false,
        });
    }
    let mut queue: std::collections::VecDeque<DocumentId> = dom.sub_documents(top).into();
    while let Some(document) = queue.pop_front() {
        if let Some(root) = dom.query(dom.document_element(document), selector) {
            return SurfaceResolution::CrossDocument(SurfaceHandle {
                root,
                document,
                is_cross_document: true,
            });
        }
        queue.extend(dom.sub_documents(document));
    }
    SurfaceResolution::NotFound
}

/// Keeps drop listeners attached to the current surface root.
#[derive(Debug, Clone, Default)]
pub struct SurfaceBinder {
    bound: Option<SurfaceHandle>,
}

impl SurfaceBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound surface, without revalidation.
    #[must_use]
    pub fn current(&self) -> Option<SurfaceHandle> {
        self.bound
    }

    /// Make sure the live surface root has drop listeners and the feedback
    /// stylesheet is present in its document and the top document.
    ///
    /// Idempotent: a connected root carrying the marker attribute is left
    /// alone. A detached root is released and the surface re-resolved.
    pub fn ensure_bound<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        config: &DragConfig,
    ) -> Option<SurfaceHandle> {
        if let Some(handle) = self.bound {
            if dom.is_connected(handle.root)
                && dom.attribute(handle.root, &config.bound_marker_attribute).is_some()
            {
                return Some(handle);
            }
            dom.detach_drop_listeners(handle.root);
            self.bound = None;
            tracing::debug!(target: "bdock.surface", root = handle.root.0, "surface detached");
        }

        let handle = resolve_surface(&*dom, &config.canvas_selector).handle()?;
        if dom.attribute(handle.root, &config.bound_marker_attribute).is_none() {
            dom.attach_drop_listeners(handle.root);
            dom.set_attribute(handle.root, &config.bound_marker_attribute, "true");
        }
        let top = dom.top_document();
        inject_stylesheet(dom, top, config);
        if handle.document != top {
            inject_stylesheet(dom, handle.document, config);
        }
        self.bound = Some(handle);
        tracing::debug!(
            target: "bdock.surface",
            root = handle.root.0,
            document = handle.document.0,
            cross_document = handle.is_cross_document,
            "surface bound"
        );
        Some(handle)
    }

    /// Detach listeners and drop the marker from the bound root.
    pub fn unbind<D: DomHost + ?Sized>(&mut self, dom: &mut D, config: &DragConfig) {
        if let Some(handle) = self.bound.take() {
            dom.detach_drop_listeners(handle.root);
            dom.remove_attribute(handle.root, &config.bound_marker_attribute);
            tracing::debug!(target: "bdock.surface", root = handle.root.0, "surface unbound");
        }
    }
}
