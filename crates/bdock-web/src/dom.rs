#![forbid(unsafe_code)]

//! The host DOM boundary.
//!
//! bdock never touches browser objects directly. The embedding host hands
//! out opaque handles and performs every DOM operation on request, then
//! forwards browser events back to the engine. All geometry is in CSS
//! pixels, in the coordinate space of the element's own document.

use serde::Serialize;

use bdock_core::geometry::{Point, Rect};

/// Opaque element handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

/// Opaque document handle. Sub-documents are same-origin frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(pub u64);

/// Handle returned by `requestAnimationFrame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameToken(pub u64);

/// A pointer position tagged with the document whose viewport it is in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DocumentPoint {
    pub document: DocumentId,
    pub point: Point,
}

impl DocumentPoint {
    #[must_use]
    pub const fn new(document: DocumentId, point: Point) -> Self {
        Self { document, point }
    }
}

/// DOM operations bdock needs from its host.
pub trait DomHost {
    /// The top-level document.
    fn top_document(&self) -> DocumentId;

    /// Same-origin documents hosted by frames directly inside `document`.
    fn sub_documents(&self, document: DocumentId) -> Vec<DocumentId>;

    /// Position of `document`'s viewport in top-document coordinates.
    /// `Point::ORIGIN` for the top document.
    fn frame_offset(&self, document: DocumentId) -> Point;

    fn document_of(&self, element: ElementId) -> DocumentId;

    /// `document.documentElement`.
    fn document_element(&self, document: DocumentId) -> ElementId;

    fn head(&self, document: DocumentId) -> ElementId;

    fn body(&self, document: DocumentId) -> ElementId;

    /// First descendant of `scope` matching `selector`.
    fn query(&self, scope: ElementId, selector: &str) -> Option<ElementId>;

    /// Every descendant of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    fn element_by_id(&self, document: DocumentId, id: &str) -> Option<ElementId>;

    fn bounding_rect(&self, element: ElementId) -> Rect;

    fn scroll_offset(&self, element: ElementId) -> Point;

    /// Computed `position` value (`"static"`, `"relative"`, ...).
    fn computed_position(&self, element: ElementId) -> String;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn set_text(&mut self, element: ElementId, text: &str);

    fn create_element(&mut self, document: DocumentId, tag: &str) -> ElementId;

    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Detach `element` from its parent. No-op when already detached.
    fn remove(&mut self, element: ElementId);

    fn is_connected(&self, element: ElementId) -> bool;

    /// Whether `element` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, element: ElementId) -> bool;

    fn active_element(&self, document: DocumentId) -> Option<ElementId>;

    fn focus(&mut self, element: ElementId);

    /// Start forwarding `dragover` / `dragleave` / `drop` on `root`.
    fn attach_drop_listeners(&mut self, root: ElementId);

    /// Stop forwarding drop events on `root`.
    fn detach_drop_listeners(&mut self, root: ElementId);

    /// Schedule a frame callback. The engine never cancels one; a frame
    /// that outlives its session is dropped by the stale-token check.
    fn request_animation_frame(&mut self) -> FrameToken;
}

/// Convert a pointer position into `target`'s viewport coordinates.
#[must_use]
pub fn point_in_document<D: DomHost + ?Sized>(dom: &D, at: DocumentPoint, target: DocumentId) -> Point {
    if at.document == target {
        return at.point;
    }
    at.point
        .offset_by(dom.frame_offset(at.document))
        .relative_to(dom.frame_offset(target))
}
