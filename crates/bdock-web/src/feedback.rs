#![forbid(unsafe_code)]

//! Drag feedback: the ghost preview, the drop-line and the target highlight.
//!
//! [`DragFeedback`] owns every node it creates. [`DragFeedback::teardown`]
//! removes all of them and may be called any number of times.

use bdock_core::config::DragConfig;
use bdock_core::geometry::Point;

use crate::dom::{DocumentId, DomHost, ElementId};
use crate::drop_target::DropTargetDescriptor;
use crate::surface::SurfaceHandle;

/// Offset of the ghost from the pointer so it does not sit under it.
const GHOST_OFFSET: Point = Point::new(12.0, 12.0);

/// Height of the drop-line in CSS pixels.
const DROP_LINE_THICKNESS: f64 = 2.0;

fn stylesheet(config: &DragConfig) -> String {
    format!(
        ".{ghost}{{position:fixed;z-index:100000;pointer-events:none;opacity:.85;\
padding:4px 8px;border-radius:2px;background:#1e1e1e;color:#fff;font-size:12px}}\
.{line}{{position:absolute;z-index:1000;pointer-events:none;height:{DROP_LINE_THICKNESS}px;\
background:var(--bdock-accent,#3858e9)}}\
.{target}{{outline:1px dashed var(--bdock-accent,#3858e9)}}",
        ghost = config.ghost_class,
        line = config.drop_line_class,
        target = config.drop_target_class,
    )
}

/// Inject the feedback stylesheet into `document` unless an element with the
/// configured id already exists. Returns true when a new sheet was added.
pub fn inject_stylesheet<D: DomHost + ?Sized>(dom: &mut D, document: DocumentId, config: &DragConfig) -> bool {
    if dom.element_by_id(document, &config.stylesheet_id).is_some() {
        return false;
    }
    let style = dom.create_element(document, "style");
    dom.set_attribute(style, "id", &config.stylesheet_id);
    dom.set_text(style, &stylesheet(config));
    let head = dom.head(document);
    dom.append_child(head, style);
    true
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Feedback nodes owned by one drag session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragFeedback {
    ghost: Option<ElementId>,
    drop_line: Option<ElementId>,
    highlighted: Option<ElementId>,
}

impl DragFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ghost(&self) -> Option<ElementId> {
        self.ghost
    }

    #[must_use]
    pub fn drop_line(&self) -> Option<ElementId> {
        self.drop_line
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<ElementId> {
        self.highlighted
    }

    /// Create the ghost in the top document at `at` (top coordinates).
    pub fn show_ghost<D: DomHost + ?Sized>(&mut self, dom: &mut D, config: &DragConfig, label: &str, at: Point) {
        if self.ghost.is_none() {
            let top = dom.top_document();
            let ghost = dom.create_element(top, "div");
            dom.add_class(ghost, &config.ghost_class);
            dom.set_attribute(ghost, "aria-hidden", "true");
            dom.set_text(ghost, label);
            let body = dom.body(top);
            dom.append_child(body, ghost);
            self.ghost = Some(ghost);
        }
        self.move_ghost(dom, at);
    }

    pub fn move_ghost<D: DomHost + ?Sized>(&mut self, dom: &mut D, at: Point) {
        if let Some(ghost) = self.ghost {
            let at = at.offset_by(GHOST_OFFSET);
            dom.set_style(ghost, "left", &px(at.x));
            dom.set_style(ghost, "top", &px(at.y));
        }
    }

    /// Position the drop-line at the target edge, relative to the surface
    /// root, and highlight the anchor wrapper.
    pub fn show_target<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        config: &DragConfig,
        surface: &SurfaceHandle,
        target: &DropTargetDescriptor,
    ) {
        let root = surface.root;
        if dom.computed_position(root) == "static" {
            dom.set_style(root, "position", "relative");
        }

        let line = match self.drop_line {
            Some(line) if dom.contains(root, line) => line,
            stale => {
                if let Some(old) = stale {
                    dom.remove(old);
                }
                let line = dom.create_element(surface.document, "div");
                dom.add_class(line, &config.drop_line_class);
                dom.append_child(root, line);
                self.drop_line = Some(line);
                line
            }
        };

        let root_rect = dom.bounding_rect(root);
        let scroll = dom.scroll_offset(root);
        let (left, top, width) = match target.anchor {
            Some(anchor) => {
                let rect = dom.bounding_rect(anchor);
                let edge = if target.insert_before { rect.top() } else { rect.bottom() };
                (rect.left() - root_rect.left(), edge - root_rect.top(), rect.width)
            }
            None => (0.0, 0.0, root_rect.width),
        };
        let top = top + scroll.y - DROP_LINE_THICKNESS / 2.0;
        dom.set_style(line, "left", &px(left + scroll.x));
        dom.set_style(line, "top", &px(top));
        dom.set_style(line, "width", &px(width));

        self.highlight(dom, config, target.anchor);
    }

    fn highlight<D: DomHost + ?Sized>(&mut self, dom: &mut D, config: &DragConfig, anchor: Option<ElementId>) {
        if self.highlighted == anchor {
            return;
        }
        if let Some(previous) = self.highlighted.take() {
            dom.remove_class(previous, &config.drop_target_class);
        }
        if let Some(anchor) = anchor {
            dom.add_class(anchor, &config.drop_target_class);
            self.highlighted = Some(anchor);
        }
    }

    /// Remove every feedback node and class.
    pub fn teardown<D: DomHost + ?Sized>(&mut self, dom: &mut D, config: &DragConfig) {
        if let Some(ghost) = self.ghost.take() {
            dom.remove(ghost);
        }
        if let Some(line) = self.drop_line.take() {
            dom.remove(line);
        }
        if let Some(anchor) = self.highlighted.take() {
            dom.remove_class(anchor, &config.drop_target_class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDom;
    use bdock_core::geometry::Rect;
    use bdock_editor::NodeId;

    #[test]
    fn stylesheet_injected_once() {
        let mut dom = MemoryDom::new();
        let top = dom.top_document();
        let config = DragConfig::default();
        assert!(inject_stylesheet(&mut dom, top, &config));
        assert!(!inject_stylesheet(&mut dom, top, &config));
        let style = dom.element_by_id(top, "bdock-drag-feedback").expect("style");
        assert!(dom.text(style).is_some_and(|t| t.contains(".bdock-drop-line")));
    }

    #[test]
    fn drop_line_sits_on_anchor_edge() {
        let mut dom = MemoryDom::new();
        let top = dom.top_document();
        let body = dom.body(top);
        let root = dom.append_new(body, "div");
        dom.set_rect(root, Rect::new(100.0, 100.0, 600.0, 400.0));
        dom.set_scroll(root, Point::new(0.0, 30.0));
        let block = dom.append_new(root, "div");
        dom.set_rect(block, Rect::new(120.0, 150.0, 560.0, 40.0));

        let config = DragConfig::default();
        let surface = SurfaceHandle { root, document: top, is_cross_document: false };
        let target = DropTargetDescriptor {
            anchor: Some(block),
            anchor_node_id: None,
            insert_before: false,
            parent: NodeId::root(),
            index: 1,
            is_empty_container: false,
        };
        let mut feedback = DragFeedback::new();
        feedback.show_target(&mut dom, &config, &surface, &target);

        let line = feedback.drop_line().expect("line");
        assert_eq!(dom.style(root, "position"), Some("relative"));
        assert_eq!(dom.style(line, "left"), Some("20px"));
        assert_eq!(dom.style(line, "top"), Some("119px"));
        assert_eq!(dom.style(line, "width"), Some("560px"));
        assert!(dom.has_class(block, "is-bdock-drop-target"));

        feedback.teardown(&mut dom, &config);
        feedback.teardown(&mut dom, &config);
        assert!(!dom.is_connected(line));
        assert!(!dom.has_class(block, "is-bdock-drop-target"));
    }
}
