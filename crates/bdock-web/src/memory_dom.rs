#![forbid(unsafe_code)]

//! Deterministic in-memory [`DomHost`].
//!
//! Geometry is whatever the caller assigns with [`MemoryDom::set_rect`];
//! there is no layout engine. Selector support covers compounds of `tag`,
//! `.class`, `#id`, `[attr]` and `[attr="v"]`, optionally prefixed with
//! `:scope > `.

use std::collections::{BTreeMap, BTreeSet};

use bdock_core::geometry::{Point, Rect};

use crate::dom::{DocumentId, DomHost, ElementId, FrameToken};

#[derive(Debug, Clone)]
struct ElementData {
    document: DocumentId,
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    rect: Rect,
    scroll: Point,
}

#[derive(Debug, Clone)]
struct DocumentData {
    root: ElementId,
    head: ElementId,
    body: ElementId,
    frames: Vec<DocumentId>,
    frame_offset: Point,
    active: Option<ElementId>,
}

/// In-memory DOM with one top document and any number of frame documents.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: BTreeMap<ElementId, ElementData>,
    documents: BTreeMap<DocumentId, DocumentData>,
    listeners: BTreeSet<ElementId>,
    pending_frames: BTreeSet<FrameToken>,
    next_element: u64,
    next_document: u64,
    next_frame: u64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// A DOM holding an empty top document.
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            elements: BTreeMap::new(),
            documents: BTreeMap::new(),
            listeners: BTreeSet::new(),
            pending_frames: BTreeSet::new(),
            next_element: 0,
            next_document: 0,
            next_frame: 0,
        };
        dom.new_document(Point::ORIGIN);
        dom
    }

    /// Add a same-origin frame inside `parent`'s body whose viewport sits
    /// at `frame_rect` in `parent` coordinates.
    pub fn add_frame_document(&mut self, parent: DocumentId, frame_rect: Rect) -> DocumentId {
        let body = self.body(parent);
        let frame = self.create_element(parent, "iframe");
        self.append_child(body, frame);
        self.set_rect(frame, frame_rect);
        let offset = self.frame_offset(parent).offset_by(frame_rect.origin());
        let document = self.new_document(offset);
        if let Some(data) = self.documents.get_mut(&parent) {
            data.frames.push(document);
        }
        document
    }

    /// Create `tag` and append it to `parent`.
    pub fn append_new(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let document = self.document_of(parent);
        let element = self.create_element(document, tag);
        self.append_child(parent, element);
        element
    }

    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.rect = rect;
        }
    }

    pub fn set_scroll(&mut self, element: ElementId, scroll: Point) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.scroll = scroll;
        }
    }

    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.elements.get(&element).map(|e| e.tag.as_str())
    }

    #[must_use]
    pub fn text(&self, element: ElementId) -> Option<&str> {
        self.elements.get(&element).map(|e| e.text.as_str())
    }

    #[must_use]
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.elements
            .get(&element)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    #[must_use]
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    #[must_use]
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.elements
            .get(&element)
            .map_or(&[][..], |e| e.children.as_slice())
    }

    #[must_use]
    pub fn has_drop_listeners(&self, root: ElementId) -> bool {
        self.listeners.contains(&root)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Animation frames requested and not yet run.
    #[must_use]
    pub fn pending_frames(&self) -> Vec<FrameToken> {
        self.pending_frames.iter().copied().collect()
    }

    /// Mark `token` as delivered. Returns false if it was not pending.
    pub fn run_frame(&mut self, token: FrameToken) -> bool {
        self.pending_frames.remove(&token)
    }

    /// Connected elements carrying `class`, across every document.
    #[must_use]
    pub fn connected_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(id, e)| e.classes.iter().any(|c| c == class) && self.is_connected(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn new_document(&mut self, frame_offset: Point) -> DocumentId {
        let document = DocumentId(self.next_document);
        self.next_document += 1;
        let root = self.alloc(document, "html");
        let head = self.alloc(document, "head");
        let body = self.alloc(document, "body");
        self.link(root, head);
        self.link(root, body);
        self.documents.insert(
            document,
            DocumentData {
                root,
                head,
                body,
                frames: Vec::new(),
                frame_offset,
                active: None,
            },
        );
        document
    }

    fn alloc(&mut self, document: DocumentId, tag: &str) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(
            id,
            ElementData {
                document,
                tag: tag.to_ascii_lowercase(),
                parent: None,
                children: Vec::new(),
                attributes: BTreeMap::new(),
                classes: Vec::new(),
                style: BTreeMap::new(),
                text: String::new(),
                rect: Rect::default(),
                scroll: Point::ORIGIN,
            },
        );
        id
    }

    fn link(&mut self, parent: ElementId, child: ElementId) {
        if let Some(data) = self.elements.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.elements.get_mut(&parent) {
            data.children.push(child);
        }
    }

    fn matches(&self, element: ElementId, parts: &[Simple]) -> bool {
        let Some(data) = self.elements.get(&element) else {
            return false;
        };
        parts.iter().all(|part| match part {
            Simple::Tag(tag) => data.tag.eq_ignore_ascii_case(tag),
            Simple::Class(class) => data.classes.iter().any(|c| c == class),
            Simple::Id(id) => data.attributes.get("id") == Some(id),
            Simple::Attr(name, None) => data.attributes.contains_key(name),
            Simple::Attr(name, Some(value)) => data.attributes.get(name) == Some(value),
        })
    }

    fn descendants(&self, scope: ElementId, out: &mut Vec<ElementId>) {
        for &child in self.children(scope) {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn select(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let candidates = if selector.child_only {
            self.children(scope).to_vec()
        } else {
            let mut all = Vec::new();
            self.descendants(scope, &mut all);
            all
        };
        candidates
            .into_iter()
            .filter(|&e| self.matches(e, &selector.parts))
            .collect()
    }
}

impl DomHost for MemoryDom {
    fn top_document(&self) -> DocumentId {
        DocumentId(0)
    }

    fn sub_documents(&self, document: DocumentId) -> Vec<DocumentId> {
        self.documents
            .get(&document)
            .map(|d| d.frames.clone())
            .unwrap_or_default()
    }

    fn frame_offset(&self, document: DocumentId) -> Point {
        self.documents
            .get(&document)
            .map_or(Point::ORIGIN, |d| d.frame_offset)
    }

    fn document_of(&self, element: ElementId) -> DocumentId {
        self.elements
            .get(&element)
            .map_or(self.top_document(), |e| e.document)
    }

    fn document_element(&self, document: DocumentId) -> ElementId {
        self.documents.get(&document).map_or(ElementId(0), |d| d.root)
    }

    fn head(&self, document: DocumentId) -> ElementId {
        self.documents.get(&document).map_or(ElementId(1), |d| d.head)
    }

    fn body(&self, document: DocumentId) -> ElementId {
        self.documents.get(&document).map_or(ElementId(2), |d| d.body)
    }

    fn query(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.select(scope, selector).into_iter().next()
    }

    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        self.select(scope, selector)
    }

    fn element_by_id(&self, document: DocumentId, id: &str) -> Option<ElementId> {
        let root = self.document_element(document);
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        all.into_iter().find(|e| {
            self.elements
                .get(e)
                .is_some_and(|d| d.attributes.get("id").is_some_and(|v| v == id))
        })
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.elements.get(&element).map(|e| e.rect).unwrap_or_default()
    }

    fn scroll_offset(&self, element: ElementId) -> Point {
        self.elements
            .get(&element)
            .map_or(Point::ORIGIN, |e| e.scroll)
    }

    fn computed_position(&self, element: ElementId) -> String {
        self.style(element, "position").unwrap_or("static").to_string()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.elements
            .get(&element)
            .and_then(|e| e.attributes.get(name))
            .cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.attributes.remove(name);
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.elements.get_mut(&element)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.classes.retain(|c| c != class);
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.text = text.to_string();
        }
    }

    fn create_element(&mut self, document: DocumentId, tag: &str) -> ElementId {
        self.alloc(document, tag)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.elements.contains_key(&parent) || self.contains(child, parent) {
            return;
        }
        self.remove(child);
        self.link(parent, child);
    }

    fn remove(&mut self, element: ElementId) {
        let Some(parent) = self.elements.get_mut(&element).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(data) = self.elements.get_mut(&parent) {
            data.children.retain(|&c| c != element);
        }
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let Some(data) = self.elements.get(&element) else {
            return false;
        };
        let root = self.document_element(data.document);
        let mut current = Some(element);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    fn active_element(&self, document: DocumentId) -> Option<ElementId> {
        self.documents
            .get(&document)
            .and_then(|d| d.active)
            .filter(|&e| self.is_connected(e))
    }

    fn focus(&mut self, element: ElementId) {
        let document = self.document_of(element);
        if let Some(data) = self.documents.get_mut(&document) {
            data.active = Some(element);
        }
    }

    fn attach_drop_listeners(&mut self, root: ElementId) {
        self.listeners.insert(root);
    }

    fn detach_drop_listeners(&mut self, root: ElementId) {
        self.listeners.remove(&root);
    }

    fn request_animation_frame(&mut self) -> FrameToken {
        self.next_frame += 1;
        let token = FrameToken(self.next_frame);
        self.pending_frames.insert(token);
        token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Tag(String),
    Class(String),
    Id(String),
    Attr(String, Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    child_only: bool,
    parts: Vec<Simple>,
}

impl Selector {
    fn parse(input: &str) -> Option<Self> {
        let mut rest = input.trim();
        let mut child_only = false;
        if let Some(after) = rest.strip_prefix(":scope") {
            rest = after.trim_start().strip_prefix('>')?.trim_start();
            child_only = true;
        }
        if rest.is_empty() || rest.contains([',', ' ', '>']) {
            return None;
        }

        let mut parts = Vec::new();
        let mut chars = rest.char_indices().peekable();
        while let Some(&(start, c)) = chars.peek() {
            match c {
                '.' | '#' => {
                    chars.next();
                    let name = take_ident(rest, &mut chars);
                    if name.is_empty() {
                        return None;
                    }
                    parts.push(if c == '.' {
                        Simple::Class(name.to_string())
                    } else {
                        Simple::Id(name.to_string())
                    });
                }
                '[' => {
                    let end = rest[start..].find(']')? + start;
                    let inner = &rest[start + 1..end];
                    parts.push(parse_attr(inner)?);
                    while chars.peek().is_some_and(|&(i, _)| i <= end) {
                        chars.next();
                    }
                }
                c if is_ident_char(c) && parts.is_empty() => {
                    let name = take_ident(rest, &mut chars);
                    parts.push(Simple::Tag(name.to_string()));
                }
                _ => return None,
            }
        }
        Some(Self { child_only, parts })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident<'s>(
    source: &'s str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'s>>,
) -> &'s str {
    let Some(&(start, _)) = chars.peek() else {
        return "";
    };
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &source[start..end]
}

fn parse_attr(inner: &str) -> Option<Simple> {
    match inner.split_once('=') {
        None => {
            let name = inner.trim();
            (!name.is_empty() && name.chars().all(is_ident_char))
                .then(|| Simple::Attr(name.to_string(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (!name.is_empty()).then(|| Simple::Attr(name.to_string(), Some(value.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parsing() {
        assert_eq!(
            Selector::parse(":scope > [data-block]"),
            Some(Selector {
                child_only: true,
                parts: vec![Simple::Attr("data-block".into(), None)],
            })
        );
        assert_eq!(
            Selector::parse("div.a#b[role=\"x\"]").map(|s| s.parts),
            Some(vec![
                Simple::Tag("div".into()),
                Simple::Class("a".into()),
                Simple::Id("b".into()),
                Simple::Attr("role".into(), Some("x".into())),
            ])
        );
        assert_eq!(Selector::parse("a, b"), None);
        assert_eq!(Selector::parse(".a .b"), None);
        assert_eq!(Selector::parse(""), None);
    }

    #[test]
    fn child_only_query_skips_grandchildren() {
        let mut dom = MemoryDom::new();
        let body = dom.body(dom.top_document());
        let root = dom.append_new(body, "div");
        let a = dom.append_new(root, "div");
        dom.set_attribute(a, "data-block", "n1");
        let nested = dom.append_new(a, "div");
        dom.set_attribute(nested, "data-block", "n2");

        assert_eq!(dom.query_all(root, ":scope > [data-block]"), vec![a]);
        assert_eq!(dom.query_all(root, "[data-block]"), vec![a, nested]);
    }

    #[test]
    fn removal_disconnects_subtree() {
        let mut dom = MemoryDom::new();
        let body = dom.body(dom.top_document());
        let outer = dom.append_new(body, "section");
        let inner = dom.append_new(outer, "p");
        assert!(dom.is_connected(inner));
        dom.remove(outer);
        assert!(!dom.is_connected(inner));
        assert!(dom.contains(outer, inner));
        dom.remove(outer);
    }

    #[test]
    fn frame_offsets_accumulate() {
        let mut dom = MemoryDom::new();
        let top = dom.top_document();
        let frame = dom.add_frame_document(top, Rect::new(100.0, 50.0, 800.0, 600.0));
        let nested = dom.add_frame_document(frame, Rect::new(10.0, 10.0, 100.0, 100.0));
        assert_eq!(dom.sub_documents(top), vec![frame]);
        assert_eq!(dom.frame_offset(nested), Point::new(110.0, 60.0));
    }

    #[test]
    fn element_by_id_ignores_detached() {
        let mut dom = MemoryDom::new();
        let top = dom.top_document();
        let head = dom.head(top);
        let style = dom.append_new(head, "style");
        dom.set_attribute(style, "id", "s");
        assert_eq!(dom.element_by_id(top, "s"), Some(style));
        dom.remove(style);
        assert_eq!(dom.element_by_id(top, "s"), None);
    }
}
