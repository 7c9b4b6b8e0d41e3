#![forbid(unsafe_code)]

//! Sidebar keyboard navigation against the live DOM.
//!
//! Items are re-queried under the container on every key event, so the
//! adapter never holds stale handles across re-renders.

use bdock_core::config::SidebarConfig;
use bdock_core::event::KeyEvent;
use bdock_widgets::GridNavigator;

use crate::dom::{DocumentId, DomHost, ElementId};

/// Binds a [`GridNavigator`] to the sidebar container.
#[derive(Debug, Clone)]
pub struct KeyboardAdapter {
    navigator: GridNavigator,
    container_selector: String,
    item_selector: String,
}

impl KeyboardAdapter {
    #[must_use]
    pub fn new(config: &SidebarConfig) -> Self {
        Self {
            navigator: GridNavigator::from_config(config),
            container_selector: config.container_selector.clone(),
            item_selector: config.item_selector.clone(),
        }
    }

    /// Current items, in document order.
    #[must_use]
    pub fn items<D: DomHost + ?Sized>(&self, dom: &D, document: DocumentId) -> Vec<ElementId> {
        dom.query(dom.document_element(document), &self.container_selector)
            .map(|container| dom.query_all(container, &self.item_selector))
            .unwrap_or_default()
    }

    /// Move focus for `key`. Returns the newly focused item, or `None` when
    /// the key was not handled (the host should let it through).
    pub fn handle_key<D: DomHost + ?Sized>(
        &self,
        dom: &mut D,
        document: DocumentId,
        key: &KeyEvent,
    ) -> Option<ElementId> {
        let items = self.items(&*dom, document);
        let focused = dom
            .active_element(document)
            .and_then(|active| items.iter().position(|&item| item == active));
        let target = self.navigator.handle_key(key, items.len(), focused)?;
        let element = *items.get(target)?;
        dom.focus(element);
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDom;
    use bdock_core::event::KeyCode;

    fn sidebar(dom: &mut MemoryDom, count: usize) -> Vec<ElementId> {
        let body = dom.body(dom.top_document());
        let container = dom.append_new(body, "div");
        dom.add_class(container, "bdock-sidebar__blocks");
        (0..count)
            .map(|i| {
                let item = dom.append_new(container, "button");
                dom.add_class(item, "bdock-sidebar__item");
                dom.set_attribute(item, "data-block-name", &format!("core/b{i}"));
                item
            })
            .collect()
    }

    #[test]
    fn arrow_down_moves_two_items() {
        let mut dom = MemoryDom::new();
        let items = sidebar(&mut dom, 5);
        let top = dom.top_document();
        dom.focus(items[1]);
        let adapter = KeyboardAdapter::new(&SidebarConfig::default());
        assert_eq!(adapter.handle_key(&mut dom, top, &KeyEvent::new(KeyCode::Down)), Some(items[3]));
        assert_eq!(dom.active_element(top), Some(items[3]));
    }

    #[test]
    fn no_focus_inside_list_is_noop() {
        let mut dom = MemoryDom::new();
        sidebar(&mut dom, 3);
        let top = dom.top_document();
        let adapter = KeyboardAdapter::new(&SidebarConfig::default());
        assert_eq!(adapter.handle_key(&mut dom, top, &KeyEvent::new(KeyCode::Down)), None);
        assert_eq!(dom.active_element(top), None);
    }

    #[test]
    fn missing_container_is_noop() {
        let mut dom = MemoryDom::new();
        let top = dom.top_document();
        let adapter = KeyboardAdapter::new(&SidebarConfig::default());
        assert_eq!(adapter.handle_key(&mut dom, top, &KeyEvent::new(KeyCode::End)), None);
    }
}
