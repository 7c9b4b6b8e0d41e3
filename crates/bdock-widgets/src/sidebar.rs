#![forbid(unsafe_code)]

//! The block library panel model.
//!
//! Holds the search query and the recently-used list, derives the sections
//! to render, and carries out item gestures: click inserts through the
//! insertion API directly, drag start produces the transfer payload.

use bdock_core::config::SidebarConfig;
use bdock_core::storage::KeyValueStorage;
use bdock_core::transfer::{TransferData, encode_block_name};
use bdock_editor::{Attributes, BlockInserter, EditorHost, InsertOptions, InsertOutcome};
use bdock_registry::{BlockDescriptor, BlockRegistry, CategoryId, IconKey};
use serde::Serialize;

use crate::recent::RecentlyUsed;

/// Section identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum SectionId {
    Recent,
    Category(CategoryId),
}

/// One rendered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    pub name: String,
    pub title: String,
    pub icon: IconKey,
}

impl From<&BlockDescriptor> for SidebarItem {
    fn from(descriptor: &BlockDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            title: descriptor.title.clone(),
            icon: descriptor.icon.clone(),
        }
    }
}

/// One rendered section (a heading plus its items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarSection {
    pub id: SectionId,
    pub label: String,
    pub items: Vec<SidebarItem>,
}

/// Sidebar state.
#[derive(Debug, Clone)]
pub struct SidebarModel {
    config: SidebarConfig,
    query: String,
    recent: RecentlyUsed,
}

impl SidebarModel {
    #[must_use]
    pub fn new(config: SidebarConfig) -> Self {
        let recent = RecentlyUsed::from_config(&config);
        Self {
            config,
            query: String::new(),
            recent,
        }
    }

    /// Restore persisted state.
    pub fn load(&mut self, storage: &dyn KeyValueStorage) {
        self.recent.load(storage);
    }

    #[must_use]
    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    #[must_use]
    pub fn recent(&self) -> &RecentlyUsed {
        &self.recent
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        tracing::trace!(target: "bdock.sidebar", query = %self.query, "query changed");
    }

    /// Sections to render, in order.
    ///
    /// With an empty query the recently-used section comes first (when it
    /// has any enabled, known blocks), followed by every category with at
    /// least one match.
    #[must_use]
    pub fn sections(&self, registry: &BlockRegistry) -> Vec<SidebarSection> {
        let mut sections = Vec::new();
        if self.query.trim().is_empty() {
            let items: Vec<SidebarItem> = self
                .recent
                .names()
                .iter()
                .filter_map(|name| registry.get_by_name(name))
                .filter(|d| !d.disabled)
                .map(SidebarItem::from)
                .collect();
            if !items.is_empty() {
                sections.push(SidebarSection {
                    id: SectionId::Recent,
                    label: "Recently used".to_string(),
                    items,
                });
            }
        }
        for (category, blocks) in registry.search(&self.query) {
            let label = registry
                .categories()
                .iter()
                .find(|c| c.id == category)
                .map_or_else(|| category.as_str().to_string(), |c| c.label.clone());
            sections.push(SidebarSection {
                id: SectionId::Category(category),
                label,
                items: blocks.into_iter().map(SidebarItem::from).collect(),
            });
        }
        sections
    }

    /// Item names in render order, the order the grid navigator indexes.
    #[must_use]
    pub fn item_names(&self, registry: &BlockRegistry) -> Vec<String> {
        self.sections(registry)
            .into_iter()
            .flat_map(|s| s.items.into_iter().map(|i| i.name))
            .collect()
    }

    /// Click-to-insert at the host's default insertion point.
    ///
    /// Bypasses the drag state machine. A successful insert is recorded as
    /// recently used.
    pub fn click_insert<H: EditorHost>(
        &mut self,
        name: &str,
        inserter: &mut BlockInserter<'_, H>,
        storage: &mut dyn KeyValueStorage,
    ) -> InsertOutcome {
        let outcome = inserter.insert(name, Attributes::new(), InsertOptions::default());
        if outcome.success {
            self.recent.record(name, storage);
            tracing::debug!(target: "bdock.sidebar", block = name, "click insert");
        } else {
            tracing::debug!(target: "bdock.sidebar", block = name, error = ?outcome.error_code(), "click insert failed");
        }
        outcome
    }

    /// Transfer payload for a drag starting on item `name`.
    #[must_use]
    pub fn drag_payload(&self, name: &str) -> TransferData {
        encode_block_name(name)
    }

    /// Record a block inserted by drop.
    pub fn record_used(&mut self, name: &str, storage: &mut dyn KeyValueStorage) {
        self.recent.record(name, storage);
    }
}
