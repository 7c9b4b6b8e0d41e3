#![forbid(unsafe_code)]

//! Registry construction, lookup and search.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::{BlockDescriptor, CategoryDescriptor, CategoryId, PresetDescriptor};

/// Search output: category → matching blocks, both in declaration order.
pub type SearchResults<'a> = IndexMap<CategoryId, Vec<&'a BlockDescriptor>>;

/// Catalog validation failure. Raised only while building a registry;
/// lookups never fail.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),
    #[error("duplicate block name: {0}")]
    DuplicateBlock(String),
    #[error("block {block} references unknown category {category}")]
    UnknownCategory { block: String, category: CategoryId },
    #[error("duplicate preset id: {0}")]
    DuplicatePreset(String),
    #[error("preset {preset} references unknown block {block}")]
    UnknownPresetBlock { preset: String, block: String },
    #[error("catalog JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized catalog: the input of [`BlockRegistry::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<CategoryDescriptor>,
    pub blocks: Vec<BlockDescriptor>,
    #[serde(default)]
    pub presets: Vec<PresetDescriptor>,
}

/// Immutable block catalog.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    categories: Vec<CategoryDescriptor>,
    blocks: Vec<BlockDescriptor>,
    presets: Vec<PresetDescriptor>,
    by_name: HashMap<String, usize>,
}

impl BlockRegistry {
    /// Validate and index a catalog.
    pub fn new(catalog: Catalog) -> Result<Self, RegistryError> {
        let Catalog {
            categories,
            blocks,
            presets,
        } = catalog;

        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.clone()) {
                return Err(RegistryError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut by_name = HashMap::with_capacity(blocks.len());
        for (idx, block) in blocks.iter().enumerate() {
            if !category_ids.contains(&block.category) {
                return Err(RegistryError::UnknownCategory {
                    block: block.name.clone(),
                    category: block.category.clone(),
                });
            }
            if by_name.insert(block.name.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateBlock(block.name.clone()));
            }
        }

        let mut preset_ids = HashSet::new();
        for preset in &presets {
            if !preset_ids.insert(preset.id.as_str()) {
                return Err(RegistryError::DuplicatePreset(preset.id.clone()));
            }
            let mut unknown = None;
            for node in &preset.nodes {
                node.walk(&mut |spec| {
                    if unknown.is_none() && !by_name.contains_key(&spec.name) {
                        unknown = Some(spec.name.clone());
                    }
                });
            }
            if let Some(block) = unknown {
                return Err(RegistryError::UnknownPresetBlock {
                    preset: preset.id.clone(),
                    block,
                });
            }
        }

        Ok(Self::assemble(categories, blocks, presets, by_name))
    }

    /// The built-in catalog shipped with bdock.
    #[must_use]
    pub fn builtin() -> Self {
        let Catalog {
            categories,
            blocks,
            presets,
        } = crate::builtin::catalog();
        let by_name = blocks
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.name.clone(), idx))
            .collect();
        Self::assemble(categories, blocks, presets, by_name)
    }

    fn assemble(
        categories: Vec<CategoryDescriptor>,
        blocks: Vec<BlockDescriptor>,
        presets: Vec<PresetDescriptor>,
        by_name: HashMap<String, usize>,
    ) -> Self {
        tracing::debug!(
            target: "bdock.registry",
            categories = categories.len(),
            blocks = blocks.len(),
            presets = presets.len(),
            "registry built"
        );
        Self {
            categories,
            blocks,
            presets,
            by_name,
        }
    }

    /// Parse a JSON catalog and build a registry from it.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        Self::new(catalog)
    }

    /// Categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    /// All blocks in declaration order, disabled ones included.
    #[must_use]
    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    /// All presets in declaration order.
    #[must_use]
    pub fn presets(&self) -> &[PresetDescriptor] {
        &self.presets
    }

    /// Look up a preset by id.
    #[must_use]
    pub fn preset(&self, id: &str) -> Option<&PresetDescriptor> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Look up a block by its type name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&BlockDescriptor> {
        self.by_name.get(name).map(|&idx| &self.blocks[idx])
    }

    /// Block type names in declaration order.
    #[must_use]
    pub fn list_names(&self, include_disabled: bool) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| include_disabled || !b.disabled)
            .map(|b| b.name.clone())
            .collect()
    }

    /// Case-insensitive substring search on titles.
    ///
    /// Disabled blocks never appear. Categories without a match are
    /// omitted. A blank query returns every enabled block. Category order
    /// and within-category declaration order are preserved.
    #[must_use]
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let needle = query.trim().to_lowercase();
        let mut results: SearchResults<'_> = IndexMap::new();
        for category in &self.categories {
            let hits: Vec<&BlockDescriptor> = self
                .blocks
                .iter()
                .filter(|b| b.category == category.id && !b.disabled)
                .filter(|b| needle.is_empty() || b.title_matches(&needle))
                .collect();
            if !hits.is_empty() {
                results.insert(category.id.clone(), hits);
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NodeSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn small_catalog() -> Catalog {
        Catalog {
            categories: vec![
                CategoryDescriptor::new("text", "Text", "text"),
                CategoryDescriptor::new("design", "Design", "layout"),
            ],
            blocks: vec![
                BlockDescriptor::new("core/button", "Button", "button", "design"),
                BlockDescriptor::new("core/text", "Text", "paragraph", "text")
                    .with_defaults(json!({"content": ""})),
                BlockDescriptor::new("core/heading", "Heading", "heading", "text"),
                BlockDescriptor::new("core/legacy", "Legacy Button", "button", "design")
                    .disabled(),
            ],
            presets: vec![],
        }
    }

    #[test]
    fn search_but_returns_only_button_under_its_category() {
        let registry = BlockRegistry::new(small_catalog()).unwrap();
        let results = registry.search("but");
        assert_eq!(results.len(), 1);
        let design = &results[&CategoryId::from("design")];
        assert_eq!(design.len(), 1);
        assert_eq!(design[0].name, "core/button");
    }

    #[test]
    fn search_is_case_insensitive() {
        let registry = BlockRegistry::new(small_catalog()).unwrap();
        let results = registry.search("HEAD");
        let names: Vec<_> = results.values().flatten().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["core/heading"]);
    }

    #[test]
    fn empty_query_preserves_category_and_declaration_order() {
        let registry = BlockRegistry::new(small_catalog()).unwrap();
        let results = registry.search("   ");
        let keys: Vec<_> = results.keys().map(CategoryId::as_str).collect();
        assert_eq!(keys, ["text", "design"]);
        let text: Vec<_> = results[&CategoryId::from("text")]
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(text, ["core/text", "core/heading"]);
    }

    #[test]
    fn list_names_respects_disabled_flag() {
        let registry = BlockRegistry::new(small_catalog()).unwrap();
        assert_eq!(registry.list_names(false).len(), 3);
        assert_eq!(registry.list_names(true).len(), 4);
        assert!(registry.get_by_name("core/legacy").is_some());
        assert!(registry.get_by_name("core/missing").is_none());
    }

    #[test]
    fn duplicate_block_is_rejected() {
        let mut catalog = small_catalog();
        catalog
            .blocks
            .push(BlockDescriptor::new("core/text", "Text again", "p", "text"));
        assert!(matches!(
            BlockRegistry::new(catalog),
            Err(RegistryError::DuplicateBlock(name)) if name == "core/text"
        ));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut catalog = small_catalog();
        catalog
            .blocks
            .push(BlockDescriptor::new("core/video", "Video", "video", "media"));
        assert!(matches!(
            BlockRegistry::new(catalog),
            Err(RegistryError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn preset_with_unknown_nested_block_is_rejected() {
        let mut catalog = small_catalog();
        catalog.presets.push(PresetDescriptor {
            id: "hero".to_string(),
            title: "Hero".to_string(),
            nodes: vec![NodeSpec::new("core/heading")
                .with_children(vec![NodeSpec::new("core/ghost")])],
        });
        match BlockRegistry::new(catalog) {
            Err(RegistryError::UnknownPresetBlock { preset, block }) => {
                assert_eq!(preset, "hero");
                assert_eq!(block, "core/ghost");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn json_catalog_loads() {
        let registry = BlockRegistry::from_json_str(
            r#"{
                "categories": [{"id": "text", "label": "Text", "icon": "text"}],
                "blocks": [{
                    "name": "core/text",
                    "title": "Text",
                    "icon": "paragraph",
                    "category": "text",
                    "defaultAttributes": {"align": "left"}
                }]
            }"#,
        )
        .unwrap();
        let text = registry.get_by_name("core/text").unwrap();
        assert_eq!(text.default_attributes["align"], json!("left"));
        assert!(!text.disabled);
        assert!(registry.presets().is_empty());
    }
}
