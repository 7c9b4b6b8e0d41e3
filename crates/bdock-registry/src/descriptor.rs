#![forbid(unsafe_code)]

//! Descriptor types. All of them are plain data and deserialize from the
//! catalog JSON format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute map of a content node (JSON object, insertion-ordered).
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Identifier of a sidebar category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Key into the host's icon set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconKey(String);

impl IconKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IconKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// One sidebar section. Declaration order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub id: CategoryId,
    pub label: String,
    pub icon: IconKey,
}

impl CategoryDescriptor {
    #[must_use]
    pub fn new(id: &str, label: &str, icon: &str) -> Self {
        Self {
            id: id.into(),
            label: label.to_string(),
            icon: icon.into(),
        }
    }
}

/// One insertable block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    /// Globally unique type id, e.g. `core/heading`.
    pub name: String,
    pub title: String,
    pub icon: IconKey,
    pub category: CategoryId,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub default_attributes: Attributes,
}

impl BlockDescriptor {
    #[must_use]
    pub fn new(name: &str, title: &str, icon: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            icon: icon.into(),
            category: category.into(),
            disabled: false,
            default_attributes: Attributes::new(),
        }
    }

    /// Attach default attributes (expects a JSON object; other values are
    /// ignored).
    #[must_use]
    pub fn with_defaults(mut self, defaults: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = defaults {
            self.default_attributes = map;
        }
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Case-insensitive substring match on the title.
    #[must_use]
    pub fn title_matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }
}

/// Template for one node of a preset, possibly with nested children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = attributes {
            self.attributes = map;
        }
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = children;
        self
    }

    /// This node plus all descendants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::node_count).sum::<usize>()
    }

    /// Visit this node and every descendant, depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NodeSpec)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// A named multi-node template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDescriptor {
    pub id: String,
    pub title: String,
    pub nodes: Vec<NodeSpec>,
}
