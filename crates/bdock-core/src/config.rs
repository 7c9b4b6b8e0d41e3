#![forbid(unsafe_code)]

//! Configuration for the sidebar, the drag engine and the loader.
//!
//! Every field has a default, so `BdockConfig::default()` is a working
//! configuration for a stock host. Partial documents are accepted:
//!
//! ```toml
//! [sidebar]
//! wrap = false
//!
//! [drag]
//! canvas_selector = ".my-canvas"
//! ```
//!
//! ```
//! use bdock_core::config::BdockConfig;
//! let cfg = BdockConfig::from_toml_str("[sidebar]\nwrap = false\n").unwrap();
//! assert!(!cfg.sidebar.wrap);
//! assert_eq!(cfg.sidebar.columns, 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BdockConfig {
    /// Block library panel.
    pub sidebar: SidebarConfig,
    /// Drag-and-drop engine and editing surface discovery.
    pub drag: DragConfig,
    /// Host integration performed on mount.
    pub loader: LoaderConfig,
}

/// Block library panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Grid columns used by arrow-key navigation.
    pub columns: usize,
    /// Whether arrow-key navigation wraps around at both ends.
    pub wrap: bool,
    /// Maximum entries in the recently-used list.
    pub recent_limit: usize,
    /// Storage key of the recently-used list.
    pub recent_storage_key: String,
    /// Selector of the scrollable container holding the items.
    pub container_selector: String,
    /// Selector matching one focusable item inside the container.
    pub item_selector: String,
    /// Attribute carrying an item's block-type name.
    pub item_name_attribute: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            wrap: true,
            recent_limit: 5,
            recent_storage_key: "bdock.recentBlocks".to_string(),
            container_selector: ".bdock-sidebar__blocks".to_string(),
            item_selector: ".bdock-sidebar__item".to_string(),
            item_name_attribute: "data-block-name".to_string(),
        }
    }
}

/// Drag engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Selector of the editing surface root, searched in the top document
    /// and in every same-origin sub-document.
    pub canvas_selector: String,
    /// Selector (relative to the surface root) of top-level block wrappers.
    pub block_selector: String,
    /// Attribute carrying a wrapper's node id.
    pub node_id_attribute: String,
    /// Marker attribute set on roots whose listeners are bound.
    pub bound_marker_attribute: String,
    /// Element id of the injected feedback stylesheet.
    pub stylesheet_id: String,
    /// Class of the drag preview element.
    pub ghost_class: String,
    /// Class of the drop-line indicator element.
    pub drop_line_class: String,
    /// Class applied to the wrapper currently targeted.
    pub drop_target_class: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            canvas_selector: ".editor-styles-wrapper".to_string(),
            block_selector: ":scope > [data-block]".to_string(),
            node_id_attribute: "data-block".to_string(),
            bound_marker_attribute: "data-bdock-bound".to_string(),
            stylesheet_id: "bdock-drag-feedback".to_string(),
            ghost_class: "bdock-drag-ghost".to_string(),
            drop_line_class: "bdock-drop-line".to_string(),
            drop_target_class: "is-bdock-drop-target".to_string(),
        }
    }
}

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Selector of the host's native inserter UI, hidden while mounted.
    pub native_inserter_selector: String,
    /// Element id of the injected style that hides it.
    pub hide_style_id: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            native_inserter_selector: ".block-editor-inserter__toggle".to_string(),
            hide_style_id: "bdock-hide-native-inserter".to_string(),
        }
    }
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl BdockConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load a TOML (`.toml`) or JSON (anything else) file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sidebar.columns == 0 {
            errors.push("sidebar.columns must be > 0".to_string());
        }
        if self.sidebar.recent_limit == 0 {
            errors.push("sidebar.recent_limit must be > 0".to_string());
        }

        let required = [
            ("sidebar.recent_storage_key", &self.sidebar.recent_storage_key),
            ("sidebar.container_selector", &self.sidebar.container_selector),
            ("sidebar.item_selector", &self.sidebar.item_selector),
            ("sidebar.item_name_attribute", &self.sidebar.item_name_attribute),
            ("drag.canvas_selector", &self.drag.canvas_selector),
            ("drag.block_selector", &self.drag.block_selector),
            ("drag.node_id_attribute", &self.drag.node_id_attribute),
            ("drag.bound_marker_attribute", &self.drag.bound_marker_attribute),
            ("drag.stylesheet_id", &self.drag.stylesheet_id),
            ("drag.ghost_class", &self.drag.ghost_class),
            ("drag.drop_line_class", &self.drag.drop_line_class),
            ("drag.drop_target_class", &self.drag.drop_target_class),
            ("loader.native_inserter_selector", &self.loader.native_inserter_selector),
            ("loader.hide_style_id", &self.loader.hide_style_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_valid() {
        assert!(BdockConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = BdockConfig::from_toml_str(
            r#"
            [drag]
            canvas_selector = ".canvas"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.drag.canvas_selector, ".canvas");
        assert_eq!(cfg.drag.node_id_attribute, "data-block");
        assert_eq!(cfg.sidebar, SidebarConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let cfg = BdockConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(BdockConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn validation_collects_every_problem() {
        let err = BdockConfig::from_toml_str(
            r#"
            [sidebar]
            columns = 0
            recent_limit = 0

            [drag]
            stylesheet_id = " "
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[2].contains("drag.stylesheet_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            BdockConfig::from_toml_str("[sidebar"),
            Err(ConfigError::Toml(_))
        ));
    }
}
