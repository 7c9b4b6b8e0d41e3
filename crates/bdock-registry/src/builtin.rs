#![forbid(unsafe_code)]

//! Built-in category, block and preset tables.

use serde_json::json;

use crate::descriptor::{BlockDescriptor, CategoryDescriptor, NodeSpec, PresetDescriptor};
use crate::registry::Catalog;

pub(crate) fn catalog() -> Catalog {
    Catalog {
        categories: categories(),
        blocks: blocks(),
        presets: presets(),
    }
}

fn categories() -> Vec<CategoryDescriptor> {
    vec![
        CategoryDescriptor::new("layout", "Layout", "layout"),
        CategoryDescriptor::new("text", "Text", "text"),
        CategoryDescriptor::new("media", "Media", "media"),
        CategoryDescriptor::new("design", "Design", "design"),
        CategoryDescriptor::new("interactive", "Interactive", "interactive"),
    ]
}

fn blocks() -> Vec<BlockDescriptor> {
    vec![
        // layout
        BlockDescriptor::new("core/group", "Group", "group", "layout")
            .with_defaults(json!({"tagName": "div", "layout": {"type": "constrained"}})),
        BlockDescriptor::new("core/columns", "Columns", "columns", "layout")
            .with_defaults(json!({"isStackedOnMobile": true})),
        BlockDescriptor::new("core/column", "Column", "column", "layout"),
        BlockDescriptor::new("core/spacer", "Spacer", "spacer", "layout")
            .with_defaults(json!({"height": "32px"})),
        BlockDescriptor::new("core/divider", "Divider", "separator", "layout"),
        // text
        BlockDescriptor::new("core/heading", "Heading", "heading", "text")
            .with_defaults(json!({"level": 2, "content": ""})),
        BlockDescriptor::new("core/text", "Text", "paragraph", "text")
            .with_defaults(json!({"content": "", "dropCap": false})),
        BlockDescriptor::new("core/list", "List", "list", "text")
            .with_defaults(json!({"ordered": false})),
        BlockDescriptor::new("core/list-item", "List Item", "list-item", "text"),
        BlockDescriptor::new("core/quote", "Quote", "quote", "text"),
        BlockDescriptor::new("core/code", "Code", "code", "text"),
        // media
        BlockDescriptor::new("core/image", "Image", "image", "media")
            .with_defaults(json!({"url": "", "alt": "", "sizeSlug": "large"})),
        BlockDescriptor::new("core/gallery", "Gallery", "gallery", "media")
            .with_defaults(json!({"columns": 3})),
        BlockDescriptor::new("core/video", "Video", "video", "media"),
        BlockDescriptor::new("core/audio", "Audio", "audio", "media").disabled(),
        // design
        BlockDescriptor::new("core/buttons", "Buttons", "buttons", "design"),
        BlockDescriptor::new("core/button", "Button", "button", "design")
            .with_defaults(json!({"text": "", "url": "", "variant": "primary"})),
        BlockDescriptor::new("core/icon", "Icon", "star", "design")
            .with_defaults(json!({"icon": "star", "size": 24})),
        BlockDescriptor::new("core/card", "Card", "card", "design"),
        // interactive
        BlockDescriptor::new("core/accordion", "Accordion", "accordion", "interactive"),
        BlockDescriptor::new("core/tabs", "Tabs", "tabs", "interactive"),
        BlockDescriptor::new("core/countdown", "Countdown", "clock", "interactive").disabled(),
    ]
}

fn presets() -> Vec<PresetDescriptor> {
    vec![
        PresetDescriptor {
            id: "hero".to_string(),
            title: "Hero".to_string(),
            nodes: vec![NodeSpec::new("core/group")
                .with_attributes(json!({"align": "full"}))
                .with_children(vec![
                    NodeSpec::new("core/heading").with_attributes(json!({"level": 1})),
                    NodeSpec::new("core/text"),
                    NodeSpec::new("core/buttons")
                        .with_children(vec![NodeSpec::new("core/button")]),
                ])],
        },
        PresetDescriptor {
            id: "two-columns".to_string(),
            title: "Two Columns".to_string(),
            nodes: vec![NodeSpec::new("core/columns").with_children(vec![
                NodeSpec::new("core/column").with_children(vec![NodeSpec::new("core/text")]),
                NodeSpec::new("core/column").with_children(vec![NodeSpec::new("core/text")]),
            ])],
        },
        PresetDescriptor {
            id: "heading-and-text".to_string(),
            title: "Heading and Text".to_string(),
            nodes: vec![NodeSpec::new("core/heading"), NodeSpec::new("core/text")],
        },
    ]
}
