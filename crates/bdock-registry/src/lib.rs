#![forbid(unsafe_code)]

//! Block registry: the static catalog behind the block library.
//!
//! The registry is built once (from the built-in tables or a JSON catalog)
//! and never mutated afterwards. Lookups are pure: an unknown name yields
//! `None`, a query with no matches yields an empty map.
//!
//! ```
//! use bdock_registry::BlockRegistry;
//!
//! let registry = BlockRegistry::builtin();
//! let hits = registry.search("but");
//! let names: Vec<_> = hits.values().flatten().map(|b| b.name.as_str()).collect();
//! assert_eq!(names, ["core/buttons", "core/button"]);
//! ```

mod builtin;
mod descriptor;
mod registry;

pub use descriptor::{
    Attributes, BlockDescriptor, CategoryDescriptor, CategoryId, IconKey, NodeSpec,
    PresetDescriptor,
};
pub use registry::{BlockRegistry, Catalog, RegistryError, SearchResults};
