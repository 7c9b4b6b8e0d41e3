#![forbid(unsafe_code)]

//! Block library panel building blocks.
//!
//! Everything here is DOM-free: the sidebar model decides what to show and
//! what a gesture does, the grid navigator maps keys onto item indices, and
//! the recently-used list persists through the storage seam. `bdock-web`
//! binds them to a live document.

pub mod grid_nav;
pub mod recent;
pub mod sidebar;

pub use grid_nav::GridNavigator;
pub use recent::RecentlyUsed;
pub use sidebar::{SectionId, SidebarItem, SidebarModel, SidebarSection};
