#![forbid(unsafe_code)]

//! bdock public facade.
//!
//! Re-exports the types most hosts need and provides [`Blockdock`], which
//! wires the block library sidebar, keyboard navigation and drag-and-drop
//! insertion to one editor.
//!
//! ```
//! use bdock::prelude::*;
//!
//! let registry = BlockRegistry::builtin();
//! let mut editor = MemoryEditor::for_registry(&registry);
//! let outcome = BlockInserter::new(&registry, &mut editor).insert(
//!     "core/heading",
//!     Attributes::new(),
//!     InsertOptions::default(),
//! );
//! assert!(outcome.success);
//! ```

use thiserror::Error;

pub mod blockdock;
pub mod loader;

pub use blockdock::Blockdock;
pub use loader::{Loader, MountReport};

// --- Core re-exports -------------------------------------------------------

pub use bdock_core::config::{BdockConfig, ConfigError, DragConfig, LoaderConfig, SidebarConfig};
pub use bdock_core::event::{KeyCode, KeyEvent, Modifiers};
pub use bdock_core::geometry::{Point, Rect};
pub use bdock_core::logging;
pub use bdock_core::storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use bdock_core::transfer::{TransferData, TransferError, decode_block_name, encode_block_name};

// --- Registry / editor re-exports ------------------------------------------

pub use bdock_editor::{
    Attributes, BlockInserter, BlockNode, BlockRequest, BlockTypeFilter, EditorHost, InsertError,
    InsertOptions, InsertOutcome, InsertionPoint, MemoryEditor, NodeFactory, NodeId, StateStore,
};
pub use bdock_registry::{BlockDescriptor, BlockRegistry, CategoryDescriptor, RegistryError};

// --- Sidebar / web re-exports ----------------------------------------------

pub use bdock_web::{
    DocumentId, DocumentPoint, DomHost, DragDispatch, DragDropEngine, DragOutcome, ElementId,
    FrameToken, MemoryDom,
};
pub use bdock_widgets::{GridNavigator, RecentlyUsed, SidebarModel, SidebarSection};

// --- Errors ---------------------------------------------------------------

/// Top-level error for setting up bdock.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Standard result type for bdock setup APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Attributes, BdockConfig, BlockInserter, BlockRegistry, Blockdock, DocumentPoint, DomHost,
        DragOutcome, Error, InsertOptions, InsertOutcome, KeyCode, KeyEvent, MemoryDom,
        MemoryEditor, MemoryStorage, NodeId, Point, Rect, Result, StateStore,
    };

    pub use crate::{core, editor, registry, web, widgets};
}

pub use bdock_core as core;
pub use bdock_editor as editor;
pub use bdock_registry as registry;
pub use bdock_web as web;
pub use bdock_widgets as widgets;
