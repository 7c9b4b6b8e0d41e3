#![forbid(unsafe_code)]

//! One sidebar wired to one editor.
//!
//! [`Blockdock`] owns the registry, the sidebar model, the keyboard adapter,
//! the drag engine and the loader, and routes host events between them. The
//! host keeps ownership of the DOM, the editor store and storage and passes
//! them in per call.

use bdock_core::config::BdockConfig;
use bdock_core::event::KeyEvent;
use bdock_core::storage::KeyValueStorage;
use bdock_core::transfer::{TransferData, decode_block_name};
use bdock_editor::{BlockInserter, BlockTypeFilter, EditorHost, InsertOutcome};
use bdock_registry::BlockRegistry;
use bdock_web::{
    DocumentPoint, DomHost, DragDispatch, DragDropEngine, DragOutcome, ElementId, FrameToken,
    KeyboardAdapter, SurfaceHandle,
};
use bdock_widgets::{SidebarModel, SidebarSection};

use crate::Result;
use crate::loader::{Loader, MountReport};

/// Sidebar, keyboard navigation and drag-and-drop for one editor.
#[derive(Debug, Clone)]
pub struct Blockdock {
    registry: BlockRegistry,
    sidebar: SidebarModel,
    keyboard: KeyboardAdapter,
    engine: DragDropEngine,
    loader: Loader,
}

impl Blockdock {
    /// Build from a validated configuration.
    pub fn new(config: BdockConfig, registry: BlockRegistry) -> Result<Self> {
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(bdock_core::config::ConfigError::Validation(problems).into());
        }
        Ok(Self {
            registry,
            keyboard: KeyboardAdapter::new(&config.sidebar),
            sidebar: SidebarModel::new(config.sidebar),
            engine: DragDropEngine::new(config.drag),
            loader: Loader::new(config.loader),
        })
    }

    /// Default configuration and the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let config = BdockConfig::default();
        Self {
            registry: BlockRegistry::builtin(),
            keyboard: KeyboardAdapter::new(&config.sidebar),
            sidebar: SidebarModel::new(config.sidebar),
            engine: DragDropEngine::new(config.drag),
            loader: Loader::new(config.loader),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[must_use]
    pub fn sidebar(&self) -> &SidebarModel {
        &self.sidebar
    }

    #[must_use]
    pub fn engine(&self) -> &DragDropEngine {
        &self.engine
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.loader.is_mounted()
    }

    pub fn mount<D, H>(&mut self, dom: &mut D, host: &mut H, storage: &dyn KeyValueStorage) -> MountReport
    where
        D: DomHost + ?Sized,
        H: BlockTypeFilter + ?Sized,
    {
        self.sidebar.load(storage);
        self.loader.mount(dom, host, &self.registry, &mut self.engine)
    }

    pub fn unmount<D, H>(&mut self, dom: &mut D, host: &mut H) -> DragDispatch
    where
        D: DomHost + ?Sized,
        H: BlockTypeFilter + ?Sized,
    {
        self.loader.unmount(dom, host, &mut self.engine)
    }

    pub fn set_query(&mut self, query: &str) {
        self.sidebar.set_query(query);
    }

    #[must_use]
    pub fn sections(&self) -> Vec<SidebarSection> {
        self.sidebar.sections(&self.registry)
    }

    /// Click on a sidebar item.
    pub fn click_insert<H: EditorHost>(
        &mut self,
        name: &str,
        host: &mut H,
        storage: &mut dyn KeyValueStorage,
    ) -> InsertOutcome {
        let mut inserter = BlockInserter::new(&self.registry, host);
        self.sidebar.click_insert(name, &mut inserter, storage)
    }

    /// Payload the host writes into `dataTransfer` for a drag of `name`.
    #[must_use]
    pub fn drag_payload(&self, name: &str) -> TransferData {
        self.sidebar.drag_payload(name)
    }

    /// Drag start on a sidebar item.
    pub fn drag_start<D: DomHost + ?Sized>(&mut self, dom: &mut D, name: &str, at: DocumentPoint) -> DragDispatch {
        let payload = self.sidebar.drag_payload(name);
        self.engine.drag_start(dom, &payload, at)
    }

    pub fn drag_over<D: DomHost + ?Sized>(&mut self, dom: &mut D, at: DocumentPoint) -> DragDispatch {
        self.engine.drag_over(dom, at)
    }

    pub fn animation_frame<D: DomHost + ?Sized>(&mut self, dom: &mut D, token: FrameToken) -> DragDispatch {
        self.engine.animation_frame(dom, token)
    }

    pub fn drag_leave<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        at: DocumentPoint,
        related: Option<ElementId>,
    ) -> DragDispatch {
        self.engine.drag_leave(dom, at, related)
    }

    /// Drop on the surface. A successful drop counts as a use of the block.
    pub fn drop_at<D, H>(
        &mut self,
        dom: &mut D,
        data: &TransferData,
        at: DocumentPoint,
        host: &mut H,
        storage: &mut dyn KeyValueStorage,
    ) -> DragDispatch
    where
        D: DomHost + ?Sized,
        H: EditorHost,
    {
        let mut inserter = BlockInserter::new(&self.registry, host);
        let dispatch = self.engine.drop_at(dom, data, at, &mut inserter);
        if matches!(dispatch.outcome, DragOutcome::Dropped { .. })
            && let Ok(name) = decode_block_name(data)
        {
            self.sidebar.record_used(&name, storage);
        }
        dispatch
    }

    pub fn drag_end<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> DragDispatch {
        self.engine.drag_end(dom)
    }

    /// Structural mutation observed in the top document.
    pub fn surface_mutated<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> Option<SurfaceHandle> {
        self.engine.surface_mutated(dom)
    }

    /// Keydown inside the sidebar. Returns the newly focused item.
    pub fn handle_key<D: DomHost + ?Sized>(&self, dom: &mut D, key: &KeyEvent) -> Option<ElementId> {
        let top = dom.top_document();
        self.keyboard.handle_key(dom, top, key)
    }
}
