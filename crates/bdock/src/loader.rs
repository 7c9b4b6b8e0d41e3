#![forbid(unsafe_code)]

//! Host integration performed when the sidebar mounts.
//!
//! Mounting hides the host's native inserter with an injected style,
//! restricts the host to the enabled registry blocks and binds the editing
//! surface. Unmounting reverses all three and cancels any drag in flight.

use bdock_core::config::LoaderConfig;
use bdock_editor::BlockTypeFilter;
use bdock_registry::BlockRegistry;
use bdock_web::{DomHost, DragDispatch, DragDropEngine, SurfaceHandle};

/// What [`Loader::mount`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountReport {
    /// Whether the hide style was newly injected.
    pub style_injected: bool,
    /// Number of block types the host is restricted to.
    pub allowed_types: usize,
    /// Surface bound eagerly, if one was found.
    pub surface: Option<SurfaceHandle>,
}

/// Mount / unmount glue.
#[derive(Debug, Clone)]
pub struct Loader {
    config: LoaderConfig,
    mounted: bool,
}

impl Loader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            mounted: false,
        }
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount<D, H>(
        &mut self,
        dom: &mut D,
        host: &mut H,
        registry: &BlockRegistry,
        engine: &mut DragDropEngine,
    ) -> MountReport
    where
        D: DomHost + ?Sized,
        H: BlockTypeFilter + ?Sized,
    {
        let style_injected = self.hide_native_inserter(dom);
        let allowed = registry.list_names(false);
        let allowed_types = allowed.len();
        host.set_allowed_block_types(Some(allowed));
        let surface = engine.mount(dom);
        self.mounted = true;
        tracing::debug!(
            target: "bdock.loader",
            style_injected,
            allowed_types,
            surface_found = surface.is_some(),
            "mounted"
        );
        MountReport {
            style_injected,
            allowed_types,
            surface,
        }
    }

    pub fn unmount<D, H>(&mut self, dom: &mut D, host: &mut H, engine: &mut DragDropEngine) -> DragDispatch
    where
        D: DomHost + ?Sized,
        H: BlockTypeFilter + ?Sized,
    {
        let top = dom.top_document();
        if let Some(style) = dom.element_by_id(top, &self.config.hide_style_id) {
            dom.remove(style);
        }
        host.set_allowed_block_types(None);
        let dispatch = engine.unmount(dom);
        self.mounted = false;
        tracing::debug!(target: "bdock.loader", outcome = ?dispatch.outcome, "unmounted");
        dispatch
    }

    fn hide_native_inserter<D: DomHost + ?Sized>(&self, dom: &mut D) -> bool {
        let top = dom.top_document();
        if dom.element_by_id(top, &self.config.hide_style_id).is_some() {
            return false;
        }
        let style = dom.create_element(top, "style");
        dom.set_attribute(style, "id", &self.config.hide_style_id);
        dom.set_text(
            style,
            &format!("{}{{display:none!important}}", self.config.native_inserter_selector),
        );
        let head = dom.head(top);
        dom.append_child(head, style);
        true
    }
}
