#![forbid(unsafe_code)]

//! Host-driven DOM integration for bdock.
//!
//! Like a JS host driving a wasm module, the embedding environment
//! implements [`DomHost`] and forwards browser events here; nothing in this
//! crate touches browser objects directly. That keeps the drag engine
//! deterministic and testable against [`MemoryDom`].
//!
//! - [`surface`]: find and bind the (possibly cross-document) editing surface.
//! - [`drop_target`]: pointer position to insertion point.
//! - [`feedback`]: ghost, drop-line and highlight ownership.
//! - [`frame`]: one recomputation per animation frame.
//! - [`engine`]: the drag-and-drop state machine.
//! - [`keyboard`]: grid navigation over the rendered sidebar.

pub mod dom;
pub mod drop_target;
pub mod engine;
pub mod feedback;
pub mod frame;
pub mod keyboard;
pub mod memory_dom;
pub mod surface;

pub use dom::{DocumentId, DocumentPoint, DomHost, ElementId, FrameToken};
pub use drop_target::DropTargetDescriptor;
pub use engine::{
    DragAbortReason, DragCancelReason, DragDispatch, DragDropEngine, DragIgnoredReason,
    DragLogEntry, DragOutcome, DragPhase, DragSession,
};
pub use keyboard::KeyboardAdapter;
pub use memory_dom::MemoryDom;
pub use surface::{SurfaceBinder, SurfaceHandle, SurfaceResolution};
