#![forbid(unsafe_code)]

//! Deterministic drag-and-drop insertion engine.
//!
//! The host forwards browser drag lifecycle events; the engine keeps at most
//! one [`DragSession`] and answers every event with a [`DragDispatch`]
//! carrying the outcome and a structured log record. The engine enforces:
//! - a single live session (a second drag start is ignored),
//! - one target recomputation per animation frame,
//! - teardown of every feedback node on every terminal path, exactly once,
//! - stale frames (token no longer outstanding, or session gone) are no-ops.
//!
//! States: `Idle -> Dragging -> (Dropped | Cancelled | Aborted) -> Idle`.

use serde::Serialize;

use bdock_core::config::DragConfig;
use bdock_core::transfer::{TransferData, decode_block_name};
use bdock_editor::{Attributes, BlockInserter, EditorHost, InsertOptions, InsertionPoint, NodeId};

use crate::dom::{DocumentPoint, DomHost, ElementId, FrameToken, point_in_document};
use crate::drop_target::DropTargetDescriptor;
use crate::feedback::DragFeedback;
use crate::frame::{FrameRequest, FrameThrottle};
use crate::surface::{SurfaceBinder, SurfaceHandle};

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragPhase {
    DragStart,
    DragOver,
    AnimationFrame,
    DragLeave,
    Drop,
    DragEnd,
    Unmount,
}

/// Why an event was ignored without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragIgnoredReason {
    NoActiveSession,
    SessionAlreadyActive,
    StaleFrame,
    ChildBoundary,
    PayloadUnreadable,
}

/// Why a drop ended the session without inserting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragAbortReason {
    PayloadUnreadable,
    BlockNotRegistered,
    InsertFailed,
}

/// Why a session ended without a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DragCancelReason {
    DragEnd,
    LeftSurface,
    Unmounted,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DragOutcome {
    Started,
    FrameScheduled,
    Coalesced,
    Retargeted,
    Dropped { id: NodeId },
    Aborted(DragAbortReason),
    Cancelled(DragCancelReason),
    Ignored(DragIgnoredReason),
}

impl DragOutcome {
    /// Whether the dispatch ended the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Dropped { .. } | Self::Aborted(_) | Self::Cancelled(_))
    }
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragLogEntry {
    pub phase: DragPhase,
    pub session: Option<u64>,
    pub block: Option<String>,
    pub pointer: Option<DocumentPoint>,
    pub target: Option<InsertionPoint>,
    pub outcome: DragOutcome,
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragDispatch {
    pub outcome: DragOutcome,
    pub log: DragLogEntry,
}

impl DragDispatch {
    fn new(
        phase: DragPhase,
        outcome: DragOutcome,
        session: Option<&DragSession>,
        pointer: Option<DocumentPoint>,
        target: Option<InsertionPoint>,
    ) -> Self {
        let block = session.map(|s| s.block_name.clone());
        Self::record(phase, outcome, session, block, pointer, target)
    }

    fn record(
        phase: DragPhase,
        outcome: DragOutcome,
        session: Option<&DragSession>,
        block: Option<String>,
        pointer: Option<DocumentPoint>,
        target: Option<InsertionPoint>,
    ) -> Self {
        let dispatch = Self {
            outcome: outcome.clone(),
            log: DragLogEntry {
                phase,
                session: session.map(|s| s.id),
                block,
                pointer,
                target,
                outcome,
            },
        };
        dispatch.trace();
        dispatch
    }

    fn ignored(phase: DragPhase, reason: DragIgnoredReason, pointer: Option<DocumentPoint>) -> Self {
        Self::new(phase, DragOutcome::Ignored(reason), None, pointer, None)
    }

    fn trace(&self) {
        let log = &self.log;
        let index = log.target.as_ref().map(|t| t.index);
        let parent = log.target.as_ref().map(|t| t.parent.as_str());
        match &self.outcome {
            DragOutcome::FrameScheduled | DragOutcome::Coalesced | DragOutcome::Retargeted => {
                tracing::trace!(
                    target: "bdock.drag",
                    phase = ?log.phase,
                    session = ?log.session,
                    index = ?index,
                    parent = ?parent,
                    outcome = ?self.outcome,
                    "drag update"
                );
            }
            DragOutcome::Aborted(reason) => {
                tracing::warn!(
                    target: "bdock.drag",
                    phase = ?log.phase,
                    session = ?log.session,
                    block = ?log.block,
                    reason = ?reason,
                    "drop aborted"
                );
            }
            outcome => {
                tracing::debug!(
                    target: "bdock.drag",
                    phase = ?log.phase,
                    session = ?log.session,
                    block = ?log.block,
                    index = ?index,
                    parent = ?parent,
                    outcome = ?outcome,
                    "drag lifecycle"
                );
            }
        }
    }
}

/// State of the drag in progress.
#[derive(Debug, Clone)]
pub struct DragSession {
    id: u64,
    block_name: String,
    pointer: DocumentPoint,
    feedback: DragFeedback,
    frame: FrameThrottle,
    target: Option<DropTargetDescriptor>,
}

impl DragSession {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn block_name(&self) -> &str {
        &self.block_name
    }

    /// Last pointer position reported by the host.
    #[must_use]
    pub const fn pointer(&self) -> DocumentPoint {
        self.pointer
    }

    /// Target computed by the most recent frame.
    #[must_use]
    pub fn target(&self) -> Option<&DropTargetDescriptor> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn ghost(&self) -> Option<ElementId> {
        self.feedback.ghost()
    }

    #[must_use]
    pub fn drop_line(&self) -> Option<ElementId> {
        self.feedback.drop_line()
    }

    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.frame.pending()
    }

    fn target_point(&self) -> Option<InsertionPoint> {
        self.target
            .as_ref()
            .map(|t| InsertionPoint::new(t.index, t.parent.clone()))
    }
}

/// Drag-and-drop insertion engine for one editor instance.
#[derive(Debug, Clone)]
pub struct DragDropEngine {
    config: DragConfig,
    binder: SurfaceBinder,
    session: Option<DragSession>,
    next_session: u64,
}

impl Default for DragDropEngine {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl DragDropEngine {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            binder: SurfaceBinder::new(),
            session: None,
            next_session: 1,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Currently bound surface, without revalidation.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.binder.current()
    }

    /// Bind the surface eagerly.
    pub fn mount<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> Option<SurfaceHandle> {
        self.binder.ensure_bound(dom, &self.config)
    }

    /// Structural mutation observed in the top document: re-resolve and
    /// re-bind if the surface root was replaced.
    pub fn surface_mutated<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> Option<SurfaceHandle> {
        self.binder.ensure_bound(dom, &self.config)
    }

    /// A drag started on a library item.
    pub fn drag_start<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        data: &TransferData,
        at: DocumentPoint,
    ) -> DragDispatch {
        if self.session.is_some() {
            return DragDispatch::ignored(
                DragPhase::DragStart,
                DragIgnoredReason::SessionAlreadyActive,
                Some(at),
            );
        }
        let Ok(block_name) = decode_block_name(data) else {
            return DragDispatch::ignored(
                DragPhase::DragStart,
                DragIgnoredReason::PayloadUnreadable,
                Some(at),
            );
        };

        let mut feedback = DragFeedback::new();
        let top = dom.top_document();
        let ghost_at = point_in_document(&*dom, at, top);
        feedback.show_ghost(dom, &self.config, &block_name, ghost_at);
        self.binder.ensure_bound(dom, &self.config);

        let id = self.next_session;
        self.next_session += 1;
        let session = DragSession {
            id,
            block_name,
            pointer: at,
            feedback,
            frame: FrameThrottle::new(),
            target: None,
        };
        let dispatch = DragDispatch::new(
            DragPhase::DragStart,
            DragOutcome::Started,
            Some(&session),
            Some(at),
            None,
        );
        self.session = Some(session);
        dispatch
    }

    /// The pointer moved over a drop-capable region.
    pub fn drag_over<D: DomHost + ?Sized>(&mut self, dom: &mut D, at: DocumentPoint) -> DragDispatch {
        let Some(session) = self.session.as_mut() else {
            return DragDispatch::ignored(
                DragPhase::DragOver,
                DragIgnoredReason::NoActiveSession,
                Some(at),
            );
        };
        session.pointer = at;
        let outcome = match session.frame.push(dom, at) {
            FrameRequest::Scheduled(_) => DragOutcome::FrameScheduled,
            FrameRequest::Coalesced(_) => DragOutcome::Coalesced,
        };
        DragDispatch::new(
            DragPhase::DragOver,
            outcome,
            Some(&*session),
            Some(at),
            session.target_point(),
        )
    }

    /// An animation frame requested by this engine fired.
    pub fn animation_frame<D: DomHost + ?Sized>(&mut self, dom: &mut D, token: FrameToken) -> DragDispatch {
        let Some(session) = self.session.as_mut() else {
            return DragDispatch::ignored(DragPhase::AnimationFrame, DragIgnoredReason::StaleFrame, None);
        };
        let Some(at) = session.frame.take(token) else {
            return DragDispatch::ignored(DragPhase::AnimationFrame, DragIgnoredReason::StaleFrame, None);
        };

        let top = dom.top_document();
        let ghost_at = point_in_document(&*dom, at, top);
        session.feedback.move_ghost(dom, ghost_at);

        if let Some(surface) = self.binder.ensure_bound(dom, &self.config) {
            let pointer = point_in_document(&*dom, at, surface.document);
            let target = DropTargetDescriptor::compute(&*dom, &surface, pointer, &self.config);
            session.feedback.show_target(dom, &self.config, &surface, &target);
            session.target = Some(target);
        }
        DragDispatch::new(
            DragPhase::AnimationFrame,
            DragOutcome::Retargeted,
            Some(&*session),
            Some(at),
            session.target_point(),
        )
    }

    /// The pointer left an element of the surface. `related` is the element
    /// being entered, when the browser reports one.
    pub fn drag_leave<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        at: DocumentPoint,
        related: Option<ElementId>,
    ) -> DragDispatch {
        if self.session.is_none() {
            return DragDispatch::ignored(
                DragPhase::DragLeave,
                DragIgnoredReason::NoActiveSession,
                Some(at),
            );
        }
        if let Some(surface) = self.binder.current() {
            let into_child = related.is_some_and(|r| dom.contains(surface.root, r));
            let pointer = point_in_document(&*dom, at, surface.document);
            if into_child || dom.bounding_rect(surface.root).contains(pointer) {
                return DragDispatch::ignored(
                    DragPhase::DragLeave,
                    DragIgnoredReason::ChildBoundary,
                    Some(at),
                );
            }
        }
        self.terminate(dom, DragPhase::DragLeave, DragCancelReason::LeftSurface, Some(at))
    }

    /// The payload was dropped on the surface.
    ///
    /// The block name is read from the drop payload and the target is
    /// recomputed here, so a drop still lands after the session was
    /// cancelled by the pointer leaving and re-entering the surface.
    pub fn drop_at<D, H>(
        &mut self,
        dom: &mut D,
        data: &TransferData,
        at: DocumentPoint,
        inserter: &mut BlockInserter<'_, H>,
    ) -> DragDispatch
    where
        D: DomHost + ?Sized,
        H: EditorHost,
    {
        let finished = self.finish(dom);
        let Ok(block_name) = decode_block_name(data) else {
            let block = finished.as_ref().map(|s| s.block_name.clone());
            return Self::abort(finished.as_ref(), block, DragAbortReason::PayloadUnreadable, at);
        };
        if !inserter.is_registered(&block_name) {
            return Self::abort(finished.as_ref(), Some(block_name), DragAbortReason::BlockNotRegistered, at);
        }

        let descriptor = match self.binder.ensure_bound(dom, &self.config) {
            Some(surface) => {
                let pointer = point_in_document(&*dom, at, surface.document);
                Some(DropTargetDescriptor::compute(&*dom, &surface, pointer, &self.config))
            }
            None => finished.as_ref().and_then(|s| s.target.clone()),
        };
        let options = match &descriptor {
            Some(target) => {
                let point = target.insertion_point(inserter.host());
                InsertOptions::at(point.index, point.parent)
            }
            None => InsertOptions::default(),
        };
        let point = inserter.resolve_point(&options).ok();
        let outcome = inserter.insert(&block_name, Attributes::new(), options);

        let outcome = match (outcome.success, outcome.id) {
            (true, Some(id)) => DragOutcome::Dropped { id },
            _ => DragOutcome::Aborted(DragAbortReason::InsertFailed),
        };
        DragDispatch::record(
            DragPhase::Drop,
            outcome,
            finished.as_ref(),
            Some(block_name),
            Some(at),
            point,
        )
    }

    /// The drag ended without a drop on the surface.
    pub fn drag_end<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> DragDispatch {
        if self.session.is_none() {
            return DragDispatch::ignored(DragPhase::DragEnd, DragIgnoredReason::NoActiveSession, None);
        }
        self.terminate(dom, DragPhase::DragEnd, DragCancelReason::DragEnd, None)
    }

    /// Tear everything down: cancel any session and release the surface.
    pub fn unmount<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> DragDispatch {
        let dispatch = if self.session.is_some() {
            self.terminate(dom, DragPhase::Unmount, DragCancelReason::Unmounted, None)
        } else {
            DragDispatch::ignored(DragPhase::Unmount, DragIgnoredReason::NoActiveSession, None)
        };
        self.binder.unbind(dom, &self.config);
        dispatch
    }

    fn terminate<D: DomHost + ?Sized>(
        &mut self,
        dom: &mut D,
        phase: DragPhase,
        reason: DragCancelReason,
        at: Option<DocumentPoint>,
    ) -> DragDispatch {
        let finished = self.finish(dom);
        let target = finished.as_ref().and_then(DragSession::target_point);
        DragDispatch::new(phase, DragOutcome::Cancelled(reason), finished.as_ref(), at, target)
    }

    fn abort(
        finished: Option<&DragSession>,
        block: Option<String>,
        reason: DragAbortReason,
        at: DocumentPoint,
    ) -> DragDispatch {
        let target = finished.and_then(DragSession::target_point);
        DragDispatch::record(DragPhase::Drop, DragOutcome::Aborted(reason), finished, block, Some(at), target)
    }

    /// Take the session and tear down its feedback. An outstanding frame is
    /// left to fire and fail the token check.
    fn finish<D: DomHost + ?Sized>(&mut self, dom: &mut D) -> Option<DragSession> {
        let mut session = self.session.take()?;
        session.feedback.teardown(dom, &self.config);
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentId;
    use crate::memory_dom::MemoryDom;
    use bdock_core::geometry::Point;
    use bdock_core::transfer::encode_block_name;

    fn at(x: f64, y: f64) -> DocumentPoint {
        DocumentPoint::new(DocumentId(0), Point::new(x, y))
    }

    #[test]
    fn start_creates_ghost_without_surface() {
        let mut dom = MemoryDom::new();
        let mut engine = DragDropEngine::default();
        let dispatch = engine.drag_start(&mut dom, &encode_block_name("core/text"), at(10.0, 10.0));
        assert_eq!(dispatch.outcome, DragOutcome::Started);
        assert_eq!(dispatch.log.session, Some(1));
        let ghost = engine.session().and_then(DragSession::ghost).expect("ghost");
        assert!(dom.is_connected(ghost));
        assert_eq!(engine.surface(), None);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut dom = MemoryDom::new();
        let mut engine = DragDropEngine::default();
        engine.drag_start(&mut dom, &encode_block_name("core/text"), at(0.0, 0.0));
        let dispatch = engine.drag_start(&mut dom, &encode_block_name("core/image"), at(0.0, 0.0));
        assert_eq!(
            dispatch.outcome,
            DragOutcome::Ignored(DragIgnoredReason::SessionAlreadyActive)
        );
        assert_eq!(engine.session().map(DragSession::block_name), Some("core/text"));
    }

    #[test]
    fn unreadable_payload_never_starts() {
        let mut dom = MemoryDom::new();
        let mut engine = DragDropEngine::default();
        let dispatch = engine.drag_start(&mut dom, &TransferData::new(), at(0.0, 0.0));
        assert_eq!(dispatch.outcome, DragOutcome::Ignored(DragIgnoredReason::PayloadUnreadable));
        assert!(!engine.is_dragging());
        assert!(dom.connected_with_class("bdock-drag-ghost").is_empty());
    }

    #[test]
    fn moves_coalesce_into_one_frame() {
        let mut dom = MemoryDom::new();
        let mut engine = DragDropEngine::default();
        engine.drag_start(&mut dom, &encode_block_name("core/text"), at(0.0, 0.0));
        assert_eq!(engine.drag_over(&mut dom, at(1.0, 1.0)).outcome, DragOutcome::FrameScheduled);
        assert_eq!(engine.drag_over(&mut dom, at(2.0, 2.0)).outcome, DragOutcome::Coalesced);
        assert_eq!(dom.pending_frames().len(), 1);
    }

    #[test]
    fn drag_end_tears_down_and_is_idempotent() {
        let mut dom = MemoryDom::new();
        let mut engine = DragDropEngine::default();
        engine.drag_start(&mut dom, &encode_block_name("core/text"), at(0.0, 0.0));
        engine.drag_over(&mut dom, at(1.0, 1.0));
        let dispatch = engine.drag_end(&mut dom);
        assert_eq!(dispatch.outcome, DragOutcome::Cancelled(DragCancelReason::DragEnd));
        assert!(dispatch.outcome.is_terminal());
        assert!(dom.connected_with_class("bdock-drag-ghost").is_empty());
        for token in dom.pending_frames() {
            dom.run_frame(token);
            assert_eq!(
                engine.animation_frame(&mut dom, token).outcome,
                DragOutcome::Ignored(DragIgnoredReason::StaleFrame)
            );
        }
        assert_eq!(
            engine.drag_end(&mut dom).outcome,
            DragOutcome::Ignored(DragIgnoredReason::NoActiveSession)
        );
    }
}
