#![forbid(unsafe_code)]

//! Animation-frame throttling for pointer moves.
//!
//! Moves are coalesced "latest wins": at most one frame is outstanding and
//! it processes only the most recent position. A frame whose token is not
//! the outstanding one is stale and yields nothing.

use crate::dom::{DocumentPoint, DomHost, FrameToken};

/// What [`FrameThrottle::push`] did with a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// A new frame was requested.
    Scheduled(FrameToken),
    /// A frame was already outstanding; the move replaced the pending one.
    Coalesced(FrameToken),
}

/// One-frame-at-a-time move coalescer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameThrottle {
    pending: Option<FrameToken>,
    latest: Option<DocumentPoint>,
}

impl FrameThrottle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Record a move and request a frame if none is outstanding.
    pub fn push<D: DomHost + ?Sized>(&mut self, dom: &mut D, at: DocumentPoint) -> FrameRequest {
        self.latest = Some(at);
        match self.pending {
            Some(token) => FrameRequest::Coalesced(token),
            None => {
                let token = dom.request_animation_frame();
                self.pending = Some(token);
                FrameRequest::Scheduled(token)
            }
        }
    }

    /// Consume the outstanding frame. `None` when `token` is stale.
    pub fn take(&mut self, token: FrameToken) -> Option<DocumentPoint> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;
        self.latest.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentId;
    use crate::memory_dom::MemoryDom;
    use bdock_core::geometry::Point;

    fn at(y: f64) -> DocumentPoint {
        DocumentPoint::new(DocumentId(0), Point::new(0.0, y))
    }

    #[test]
    fn latest_move_wins() {
        let mut dom = MemoryDom::new();
        let mut throttle = FrameThrottle::new();
        let FrameRequest::Scheduled(token) = throttle.push(&mut dom, at(1.0)) else {
            panic!("first move schedules");
        };
        assert_eq!(throttle.push(&mut dom, at(2.0)), FrameRequest::Coalesced(token));
        assert_eq!(dom.pending_frames(), vec![token]);
        assert_eq!(throttle.take(token), Some(at(2.0)));
        assert_eq!(throttle.take(token), None);
    }

    #[test]
    fn foreign_token_is_stale() {
        let mut dom = MemoryDom::new();
        let mut old = FrameThrottle::new();
        let FrameRequest::Scheduled(stale) = old.push(&mut dom, at(1.0)) else {
            panic!("first move schedules");
        };
        let mut fresh = FrameThrottle::new();
        let FrameRequest::Scheduled(token) = fresh.push(&mut dom, at(2.0)) else {
            panic!("first move schedules");
        };
        assert_eq!(fresh.take(stale), None);
        assert_eq!(fresh.pending(), Some(token));
        assert_eq!(fresh.take(token), Some(at(2.0)));
    }
}
