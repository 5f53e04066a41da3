//! Per-peer message ordering (spec.md §6 "msg_id").
//!
//! Each directed peer relationship (one director talking to one node
//! director) carries a strictly monotonic `msg_id` counter. A gap is
//! fatal: the receiver cannot tell whether it missed a state-changing
//! message, so it tears down and resyncs rather than guess.

use amf_types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MsgId(pub u64);

impl MsgId {
    pub const ZERO: MsgId = MsgId(0);

    pub fn next(self) -> MsgId {
        MsgId(self.0 + 1)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MsgIdError {
    #[error("msg_id gap from peer {peer:?}: expected {expected:?}, got {got:?}")]
    Gap { peer: NodeId, expected: MsgId, got: MsgId },
    #[error("duplicate or stale msg_id from peer {peer:?}: expected {expected:?}, got {got:?}")]
    Stale { peer: NodeId, expected: MsgId, got: MsgId },
}

/// Tracks the next expected `msg_id` per sender.
#[derive(Debug, Clone, Default)]
pub struct MsgIdTracker {
    expected: HashMap<NodeId, MsgId>,
}

impl MsgIdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates an incoming `msg_id` against the expected next value
    /// for `peer`, then advances it.
    pub fn accept(&mut self, peer: NodeId, incoming: MsgId) -> Result<(), MsgIdError> {
        let expected = self.expected.entry(peer).or_insert(MsgId::ZERO);
        if incoming < *expected {
            return Err(MsgIdError::Stale { peer, expected: *expected, got: incoming });
        }
        if incoming > *expected {
            return Err(MsgIdError::Gap { peer, expected: *expected, got: incoming });
        }
        *expected = expected.next();
        Ok(())
    }

    /// Reseeds the expected `msg_id` for `peer` (spec.md §6
    /// "CLIENT_HIGH"): issued once after a director role switch, so the
    /// first message from the newly active director isn't mistaken for
    /// a gap.
    pub fn reseed(&mut self, peer: NodeId, next_expected: MsgId) {
        self.expected.insert(peer, next_expected);
    }

    pub fn expected_for(&self, peer: NodeId) -> MsgId {
        self.expected.get(&peer).copied().unwrap_or(MsgId::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strictly_increasing_sequence() {
        let mut t = MsgIdTracker::new();
        let peer = NodeId::new(1);
        assert!(t.accept(peer, MsgId(0)).is_ok());
        assert!(t.accept(peer, MsgId(1)).is_ok());
        assert!(t.accept(peer, MsgId(2)).is_ok());
    }

    #[test]
    fn gap_is_fatal() {
        let mut t = MsgIdTracker::new();
        let peer = NodeId::new(1);
        t.accept(peer, MsgId(0)).unwrap();
        let err = t.accept(peer, MsgId(5)).unwrap_err();
        assert!(matches!(err, MsgIdError::Gap { .. }));
    }

    #[test]
    fn stale_resend_is_rejected_without_advancing() {
        let mut t = MsgIdTracker::new();
        let peer = NodeId::new(1);
        t.accept(peer, MsgId(0)).unwrap();
        t.accept(peer, MsgId(1)).unwrap();
        let err = t.accept(peer, MsgId(0)).unwrap_err();
        assert!(matches!(err, MsgIdError::Stale { .. }));
        assert_eq!(t.expected_for(peer), MsgId(2));
    }

    #[test]
    fn reseed_after_role_switch_avoids_false_gap() {
        let mut t = MsgIdTracker::new();
        let peer = NodeId::new(1);
        t.accept(peer, MsgId(0)).unwrap();
        t.reseed(peer, MsgId(100));
        assert!(t.accept(peer, MsgId(100)).is_ok());
    }
}
