//! Property 4 (spec.md §8): for every D<->ND session, the received
//! `msg_id` sequence is strictly `prev+1`; any other value is rejected.

use amf_protocol::{MsgId, MsgIdTracker};
use amf_types::NodeId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn strictly_increasing_sequence_always_accepted(len in 0u64..200) {
        let mut tracker = MsgIdTracker::new();
        let peer = NodeId::new(1);
        for i in 0..len {
            prop_assert!(tracker.accept(peer, MsgId(i)).is_ok());
        }
        prop_assert_eq!(tracker.expected_for(peer), MsgId(len));
    }

    #[test]
    fn any_skip_ahead_is_rejected_as_a_gap(skip in 2u64..50) {
        let mut tracker = MsgIdTracker::new();
        let peer = NodeId::new(1);
        tracker.accept(peer, MsgId(0)).unwrap();
        let err = tracker.accept(peer, MsgId(skip)).unwrap_err();
        prop_assert!(matches!(err, amf_protocol::MsgIdError::Gap { .. }));
    }

    #[test]
    fn any_replay_of_an_already_accepted_id_is_rejected_as_stale(n in 1u64..50) {
        let mut tracker = MsgIdTracker::new();
        let peer = NodeId::new(1);
        for i in 0..=n {
            tracker.accept(peer, MsgId(i)).unwrap();
        }
        let err = tracker.accept(peer, MsgId(n)).unwrap_err();
        prop_assert!(matches!(err, amf_protocol::MsgIdError::Stale { .. }));
    }
}
