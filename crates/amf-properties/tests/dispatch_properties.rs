//! Boundary (spec.md §5 "dispatch_clients_to_resurrect"): with zero free
//! resurrect slots, every dispatch call on a stale handle returns
//! `BAD_HANDLE` without attempting resurrect; a healthy handle is
//! unaffected since it never needs a slot.

use amf_types::{AisError, HandleValue};
use imma_oi::handle::HandleState;
use imma_oi::{ControlBlock, HandleRecord};
use proptest::prelude::*;

proptest! {
    #[test]
    fn zero_slots_rejects_every_stale_handle(client_id in any::<u32>(), node_id in any::<u32>()) {
        let mut cb = ControlBlock::new(0);
        let handle = HandleValue::new(client_id, node_id);
        cb.register(HandleRecord::new(handle, false));
        cb.handles.get_mut(&handle).unwrap().state = HandleState::Stale;

        prop_assert_eq!(cb.dispatch_one(handle).unwrap_err(), AisError::BadHandle);
        // No slot was consumed by the rejected attempt.
        prop_assert_eq!(cb.resurrects_in_flight, 0);
    }

    #[test]
    fn healthy_or_exposed_handles_never_need_a_slot(
        client_id in any::<u32>(),
        node_id in any::<u32>(),
        exposed in any::<bool>(),
    ) {
        let mut cb = ControlBlock::new(0);
        let handle = HandleValue::new(client_id, node_id);
        cb.register(HandleRecord::new(handle, false));
        if exposed {
            cb.handles.get_mut(&handle).unwrap().state = HandleState::Exposed;
        }
        prop_assert!(cb.dispatch_one(handle).is_ok());
    }
}
