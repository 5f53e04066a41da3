//! Property 1 (spec.md §8): `(stale ∧ exposed) ⇒ any subsequent API call
//! on H returns BAD_HANDLE`. Modeled here as: once a handle record is
//! `Exposed`, `begin_resurrect` (the entry point every reactive use goes
//! through) always fails with `BadHandle`, regardless of how it got
//! there.

use amf_types::{AisError, HandleValue};
use imma_oi::{begin_resurrect, ControlBlock, HandleRecord, HandleState};
use proptest::prelude::*;

proptest! {
    #[test]
    fn exposed_handle_always_rejects_resurrect(
        client_id in any::<u32>(),
        node_id in any::<u32>(),
        reply_pending in 0u32..5,
    ) {
        let mut record = HandleRecord::new(HandleValue::new(client_id, node_id), false);
        record.state = HandleState::Exposed;
        record.reply_pending = reply_pending;
        prop_assert_eq!(begin_resurrect(&mut record).unwrap_err(), AisError::BadHandle);
        prop_assert_eq!(record.state, HandleState::Exposed);
    }

    #[test]
    fn pending_reply_always_exposes_a_stale_handle(reply_pending in 1u32..0xff) {
        let mut record = HandleRecord::new(HandleValue::new(1, 1), false);
        record.state = HandleState::Stale;
        record.reply_pending = reply_pending;
        let err = begin_resurrect(&mut record).unwrap_err();
        prop_assert_eq!(err, AisError::BadHandle);
        prop_assert_eq!(record.state, HandleState::Exposed);
    }
}

/// Boundary (spec.md §8): with `replyPending == 0xff` (saturated),
/// finalize must still succeed and shut down the handle cleanly.
#[test]
fn saturated_reply_pending_does_not_block_finalize() {
    let handle = HandleValue::new(1, 1);
    let mut cb = ControlBlock::new(4);
    let mut record = HandleRecord::new(handle, false);
    record.reply_pending = 0xff;
    cb.register(record);

    cb.finalize(handle);
    assert!(!cb.handles.contains_key(&handle));
}

/// Round-trip/idempotence (spec.md §8): `init -> finalize` on a handle
/// with no opens is a no-op returning OK, even if the daemon is down.
#[test]
fn init_then_finalize_with_no_opens_is_clean() {
    let handle = HandleValue::new(2, 1);
    let mut cb = ControlBlock::new(4);
    cb.register(HandleRecord::new(handle, false));
    cb.finalize(handle);
    assert!(!cb.handles.contains_key(&handle));
    assert!(!cb.mailboxes.contains_key(&handle));
}
