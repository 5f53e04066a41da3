//! The per-process IMMA-OI control block ("cb", spec.md §4.7).

use std::collections::HashMap;

use amf_types::{AisError, CcbId, HandleValue};

use crate::ccb::CcbRecord;
use crate::dispatch::DispatchCounters;
use crate::handle::{HandleRecord, HandleState};
use crate::mailbox::{Mailbox, Priority};

/// A callback queued for delivery to the application (spec.md §4.7.b).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackEvent {
    StaleHandle,
    CcbApply(CcbId),
    CcbAbort(CcbId),
}

/// Per-process singleton state. One instance per agent type (OM or OI),
/// never shared across processes (spec.md §5 "Shared-resource policy").
pub struct ControlBlock {
    pub handles: HashMap<HandleValue, HandleRecord>,
    pub mailboxes: HashMap<HandleValue, Mailbox<CallbackEvent>>,
    pub ccbs: HashMap<(HandleValue, CcbId), CcbRecord>,
    pub dispatch: DispatchCounters,
    /// Bounds the number of *active* resurrects per protocol fault
    /// (spec.md §5 "dispatch_clients_to_resurrect").
    pub resurrects_in_flight: u32,
    pub max_concurrent_resurrects: u32,
}

impl ControlBlock {
    pub fn new(max_concurrent_resurrects: u32) -> Self {
        Self {
            handles: HashMap::new(),
            mailboxes: HashMap::new(),
            ccbs: HashMap::new(),
            dispatch: DispatchCounters::new(),
            resurrects_in_flight: 0,
            max_concurrent_resurrects,
        }
    }

    pub fn register(&mut self, record: HandleRecord) {
        self.mailboxes.entry(record.value).or_insert_with(Mailbox::new);
        self.handles.insert(record.value, record);
    }

    /// spec.md §4.7.b "Stale-handle callback protocol": the daemon
    /// broadcast "stale clients"; react for one handle.
    pub fn on_stale_broadcast(&mut self, handle: HandleValue) {
        let Some(record) = self.handles.get_mut(&handle) else { return };
        if !record.sel_obj_usable {
            // Already notified; suppress the duplicate.
            return;
        }
        record.mark_stale();
        record.sel_obj_usable = false;
        if let Some(mb) = self.mailboxes.get_mut(&handle) {
            mb.push(Priority::High, CallbackEvent::StaleHandle);
        }

        let owned_ccbs: Vec<CcbId> = self
            .ccbs
            .keys()
            .filter(|(h, _)| *h == handle)
            .map(|(_, c)| *c)
            .collect();
        for ccb_id in owned_ccbs {
            let key = (handle, ccb_id);
            let critical = self.ccbs[&key].requires_recovery_consultation();
            if !critical {
                // Daemon has already aborted it; post NORMAL so it
                // stays behind the CCB's already-posted ops.
                self.ccbs.get_mut(&key).unwrap().on_abort();
                if let Some(mb) = self.mailboxes.get_mut(&handle) {
                    mb.push(Priority::Normal, CallbackEvent::CcbAbort(ccb_id));
                }
            }
            // Critical CCBs are left untouched here; resolved later via
            // `ccb::resolve_after_daemon_crash` once resurrect completes.
        }
    }

    /// `saImmOiFinalize`/`saImmOmFinalize`: unconditional teardown of a
    /// handle. Always succeeds, even with replies still pending or the
    /// daemon unreachable (spec.md §8 boundary: "replyPending == 0xff
    /// (saturated), finalize must still succeed and shut down the
    /// handle cleanly"); the deferred-shutdown discipline around an
    /// in-flight dispatch is handled by [`DispatchCounters`], not here.
    pub fn finalize(&mut self, handle: HandleValue) {
        self.handles.remove(&handle);
        self.mailboxes.remove(&handle);
        self.ccbs.retain(|(h, _), _| *h != handle);
    }

    /// `saImmOiImplementerSet` (spec.md §4.7.a.4): class- and
    /// object-implementer associations survive resurrect, so re-setting
    /// the *same* name on a handle that already carries it is a
    /// duplicate, not a replace — `SA_AIS_ERR_EXIST` (spec.md Open
    /// Question #1: preserved as the source behaves).
    pub fn set_implementer(&mut self, handle: HandleValue, name: String) -> Result<(), AisError> {
        let record = self.handles.get_mut(&handle).ok_or(AisError::BadHandle)?;
        if record.implementer_name.as_deref() == Some(name.as_str()) {
            return Err(AisError::Exist);
        }
        record.implementer_name = Some(name);
        Ok(())
    }

    pub fn can_start_resurrect(&self) -> bool {
        self.resurrects_in_flight < self.max_concurrent_resurrects
    }

    pub fn begin_resurrect_slot(&mut self) {
        self.resurrects_in_flight += 1;
    }

    pub fn end_resurrect_slot(&mut self) {
        self.resurrects_in_flight = self.resurrects_in_flight.saturating_sub(1);
    }

    /// Gates a reactive dispatch on one handle by resurrect-slot
    /// availability (spec.md §5 "dispatch_clients_to_resurrect"): a
    /// stale handle found with no free slot is rejected outright rather
    /// than queued, since the daemon side of `RESURRECT` is itself
    /// bounded by how many concurrent resurrects it will service.
    pub fn dispatch_one(&mut self, handle: HandleValue) -> Result<(), AisError> {
        let state = self.handles.get(&handle).map(|r| r.state).ok_or(AisError::BadHandle)?;
        if matches!(state, HandleState::Stale) && !self.can_start_resurrect() {
            return Err(AisError::BadHandle);
        }
        Ok(())
    }
}
