//! CCB participation state machine, OI side (spec.md §4.7.b "CCB
//! participation state machine").

use amf_types::CcbId;

/// Phase of one CCB record the OI is tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcbPhase {
    /// Has seen at least one OBJ_CREATE/MODIFY/DELETE up-call.
    Active,
    /// COMPLETED up-call returned OK: resolving this CCB's outcome
    /// requires consulting the daemon if it disappears mid-flight.
    Critical,
    /// COMPLETED up-call returned non-OK: safe to abort locally, no
    /// daemon consultation needed if the daemon disappears.
    CompletedNonCritical,
    Applied,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct CcbRecord {
    pub ccb_id: CcbId,
    pub phase: CcbPhase,
}

impl CcbRecord {
    pub fn new(ccb_id: CcbId) -> Self {
        Self { ccb_id, phase: CcbPhase::Active }
    }

    /// COMPLETED up-call: promotes to `Critical` iff the user callback
    /// returned OK.
    pub fn on_completed(&mut self, user_callback_ok: bool) {
        self.phase = if user_callback_ok {
            CcbPhase::Critical
        } else {
            CcbPhase::CompletedNonCritical
        };
    }

    pub fn on_apply(&mut self) {
        self.phase = CcbPhase::Applied;
    }

    pub fn on_abort(&mut self) {
        self.phase = CcbPhase::Aborted;
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, CcbPhase::Applied | CcbPhase::Aborted)
    }

    /// Whether a daemon crash while this record is live requires
    /// `RECOVER_CCB_OUTCOME` consultation (critical records only).
    pub fn requires_recovery_consultation(&self) -> bool {
        matches!(self.phase, CcbPhase::Critical)
    }
}

/// Result of consulting the daemon with `RECOVER_CCB_OUTCOME` (spec.md
/// §4.7.b): retried on TRY_AGAIN up to 10s by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverCcbOutcome {
    Commit,
    Abort,
    TryAgain,
}

/// What the dispatch loop should post to the mailbox for this record
/// after the daemon resolves its outcome (or, for a non-critical
/// record, immediately with no daemon consultation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcbResolution {
    PostApply,
    PostAbort,
    KeepWaiting,
}

pub fn resolve_after_daemon_crash(record: &mut CcbRecord, outcome: RecoverCcbOutcome) -> CcbResolution {
    debug_assert!(
        record.requires_recovery_consultation(),
        "non-critical CCBs must be aborted directly, without consulting the daemon"
    );
    match outcome {
        RecoverCcbOutcome::Commit => {
            record.on_apply();
            CcbResolution::PostApply
        }
        RecoverCcbOutcome::Abort => {
            record.on_abort();
            CcbResolution::PostAbort
        }
        RecoverCcbOutcome::TryAgain => CcbResolution::KeepWaiting,
    }
}

/// Non-critical record present at daemon crash: aborted directly, no
/// daemon consultation.
pub fn resolve_non_critical_after_daemon_crash(record: &mut CcbRecord) -> CcbResolution {
    record.on_abort();
    CcbResolution::PostAbort
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_ok_promotes_to_critical() {
        let mut r = CcbRecord::new(CcbId::new(1));
        r.on_completed(true);
        assert_eq!(r.phase, CcbPhase::Critical);
        assert!(r.requires_recovery_consultation());
    }

    #[test]
    fn completed_non_ok_is_not_critical() {
        let mut r = CcbRecord::new(CcbId::new(1));
        r.on_completed(false);
        assert_eq!(r.phase, CcbPhase::CompletedNonCritical);
        assert!(!r.requires_recovery_consultation());
    }

    #[test]
    fn critical_record_resolved_by_recover_ccb_outcome() {
        let mut r = CcbRecord::new(CcbId::new(1));
        r.on_completed(true);
        let resolution = resolve_after_daemon_crash(&mut r, RecoverCcbOutcome::Commit);
        assert_eq!(resolution, CcbResolution::PostApply);
        assert!(r.is_terminal());
    }

    #[test]
    fn non_critical_record_aborted_without_daemon_consultation() {
        let mut r = CcbRecord::new(CcbId::new(1));
        r.on_completed(false);
        let resolution = resolve_non_critical_after_daemon_crash(&mut r);
        assert_eq!(resolution, CcbResolution::PostAbort);
        assert_eq!(r.phase, CcbPhase::Aborted);
    }
}
