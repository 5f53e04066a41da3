//! Per-handle state machine and resurrection protocol (spec.md §4.7.a).

use std::time::Duration;

use amf_types::{AisError, HandleValue};
use serde::{Deserialize, Serialize};

/// A handle's health, as seen by the next reactive use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleState {
    /// `stale=false, exposed=false`.
    Healthy,
    /// Daemon restarted; any reactive use tries resurrection.
    Stale,
    /// Resurrection impossible or dangerous. Every API call on this
    /// handle now returns `BadHandle`; the caller must finalize.
    Exposed,
}

/// Per-handle record held in the CB's handle tree.
#[derive(Debug, Clone)]
pub struct HandleRecord {
    pub value: HandleValue,
    pub state: HandleState,
    /// Replies outstanding on this handle; non-zero makes resurrection
    /// unsafe (spec.md §4.7.a step 1).
    pub reply_pending: u32,
    /// Suppresses duplicate stale-handle callbacks (spec.md §4.7.b).
    pub sel_obj_usable: bool,
    /// OI implementer name to re-set after a successful resurrect.
    pub implementer_name: Option<String>,
    pub is_oi: bool,
    /// Whether this handle is the persistent back-end implementer
    /// (spec.md §3 "IMMA handle"); routes its admin-op replies over the
    /// cluster-broadcast channel instead of the request/response one
    /// (spec.md §4.7 "Admin-op response invariants").
    pub is_pbe: bool,
}

impl HandleRecord {
    pub fn new(value: HandleValue, is_oi: bool) -> Self {
        Self {
            value,
            state: HandleState::Healthy,
            reply_pending: 0,
            sel_obj_usable: true,
            implementer_name: None,
            is_oi,
            is_pbe: false,
        }
    }

    pub fn mark_stale(&mut self) {
        if matches!(self.state, HandleState::Healthy) {
            self.state = HandleState::Stale;
        }
    }
}

/// What the caller must do next while resurrecting a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResurrectAction {
    SendResurrect(HandleValue),
    SetImplementer(String),
    SendFinalize(HandleValue),
}

/// Terminal (or retry) outcome of one resurrection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResurrectOutcome {
    /// Issue `action` and feed the daemon's response back in.
    Continue(ResurrectAction),
    Retry,
    Success,
    Failed(AisError),
}

/// spec.md §4.7.a step 1: checks under the CB lock whether resurrection
/// may begin at all.
pub fn begin_resurrect(record: &mut HandleRecord) -> Result<ResurrectAction, AisError> {
    match record.state {
        HandleState::Healthy => Err(AisError::InvalidParam),
        HandleState::Exposed => Err(AisError::BadHandle),
        HandleState::Stale => {
            if record.reply_pending > 0 {
                record.state = HandleState::Exposed;
                return Err(AisError::BadHandle);
            }
            Ok(ResurrectAction::SendResurrect(record.value))
        }
    }
}

/// spec.md §4.7.a step 2: the daemon's response to `RESURRECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonResurrectResponse {
    Ok,
    TryAgain,
    Failed,
}

/// Applies the daemon's `RESURRECT` response. `elapsed`/`bound` implement
/// the "retry TRY_AGAIN up to ~2s" rule.
pub fn on_resurrect_response(
    record: &mut HandleRecord,
    response: DaemonResurrectResponse,
    elapsed: Duration,
    bound: Duration,
) -> ResurrectOutcome {
    match response {
        DaemonResurrectResponse::Failed => {
            record.state = HandleState::Exposed;
            ResurrectOutcome::Failed(AisError::BadHandle)
        }
        DaemonResurrectResponse::TryAgain => {
            if elapsed >= bound {
                record.state = HandleState::Exposed;
                ResurrectOutcome::Failed(AisError::TryAgain)
            } else {
                ResurrectOutcome::Retry
            }
        }
        DaemonResurrectResponse::Ok => {
            if matches!(record.state, HandleState::Exposed) {
                // Exposed by a concurrent thread while we were unlocked.
                return ResurrectOutcome::Failed(AisError::BadHandle);
            }
            record.state = HandleState::Healthy;
            match (record.is_oi, record.implementer_name.clone()) {
                (true, Some(name)) => ResurrectOutcome::Continue(ResurrectAction::SetImplementer(name)),
                _ => ResurrectOutcome::Success,
            }
        }
    }
}

/// spec.md §4.7.a step 3: result of re-setting the prior implementer
/// name after a successful resurrect.
pub fn on_implementer_reset(record: &mut HandleRecord, ok: bool) -> ResurrectOutcome {
    if ok {
        ResurrectOutcome::Success
    } else {
        record.state = HandleState::Exposed;
        ResurrectOutcome::Failed(AisError::BadHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stale_record() -> HandleRecord {
        let mut r = HandleRecord::new(HandleValue::new(1, 1), false);
        r.state = HandleState::Stale;
        r
    }

    #[test]
    fn pending_reply_marks_exposed_instead_of_resurrecting() {
        let mut r = stale_record();
        r.reply_pending = 1;
        let err = begin_resurrect(&mut r).unwrap_err();
        assert_eq!(err, AisError::BadHandle);
        assert_eq!(r.state, HandleState::Exposed);
    }

    #[test]
    fn healthy_handle_cannot_be_resurrected() {
        let mut r = HandleRecord::new(HandleValue::new(1, 1), false);
        assert_eq!(begin_resurrect(&mut r).unwrap_err(), AisError::InvalidParam);
    }

    #[test]
    fn try_again_retries_until_bound_then_exposes() {
        let mut r = stale_record();
        let bound = Duration::from_secs(2);
        let outcome = on_resurrect_response(
            &mut r,
            DaemonResurrectResponse::TryAgain,
            Duration::from_millis(500),
            bound,
        );
        assert_eq!(outcome, ResurrectOutcome::Retry);
        assert_eq!(r.state, HandleState::Stale);

        let outcome = on_resurrect_response(&mut r, DaemonResurrectResponse::TryAgain, bound, bound);
        assert_eq!(outcome, ResurrectOutcome::Failed(AisError::TryAgain));
        assert_eq!(r.state, HandleState::Exposed);
    }

    #[test]
    fn oi_handle_re_sets_implementer_before_success() {
        let mut r = stale_record();
        r.is_oi = true;
        r.implementer_name = Some("my-impl".into());
        let outcome = on_resurrect_response(
            &mut r,
            DaemonResurrectResponse::Ok,
            Duration::ZERO,
            Duration::from_secs(2),
        );
        assert_eq!(
            outcome,
            ResurrectOutcome::Continue(ResurrectAction::SetImplementer("my-impl".into()))
        );
        assert_eq!(r.state, HandleState::Healthy);

        let outcome = on_implementer_reset(&mut r, false);
        assert_eq!(outcome, ResurrectOutcome::Failed(AisError::BadHandle));
        assert_eq!(r.state, HandleState::Exposed);
    }

    #[test]
    fn concurrent_expose_during_unlock_fails_resurrect() {
        let mut r = stale_record();
        r.state = HandleState::Exposed;
        let outcome = on_resurrect_response(
            &mut r,
            DaemonResurrectResponse::Ok,
            Duration::ZERO,
            Duration::from_secs(2),
        );
        assert_eq!(outcome, ResurrectOutcome::Failed(AisError::BadHandle));
    }
}
