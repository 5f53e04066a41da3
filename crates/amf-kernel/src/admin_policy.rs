//! SU admin-operation policy table (spec.md §6).

use amf_types::{AdminOpId, AdminState, AisError};

/// What an admin operation request should do given the SU's current
/// admin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOpOutcome {
    /// Proceeds through the SG FSM. `interrupts_shutdown` is set only
    /// for LOCK arriving while a SHUTDOWN is in flight (spec.md §4.3
    /// "Tie-breaks and edge cases").
    Run { interrupts_shutdown: bool },
    /// `SA_AIS_ERR_NO_OP`: already in the target state.
    NoOp,
    /// `SA_AIS_ERR_BAD_OPERATION`: not permitted from this state.
    Err,
}

/// Looks up the fixed policy table.
pub fn admin_op_policy(current: AdminState, op: AdminOpId) -> AdminOpOutcome {
    use AdminOpId::*;
    use AdminOpOutcome::*;
    use AdminState::*;

    match (current, op) {
        (Unlocked, Unlock) => NoOp,
        (Unlocked, Lock | Shutdown | Repaired) => Run { interrupts_shutdown: false },
        (Unlocked, LockInstantiation | UnlockInstantiation) => Err,

        (Locked, Lock) => NoOp,
        (Locked, Unlock | LockInstantiation | UnlockInstantiation | Repaired) => {
            Run { interrupts_shutdown: false }
        }
        (Locked, Shutdown) => Err,

        (LockedInstantiation, LockInstantiation) => NoOp,
        (LockedInstantiation, UnlockInstantiation | Repaired) => {
            Run { interrupts_shutdown: false }
        }
        (LockedInstantiation, Unlock | Lock | Shutdown) => Err,

        (ShuttingDown, Lock) => Run { interrupts_shutdown: true },
        (ShuttingDown, Unlock | Shutdown | LockInstantiation | UnlockInstantiation | Repaired) => {
            Err
        }
    }
}

/// Maps a policy outcome to the AIS error the caller sees, or `None`
/// when the operation runs through the SG FSM.
pub fn outcome_error(outcome: AdminOpOutcome) -> Option<AisError> {
    match outcome {
        AdminOpOutcome::Run { .. } => None,
        AdminOpOutcome::NoOp => Some(AisError::NoOp),
        AdminOpOutcome::Err => Some(AisError::BadOperation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AdminState::Unlocked, AdminOpId::Unlock, AdminOpOutcome::NoOp)]
    #[test_case(AdminState::Unlocked, AdminOpId::Lock, AdminOpOutcome::Run { interrupts_shutdown: false })]
    #[test_case(AdminState::Unlocked, AdminOpId::LockInstantiation, AdminOpOutcome::Err)]
    #[test_case(AdminState::Locked, AdminOpId::Lock, AdminOpOutcome::NoOp)]
    #[test_case(AdminState::Locked, AdminOpId::Shutdown, AdminOpOutcome::Err)]
    #[test_case(AdminState::LockedInstantiation, AdminOpId::LockInstantiation, AdminOpOutcome::NoOp)]
    #[test_case(AdminState::LockedInstantiation, AdminOpId::Unlock, AdminOpOutcome::Err)]
    #[test_case(AdminState::ShuttingDown, AdminOpId::Lock, AdminOpOutcome::Run { interrupts_shutdown: true })]
    #[test_case(AdminState::ShuttingDown, AdminOpId::Shutdown, AdminOpOutcome::Err)]
    fn policy_table(state: AdminState, op: AdminOpId, expected: AdminOpOutcome) {
        assert_eq!(admin_op_policy(state, op), expected);
    }

    #[test]
    fn duplicate_unlock_on_unlocked_is_no_op_with_no_side_effects() {
        let outcome = admin_op_policy(AdminState::Unlocked, AdminOpId::Unlock);
        assert_eq!(outcome, AdminOpOutcome::NoOp);
        assert_eq!(outcome_error(outcome), Some(AisError::NoOp));
    }
}
