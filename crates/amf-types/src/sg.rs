//! Service Group: the domain of one redundancy policy (spec.md §3).

use serde::{Deserialize, Serialize};

use crate::ids::{SgId, SiId, SuId};
use crate::states::{AdminState, RedundancyModel, SgFsmState};

/// A redundancy domain, owning a set of SUs and SIs and driving one SG
/// FSM instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sg {
    pub id: SgId,
    pub redundancy_model: RedundancyModel,
    pub admin_state: AdminState,
    pub fsm_state: SgFsmState,
    pub num_pref_inservice_sus: u32,
    pub active_max_su: u32,
    pub sus: Vec<SuId>,
    pub sis: Vec<SiId>,
    /// SUs currently undergoing an operation (spec.md §3 invariant).
    pub su_oper_list: Vec<SuId>,
    /// At most one SI under admin operation at a time.
    pub admin_si: Option<SiId>,
    /// Invocation id of the admin-lock/shutdown op currently in flight
    /// (spec.md §4.7), stashed here so the eventual `AdminOpResult` can
    /// be reported once the last SU it touched drains the oper-list.
    pub admin_invocation: Option<u64>,
}

impl Sg {
    pub fn new(id: SgId, redundancy_model: RedundancyModel) -> Self {
        Self {
            id,
            redundancy_model,
            admin_state: AdminState::Unlocked,
            fsm_state: SgFsmState::Stable,
            num_pref_inservice_sus: 0,
            active_max_su: 1,
            sus: Vec::new(),
            sis: Vec::new(),
            su_oper_list: Vec::new(),
            admin_si: None,
            admin_invocation: None,
        }
    }

    /// spec.md §3 invariant: `fsm_state == STABLE` implies both the
    /// oper-list and the admin-SI slot are empty.
    pub fn invariant_stable_implies_quiescent(&self) -> bool {
        if matches!(self.fsm_state, SgFsmState::Stable) {
            self.su_oper_list.is_empty() && self.admin_si.is_none()
        } else {
            true
        }
    }

    /// Idempotent insert (SPEC_FULL.md §11): adding an SU already on the
    /// oper-list is a no-op.
    pub fn add_to_oper_list(&mut self, su: SuId) {
        if !self.su_oper_list.contains(&su) {
            self.su_oper_list.push(su);
        }
    }

    pub fn remove_from_oper_list(&mut self, su: SuId) {
        self.su_oper_list.retain(|s| *s != su);
    }

    /// Re-enter STABLE only when every quiescence precondition holds
    /// (spec.md §3 "transitions to STABLE only when...").
    pub fn try_settle_to_stable(&mut self) -> bool {
        if self.su_oper_list.is_empty() && self.admin_si.is_none() {
            self.fsm_state = SgFsmState::Stable;
            true
        } else {
            false
        }
    }
}
