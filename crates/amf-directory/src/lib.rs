//! # amf-directory: SI/SU assignment planning for the AMF director
//!
//! This crate is the "choose-and-assign" half of the SG FSM (spec.md
//! §4.3): given a Service Group's current SUs and SIs, decide which new
//! `(SU, SI, HA state)` assignments to issue. The SG FSM in `amf-kernel`
//! owns *when* to call into this crate (on STABLE re-entry, on new SI,
//! after a SUSI frees up slack); this crate owns *which* SU wins.
//!
//! Dispatch is by [`RedundancyModel`] tag, following the "dynamic dispatch
//! over redundancy models" design note: each model gets its own
//! [`RedundancyPlanner`] implementation, selected once via
//! [`planner_for`].

use amf_types::{HaState, RedundancyModel, Sg, Si, Su, SuId};

mod no_redundancy;
mod n_plus_m;
mod n_way;
mod n_way_active;
mod two_n;

pub use n_plus_m::NPlusMPlanner;
pub use n_way::NWayPlanner;
pub use n_way_active::NWayActivePlanner;
pub use no_redundancy::NoRedundancyPlanner;
pub use two_n::TwoNPlanner;

/// A single new assignment the director should issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub su: SuId,
    pub si: amf_types::SiId,
    pub ha_state: HaState,
}

/// Computes new assignments for one Service Group.
///
/// Implementations must not mutate their inputs; the SG FSM applies the
/// returned [`Assignment`]s (adding affected SUs to the oper-list,
/// issuing `INFO_SU_SI_ASSIGN`, etc).
pub trait RedundancyPlanner: std::fmt::Debug {
    /// spec.md §4.3 "Choose-and-assign": scan eligible SIs and in-service
    /// SUs, returning the assignments to issue this round. Returns an
    /// empty vector when there is nothing to do (the SG FSM then settles
    /// back to STABLE).
    fn choose_and_assign(&self, sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment>;
}

/// Selects the planner for a Service Group's configured redundancy
/// model.
pub fn planner_for(model: RedundancyModel) -> Box<dyn RedundancyPlanner> {
    match model {
        RedundancyModel::TwoN => Box::new(TwoNPlanner),
        RedundancyModel::NPlusM => Box::new(NPlusMPlanner),
        RedundancyModel::NWay => Box::new(NWayPlanner),
        RedundancyModel::NWayActive => Box::new(NWayActivePlanner),
        RedundancyModel::NoRedundancy => Box::new(NoRedundancyPlanner),
    }
}

/// Shared helper: is this SU already assigned (in any HA state) to this
/// SI?
pub(crate) fn already_assigned(su: &Su, si: &Si) -> bool {
    su.assigned_sis.contains(&si.id)
}
