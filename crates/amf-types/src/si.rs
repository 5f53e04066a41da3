//! Service Instance (spec.md §3 "Service Instance").

use serde::{Deserialize, Serialize};

use crate::ids::{SiId, SuId};
use crate::states::{AdminState, DependencyState};

/// A workload unit to be assigned across SUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Si {
    pub id: SiId,
    pub sg: crate::ids::SgId,
    pub admin_state: AdminState,
    pub rank: u32,
    pub max_num_csi: u32,
    pub num_csi: u32,
    pub preferred_active_su_count: u32,
    pub preferred_standby_su_count: u32,
    pub dependency_state: DependencyState,
    pub csis: Vec<crate::ids::CsiId>,
    /// SUs this SI depends on, in dependency order.
    pub depends_on: Vec<SiId>,
    /// Current SU-SI assignments for this SI.
    pub susis: Vec<crate::ids::SuId>,
    /// Preferred SUs in rank order (`saAmfSIRankedSU`), used by the
    /// N-way-active first pass (spec.md §4.3).
    pub ranked_sus: Vec<SuId>,
}

impl Si {
    pub fn new(id: SiId, sg: crate::ids::SgId) -> Self {
        Self {
            id,
            sg,
            admin_state: AdminState::Unlocked,
            rank: 0,
            max_num_csi: 0,
            num_csi: 0,
            preferred_active_su_count: 1,
            preferred_standby_su_count: 0,
            dependency_state: DependencyState::Unassigned,
            csis: Vec::new(),
            depends_on: Vec::new(),
            susis: Vec::new(),
            ranked_sus: Vec::new(),
        }
    }

    /// Fully configured: all its CSIs have been added.
    pub fn is_fully_configured(&self) -> bool {
        self.num_csi == self.max_num_csi
    }

    /// Whether this SI is eligible for new assignment (spec.md §4.3
    /// "Choose-and-assign, N-way-active", first bullet).
    pub fn eligible_for_assignment(&self) -> bool {
        matches!(self.admin_state, AdminState::Unlocked)
            && self.is_fully_configured()
            && !matches!(
                self.dependency_state,
                DependencyState::SponsorUnassigned | DependencyState::UnassigningDueToDep
            )
    }

    pub fn active_curr_su(&self, active_sus: &[SuId]) -> u32 {
        self.susis.iter().filter(|su| active_sus.contains(su)).count() as u32
    }
}
