//! Service Unit (spec.md §3 "Service Unit").

use serde::{Deserialize, Serialize};

use crate::component::PendingCallback;
use crate::ids::{CompId, NodeId, SgId, SiId, SuId};
use crate::states::{AdminState, OperState, Presence, Readiness, SuFailoverPolicy, SwitchState};

/// A deployable unit containing one or more components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Su {
    pub id: SuId,
    pub sg: SgId,
    /// `None` for an SU hosted externally to the cluster.
    pub node: Option<NodeId>,
    pub admin_state: AdminState,
    pub oper_state: OperState,
    pub readiness: Readiness,
    pub presence: Presence,
    pub pre_instantiable: bool,
    pub failover_policy: SuFailoverPolicy,
    pub active_count: u32,
    pub standby_count: u32,
    pub restart_count: u32,
    pub switch_state: SwitchState,
    pub pending_callback: Option<PendingCallback>,
    pub components: Vec<CompId>,
    /// Current assignment list; SIs this SU carries a SUSI for.
    pub assigned_sis: Vec<SiId>,
    /// Whether this SU has a failed-flag set by the presence aggregator
    /// (spec.md §4.2).
    pub failed: bool,
}

impl Su {
    pub fn new(id: SuId, sg: SgId, node: Option<NodeId>) -> Self {
        Self {
            id,
            sg,
            node,
            admin_state: AdminState::Unlocked,
            oper_state: OperState::Disabled,
            readiness: Readiness::OutOfService,
            presence: Presence::Uninstantiated,
            pre_instantiable: true,
            failover_policy: SuFailoverPolicy::Disabled,
            active_count: 0,
            standby_count: 0,
            restart_count: 0,
            switch_state: SwitchState::Stable,
            pending_callback: None,
            components: Vec::new(),
            assigned_sis: Vec::new(),
            failed: false,
        }
    }

    pub fn is_in_service(&self) -> bool {
        matches!(self.readiness, Readiness::InService) && !self.failed
    }

    pub fn has_assignment_slack(&self, active_max_per_su: u32) -> bool {
        self.active_count < active_max_per_su
    }

    pub fn has_no_assignments(&self) -> bool {
        self.assigned_sis.is_empty() && self.active_count == 0 && self.standby_count == 0
    }
}
