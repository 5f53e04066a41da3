//! Cluster node (spec.md §3 "Node").

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, SuId};
use crate::states::{AdminState, NodeState, OperState};

/// A cluster member hosting zero or more SUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub admin_state: AdminState,
    pub oper_state: OperState,
    pub node_state: NodeState,
    pub recvr_fail_sw: bool,
    pub auto_repair: bool,
    pub error_escalation_level: u32,
    /// Count of SUs still reacting to an in-progress node admin op.
    pub su_cnt_admin_oper: u32,
    pub pending_admin_callback: Option<crate::component::PendingCallback>,
    pub middleware_sus: Vec<SuId>,
    pub app_sus: Vec<SuId>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            admin_state: AdminState::Unlocked,
            oper_state: OperState::Disabled,
            node_state: NodeState::Absent,
            recvr_fail_sw: false,
            auto_repair: true,
            error_escalation_level: 0,
            su_cnt_admin_oper: 0,
            pending_admin_callback: None,
            middleware_sus: Vec::new(),
            app_sus: Vec::new(),
        }
    }

    pub fn all_sus(&self) -> impl Iterator<Item = &SuId> {
        self.middleware_sus.iter().chain(self.app_sus.iter())
    }
}
