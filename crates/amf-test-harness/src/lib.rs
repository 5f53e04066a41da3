//! # amf-test-harness: shared in-memory cluster fixtures
//!
//! Builds a minimal [`amf_kernel::DirectorState`] — N nodes, one Service
//! Group under a configurable redundancy model, one SU per node, one
//! fully-configured SI — for kernel, directory, and end-to-end scenario
//! tests to build on without repeating the same boilerplate.

use amf_kernel::DirectorState;
use amf_types::{Node, NodeId, Readiness, RedundancyModel, Sg, SgId, Si, SiId, Su, SuId};

/// Builds a [`DirectorState`] with `node_count` in-service SUs under one
/// Service Group.
pub struct ClusterFixture {
    node_count: u32,
    redundancy_model: RedundancyModel,
    active_max_su: u32,
    preferred_standby_su_count: u32,
}

impl ClusterFixture {
    pub fn new(redundancy_model: RedundancyModel) -> Self {
        Self {
            node_count: 2,
            redundancy_model,
            active_max_su: 1,
            preferred_standby_su_count: 0,
        }
    }

    pub fn with_nodes(mut self, node_count: u32) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn with_active_max_su(mut self, active_max_su: u32) -> Self {
        self.active_max_su = active_max_su;
        self
    }

    pub fn with_preferred_standby_su_count(mut self, count: u32) -> Self {
        self.preferred_standby_su_count = count;
        self
    }

    pub fn build(self) -> (DirectorState, SgId, SiId) {
        let mut state = DirectorState::new();
        let sg_id = SgId::new(1);
        let mut sg = Sg::new(sg_id, self.redundancy_model);
        sg.active_max_su = self.active_max_su;

        for i in 1..=self.node_count {
            let node_id = NodeId::new(i);
            let su_id = SuId::new(i);
            state.nodes.insert(node_id, Node::new(node_id));
            let mut su = Su::new(su_id, sg_id, Some(node_id));
            su.readiness = Readiness::InService;
            state.sus.insert(su_id, su);
            sg.sus.push(su_id);
            if let Some(node) = state.nodes.get_mut(&node_id) {
                node.app_sus.push(su_id);
            }
        }

        let si_id = SiId::new(1);
        let mut si = Si::new(si_id, sg_id);
        si.max_num_csi = 1;
        si.num_csi = 1;
        si.preferred_standby_su_count = self.preferred_standby_su_count;
        sg.sis.push(si_id);
        state.sis.insert(si_id, si);
        state.sgs.insert(sg_id, sg);

        (state, sg_id, si_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_requested_node_count() {
        let (state, _, _) = ClusterFixture::new(RedundancyModel::TwoN).with_nodes(3).build();
        assert_eq!(state.sus.len(), 3);
        assert_eq!(state.nodes.len(), 3);
    }
}
