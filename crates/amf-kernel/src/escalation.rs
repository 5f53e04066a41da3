//! Recovery escalation (spec.md §4.4): component restart → SU restart →
//! SU failover → node failover → node fail-fast, with per-scope
//! probation timers.

use std::collections::HashMap;

use amf_types::{CompId, NodeId, RecoveryRecommendation, SuId};

/// Configured thresholds and probation durations (ambient config, loaded
/// by `amf-config`).
#[derive(Debug, Clone, Copy)]
pub struct EscalationThresholds {
    pub comp_restart_max: u32,
    pub su_restart_max: u32,
    pub su_failover_max: u32,
    pub probation: std::time::Duration,
}

impl Default for EscalationThresholds {
    fn default() -> Self {
        Self {
            comp_restart_max: 3,
            su_restart_max: 3,
            su_failover_max: 3,
            probation: std::time::Duration::from_secs(600),
        }
    }
}

/// Per-cluster escalation counters. One instance lives on the node
/// director (component/SU counters) and one on the director (node
/// failover counter, `cb->su_failover_cnt`).
#[derive(Debug, Clone, Default)]
pub struct EscalationCounters {
    comp_restart_cnt: HashMap<CompId, u32>,
    su_restart_cnt: HashMap<SuId, u32>,
    su_failover_cnt: HashMap<NodeId, u32>,
}

impl EscalationCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A component faulted: bump its restart counter and recommend the
    /// next action.
    pub fn on_component_fault(
        &mut self,
        comp: CompId,
        su: SuId,
        thresholds: &EscalationThresholds,
    ) -> RecoveryRecommendation {
        let cnt = self.comp_restart_cnt.entry(comp).or_insert(0);
        *cnt += 1;
        if *cnt >= thresholds.comp_restart_max {
            *cnt = 0;
            self.on_su_restart(su, thresholds)
        } else {
            RecoveryRecommendation::ComponentRestart
        }
    }

    /// An SU restart was recommended (directly, or via component
    /// escalation): bump the SU restart counter.
    pub fn on_su_restart(
        &mut self,
        su: SuId,
        thresholds: &EscalationThresholds,
    ) -> RecoveryRecommendation {
        let cnt = self.su_restart_cnt.entry(su).or_insert(0);
        *cnt += 1;
        if *cnt >= thresholds.su_restart_max {
            *cnt = 0;
            RecoveryRecommendation::SuFailover
        } else {
            RecoveryRecommendation::SuRestart
        }
    }

    /// An SU failover happened on `node`: bump the node's failover
    /// counter (`cb->su_failover_cnt`).
    pub fn on_su_failover(
        &mut self,
        node: NodeId,
        thresholds: &EscalationThresholds,
    ) -> RecoveryRecommendation {
        let cnt = self.su_failover_cnt.entry(node).or_insert(0);
        *cnt += 1;
        if *cnt >= thresholds.su_failover_max {
            *cnt = 0;
            RecoveryRecommendation::NodeFailover
        } else {
            RecoveryRecommendation::SuFailover
        }
    }

    /// Probation-timer expiry: reset the counter and escalation level
    /// for the given scope (spec.md §4.4, "never cancelled on
    /// reconfiguration, only restarted").
    pub fn reset_component(&mut self, comp: CompId) {
        self.comp_restart_cnt.remove(&comp);
    }

    pub fn reset_su(&mut self, su: SuId) {
        self.su_restart_cnt.remove(&su);
    }

    pub fn reset_node(&mut self, node: NodeId) {
        self.su_failover_cnt.remove(&node);
    }

    pub fn component_count(&self, comp: CompId) -> u32 {
        self.comp_restart_cnt.get(&comp).copied().unwrap_or(0)
    }

    pub fn su_count(&self, su: SuId) -> u32 {
        self.su_restart_cnt.get(&su).copied().unwrap_or(0)
    }
}
