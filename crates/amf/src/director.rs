//! Director-side runtime: owns the cluster [`DirectorState`], the
//! per-peer `msg_id` bookkeeping, and the translation from kernel
//! [`Effect`]s into outbound [`Message`]s (spec.md §6).
//!
//! This module is deliberately free of I/O: [`DirectorRuntime::step`]
//! takes an event and returns the messages to send, the same
//! effects-out discipline `amf-kernel` uses. The mio event loop in
//! `bin/amf_director.rs` is the only place that touches a socket.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use amf_kernel::{sg_fsm_step, Effect, SgEvent};
use amf_kernel::DirectorState;
use amf_protocol::{Message, MessagePayload, MsgId, MsgIdTracker, Retransmitter};
use amf_types::{NodeId, SgId};

use crate::error::{AmfError, AmfResult};

/// Per-peer outbound bookkeeping: the next `msg_id` this director will
/// stamp on a message to `peer`, plus its unacked set.
#[derive(Default)]
pub struct PeerLink {
    pub next_msg_id: MsgId,
    pub retransmitter: Retransmitter,
}

pub struct DirectorRuntime {
    pub state: DirectorState,
    /// `msg_id` validation for messages *received* from each node
    /// director.
    pub inbound: MsgIdTracker,
    pub links: HashMap<NodeId, PeerLink>,
    pub self_id: NodeId,
    pub resend_timeout: Duration,
}

impl DirectorRuntime {
    pub fn new(self_id: NodeId, state: DirectorState, resend_timeout: Duration) -> Self {
        Self {
            state,
            inbound: MsgIdTracker::new(),
            links: HashMap::new(),
            self_id,
            resend_timeout,
        }
    }

    fn link_mut(&mut self, peer: NodeId) -> &mut PeerLink {
        self.links.entry(peer).or_default()
    }

    /// Applies one SG event and turns the resulting effects into
    /// outbound, msg_id-stamped messages recorded with the retransmitter.
    pub fn apply_sg_event(
        &mut self,
        sg: SgId,
        event: SgEvent,
        now: Instant,
    ) -> AmfResult<Vec<Message>> {
        if !self.state.sgs.contains_key(&sg) {
            return Err(AmfError::UnknownSg(sg));
        }
        let effects = {
            let mut world = self.state.world_mut(sg);
            sg_fsm_step(&mut world, event)
        };
        Ok(self.dispatch_effects(&effects, now))
    }

    /// Translates each effect to a message for the owning SU's node and
    /// queues it on that peer's retransmitter. Effects with no wire
    /// representation (component lifecycle, timers) are left for the
    /// node director to execute locally and are skipped here.
    fn dispatch_effects(&mut self, effects: &[Effect], now: Instant) -> Vec<Message> {
        let mut sent = Vec::new();
        for effect in effects {
            let Some((peer, payload)) = self.effect_to_payload(effect) else { continue };
            let link = self.link_mut(peer);
            let msg_id = link.next_msg_id;
            link.next_msg_id = msg_id.next();
            let message = Message::new(self.self_id, peer, msg_id, payload);
            link.retransmitter.record_sent(message.clone(), now);
            sent.push(message);
        }
        sent
    }

    fn effect_to_payload(&self, effect: &Effect) -> Option<(NodeId, MessagePayload)> {
        match effect {
            Effect::IssueSusi { su, si, ha_state } => {
                let node = self.state.sus.get(su)?.node?;
                let action = if self.state.susis_of_su(*su).any(|s| s.si == *si) {
                    amf_protocol::SusiActionKind::Modify
                } else {
                    amf_protocol::SusiActionKind::Assign
                };
                Some((
                    node,
                    MessagePayload::InfoSuSiAssign { su: *su, si: *si, ha_state: *ha_state, action },
                ))
            }
            Effect::FreeSusi { su, si } => {
                let node = self.state.sus.get(su)?.node?;
                Some((
                    node,
                    MessagePayload::InfoSuSiAssign {
                        su: *su,
                        si: *si,
                        ha_state: amf_types::HaState::Quiesced,
                        action: amf_protocol::SusiActionKind::Remove,
                    },
                ))
            }
            Effect::RebootNode { node } => Some((*node, MessagePayload::Reboot { reason: "D2N_REBOOT".into() })),
            Effect::AdminOpResult { .. } | Effect::LaunchClcCommand { .. }
            | Effect::StartCompRegTimer { .. } | Effect::StartProbationTimer { .. }
            | Effect::StopHealthMonitoring { .. } | Effect::EscalateRecovery { .. } => None,
        }
    }

    /// Applies a node-failed event: frees the node's SUSIs and re-runs the
    /// planner via `SgEvent::NodeFail`, then — because a downed node can't
    /// run CLC scripts — treats its components as already torn down and,
    /// if `saAmfNodeAutoRepair` is set, emits a single `D2N_REBOOT` once
    /// every application component it hosted is `Uninstantiated`
    /// (spec.md §8 scenario 6).
    pub fn node_fail(&mut self, node: NodeId, sg: SgId, now: Instant) -> AmfResult<Vec<Message>> {
        let mut messages = self.apply_sg_event(sg, SgEvent::NodeFail(node), now)?;

        let auto_repair = self.state.nodes.get(&node).is_some_and(|n| n.auto_repair);
        if !auto_repair {
            return Ok(messages);
        }

        let app_sus = self.state.nodes.get(&node).map(|n| n.app_sus.clone()).unwrap_or_default();
        for comp in self.state.components.values_mut() {
            if app_sus.contains(&comp.su) {
                comp.presence = amf_types::Presence::Uninstantiated;
            }
        }
        let all_down = self
            .state
            .components
            .values()
            .filter(|c| app_sus.contains(&c.su))
            .all(|c| c.presence == amf_types::Presence::Uninstantiated);

        if all_down {
            messages.extend(self.dispatch_effects(&[Effect::RebootNode { node }], now));
        }
        Ok(messages)
    }

    /// Validates and consumes one inbound message from a node director.
    pub fn accept_inbound(&mut self, message: &Message) -> AmfResult<()> {
        match message.payload {
            MessagePayload::Ack { acked_msg_id } => {
                self.link_mut(message.from).retransmitter.ack(acked_msg_id);
                Ok(())
            }
            _ => {
                self.inbound.accept(message.from, message.msg_id)?;
                Ok(())
            }
        }
    }

    /// Messages due a resend across every peer link, at `now`.
    pub fn due_for_resend(&mut self, now: Instant) -> Vec<Message> {
        let timeout = self.resend_timeout;
        self.links
            .values_mut()
            .flat_map(|link| link.retransmitter.due_for_resend(now, timeout))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_test_harness::ClusterFixture;
    use amf_types::RedundancyModel;

    #[test]
    fn realign_issues_susi_messages_to_owning_nodes() {
        let (state, sg_id, _si) = ClusterFixture::new(RedundancyModel::TwoN).with_nodes(2).build();
        let mut runtime = DirectorRuntime::new(NodeId::new(0), state, Duration::from_secs(5));
        let messages = runtime.apply_sg_event(sg_id, SgEvent::Realign, Instant::now()).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| matches!(m.payload, MessagePayload::InfoSuSiAssign { .. })));
    }

    #[test]
    fn ack_clears_the_retransmitter() {
        let (state, sg_id, _si) = ClusterFixture::new(RedundancyModel::TwoN).with_nodes(2).build();
        let mut runtime = DirectorRuntime::new(NodeId::new(0), state, Duration::from_secs(5));
        let now = Instant::now();
        let messages = runtime.apply_sg_event(sg_id, SgEvent::Realign, now).unwrap();
        assert!(runtime.due_for_resend(now + Duration::from_secs(10)).len() >= messages.len());

        for message in &messages {
            let ack = Message::new(message.to, message.from, MsgId::ZERO, MessagePayload::Ack { acked_msg_id: message.msg_id });
            runtime.accept_inbound(&ack).unwrap();
        }
        assert!(runtime.due_for_resend(now + Duration::from_secs(10)).is_empty());
    }
}
