//! Node-director runtime: applies inbound [`Message`]s to the local
//! component set via `amf-kernel`'s CLC FSM, and answers with
//! `SusiResult`/`Ack` (spec.md §4.1, §6).

use std::collections::VecDeque;
use std::time::Instant;

use amf_kernel::{clc_transition, ClcCommandKind, ClcEvent, Effect};
use amf_protocol::{Message, MessagePayload, MsgId, MsgIdTracker, SusiActionKind};
use amf_types::{CompId, Component, NodeId, SuId};
use indexmap::IndexMap;

use crate::clc_executor::{self, ClcOutcome};
use crate::error::AmfResult;

pub struct NodeDirectorRuntime {
    pub self_id: NodeId,
    pub director: NodeId,
    pub components: IndexMap<CompId, Component>,
    /// `msg_id` validation for messages received from the director.
    pub inbound: MsgIdTracker,
    pub next_msg_id: MsgId,
}

impl NodeDirectorRuntime {
    pub fn new(self_id: NodeId, director: NodeId) -> Self {
        Self {
            self_id,
            director,
            components: IndexMap::new(),
            inbound: MsgIdTracker::new(),
            next_msg_id: MsgId::ZERO,
        }
    }

    fn components_of(&mut self, su: SuId) -> Vec<CompId> {
        self.components.values().filter(|c| c.su == su).map(|c| c.id).collect()
    }

    /// Runs `LaunchClcCommand` effects through the timed executor and
    /// feeds the resulting outcome back into the CLC FSM (spec.md §4.1),
    /// queuing whatever effects that produces in turn. `StartCompRegTimer`
    /// and `StopHealthMonitoring` have no timer wheel / health-check
    /// monitor in this runtime yet and are only logged.
    fn drive_clc_effects(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::LaunchClcCommand { comp: comp_id, command, timeout, error_source } => {
                    let Some(comp) = self.components.get(&comp_id) else { continue };
                    let outcome = clc_executor::execute(comp, self.self_id, command, timeout, error_source);
                    if let Some(event) = outcome_to_clc_event(command, outcome) {
                        if let Some(comp) = self.components.get_mut(&comp_id) {
                            queue.extend(clc_transition(comp, event));
                        }
                    }
                }
                Effect::StartCompRegTimer { comp } => {
                    tracing::debug!(%comp, "comp-reg timer requested; not yet driven by this runtime's event loop");
                }
                Effect::StopHealthMonitoring { comp } => {
                    tracing::debug!(%comp, "health monitoring torn down");
                }
                _ => {}
            }
        }
    }

    /// Validates ordering, then applies the message. Returns the replies
    /// to send back to the director (always includes an `Ack`).
    pub fn handle(&mut self, message: &Message, _now: Instant) -> AmfResult<Vec<Message>> {
        if !message.is_ack() {
            self.inbound.accept(message.from, message.msg_id)?;
        }

        let mut replies = Vec::new();
        match &message.payload {
            MessagePayload::InfoSuSiAssign { su, si, ha_state, action } => {
                let event = match action {
                    SusiActionKind::Assign | SusiActionKind::Modify => ClcEvent::Inst,
                    SusiActionKind::Remove => ClcEvent::Term,
                };
                for comp_id in self.components_of(*su) {
                    let effects = match self.components.get_mut(&comp_id) {
                        Some(comp) => clc_transition(comp, event),
                        None => continue,
                    };
                    self.drive_clc_effects(effects);
                }
                replies.push(self.ack(message.msg_id));
                replies.push(Message::new(
                    self.self_id,
                    self.director,
                    self.next_id(),
                    MessagePayload::SusiResult { su: *su, si: *si, success: true },
                ));
                let _ = ha_state;
            }
            MessagePayload::Reboot { reason } => {
                tracing::warn!(%reason, "D2N_REBOOT received");
                replies.push(self.ack(message.msg_id));
            }
            MessagePayload::ClientHigh { next_expected } => {
                self.inbound.reseed(message.from, *next_expected);
            }
            MessagePayload::RegSu { .. } | MessagePayload::AdminOpReq { .. } => {
                replies.push(self.ack(message.msg_id));
            }
            MessagePayload::OperationState { .. } | MessagePayload::SusiResult { .. } | MessagePayload::Ack { .. } => {
                // Director-bound payloads; a node director never receives these.
            }
        }
        Ok(replies)
    }

    fn ack(&mut self, acked_msg_id: MsgId) -> Message {
        Message::new(self.self_id, self.director, self.next_id(), MessagePayload::Ack { acked_msg_id })
    }

    fn next_id(&mut self) -> MsgId {
        let id = self.next_msg_id;
        self.next_msg_id = id.next();
        id
    }
}

/// Maps a `NCS_OS_PROC_EXECUTE_TIMED` outcome back to the CLC event it
/// signifies for the command kind that produced it (spec.md §4.1). AM
/// start/stop and health-check aren't presence-FSM events; their outcome
/// has no transition to drive.
fn outcome_to_clc_event(kind: ClcCommandKind, outcome: ClcOutcome) -> Option<ClcEvent> {
    match kind {
        ClcCommandKind::Instantiate => Some(match outcome {
            ClcOutcome::NormalExit => ClcEvent::InstSucc,
            ClcOutcome::ExitWithCode(code) => ClcEvent::InstFail { exit_code: Some(code) },
            ClcOutcome::ExecFailed | ClcOutcome::WaitTimeout | ClcOutcome::ExitOnSignal => {
                ClcEvent::InstFail { exit_code: None }
            }
        }),
        ClcCommandKind::Terminate => Some(if matches!(outcome, ClcOutcome::NormalExit) {
            ClcEvent::TermSucc
        } else {
            ClcEvent::TermFail
        }),
        ClcCommandKind::Cleanup => Some(if matches!(outcome, ClcOutcome::NormalExit) {
            ClcEvent::CleanupSucc
        } else {
            ClcEvent::CleanupFail
        }),
        ClcCommandKind::AmStart | ClcCommandKind::AmStop | ClcCommandKind::HealthCheck => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use amf_types::{ClcCommand, ComponentConfig, CsTypeId, Capability, ClcCommandSet, HaState, Presence};

    fn component(su: SuId) -> Component {
        Component {
            id: CompId::new(1),
            su,
            config: ComponentConfig {
                comp_type: "test".into(),
                cs_type: CsTypeId::new(1),
                capability: Capability::XActiveOrXStandby,
                pre_instantiable: true,
                clc: ClcCommandSet {
                    instantiate: Some(ClcCommand { path: "/bin/true".into(), timeout: Duration::from_secs(5) }),
                    ..Default::default()
                },
                env: Vec::new(),
                inst_retry_max: 3,
                no_retry_exit_code: None,
            },
            presence: Presence::Uninstantiated,
            registered: false,
            proxy: None,
            csi_count: 0,
            restart_count: 0,
            inst_retry_count: 0,
            pending_callback: None,
            last_error: None,
        }
    }

    #[test]
    fn assign_drives_clc_instantiate_and_replies_susi_result() {
        let su = SuId::new(1);
        let mut runtime = NodeDirectorRuntime::new(NodeId::new(1), NodeId::new(0));
        let comp = component(su);
        runtime.components.insert(comp.id, comp);

        let msg = Message::new(
            NodeId::new(0),
            NodeId::new(1),
            MsgId::ZERO,
            MessagePayload::InfoSuSiAssign {
                su,
                si: amf_types::SiId::new(1),
                ha_state: HaState::Active,
                action: SusiActionKind::Assign,
            },
        );
        let replies = runtime.handle(&msg, Instant::now()).unwrap();
        assert_eq!(replies.len(), 2);
        assert!(matches!(replies[0].payload, MessagePayload::Ack { .. }));
        assert!(matches!(replies[1].payload, MessagePayload::SusiResult { success: true, .. }));
        assert_eq!(runtime.components[&CompId::new(1)].presence, Presence::Instantiating);
    }

    #[test]
    fn non_preinstantiable_reaches_instantiated_via_real_executor() {
        let su = SuId::new(1);
        let mut runtime = NodeDirectorRuntime::new(NodeId::new(1), NodeId::new(0));
        let mut comp = component(su);
        comp.config.pre_instantiable = false;
        runtime.components.insert(comp.id, comp);

        let msg = Message::new(
            NodeId::new(0),
            NodeId::new(1),
            MsgId::ZERO,
            MessagePayload::InfoSuSiAssign {
                su,
                si: amf_types::SiId::new(1),
                ha_state: HaState::Active,
                action: SusiActionKind::Assign,
            },
        );
        runtime.handle(&msg, Instant::now()).unwrap();
        assert_eq!(runtime.components[&CompId::new(1)].presence, Presence::Instantiated);
    }

    #[test]
    fn failing_instantiate_exhausts_retries_via_real_executor() {
        let su = SuId::new(1);
        let mut runtime = NodeDirectorRuntime::new(NodeId::new(1), NodeId::new(0));
        let mut comp = component(su);
        comp.config.pre_instantiable = false;
        comp.config.inst_retry_max = 2;
        comp.config.clc.instantiate = Some(ClcCommand { path: "/bin/false".into(), timeout: Duration::from_secs(5) });
        runtime.components.insert(comp.id, comp);

        let msg = Message::new(
            NodeId::new(0),
            NodeId::new(1),
            MsgId::ZERO,
            MessagePayload::InfoSuSiAssign {
                su,
                si: amf_types::SiId::new(1),
                ha_state: HaState::Active,
                action: SusiActionKind::Assign,
            },
        );
        runtime.handle(&msg, Instant::now()).unwrap();
        let comp = &runtime.components[&CompId::new(1)];
        assert_eq!(comp.presence, Presence::InstantiationFailed);
        assert_eq!(comp.inst_retry_count, 2);
    }
}
