//! SG FSM (spec.md §4.3): one instance per Service Group, reacting to
//! eight events. The *shape* (states, oper-list/admin-SI bookkeeping) is
//! identical across all five redundancy models; only the choose-and-assign
//! step (delegated to `amf_directory::RedundancyPlanner`) differs per
//! model, per the "dynamic dispatch over redundancy models" design note.

use amf_types::{
    AdminState, HaState, NodeId, Sg, SgFsmState, Si, SiId, Su, SuId, Susi, SusiFsm,
};
use indexmap::IndexMap;

use crate::effects::Effect;

/// The eight events the SG FSM reacts to (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgEvent {
    NewSi(SiId),
    SuFault(SuId),
    SuInsvc(SuId),
    SusiSuccess { su: SuId, si: SiId, action: SusiAction },
    SusiFailure { su: SuId, si: SiId },
    Realign,
    NodeFail(NodeId),
    AdminChange { target: AdminTarget, invocation_id: u64 },
}

/// Which message action a `SusiSuccess` response concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SusiAction {
    Asgn,
    Mod,
    Del,
}

/// Target of an admin-state change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTarget {
    Su(SuId),
    Sg,
}

/// Mutable state the SG FSM operates over: one SG plus the SUs/SIs/SUSIs
/// belonging to it.
pub struct SgWorld<'a> {
    pub sg: &'a mut Sg,
    pub sus: &'a mut IndexMap<SuId, Su>,
    pub sis: &'a mut IndexMap<SiId, Si>,
    pub susis: &'a mut Vec<Susi>,
}

/// Applies one event, mutating the SG/SU/SI/SUSI state and returning the
/// effects the director must execute (message sends, escalation).
pub fn sg_fsm_step(world: &mut SgWorld<'_>, event: SgEvent) -> Vec<Effect> {
    match event {
        SgEvent::NewSi(_) | SgEvent::Realign | SgEvent::SuInsvc(_) => run_planner(world),
        SgEvent::SuFault(su) => on_su_fault(world, su),
        SgEvent::SusiSuccess { su, si, action } => on_susi_success(world, su, si, action),
        SgEvent::SusiFailure { su, si } => on_susi_failure(world, su, si),
        SgEvent::NodeFail(node) => on_node_fail(world, node),
        SgEvent::AdminChange { target, invocation_id } => on_admin_change(world, target, invocation_id),
    }
}

/// Choose-and-assign (spec.md §4.3): delegates to the model's planner,
/// then issues whatever new assignments it returned.
fn run_planner(world: &mut SgWorld<'_>) -> Vec<Effect> {
    let planner = amf_directory::planner_for(world.sg.redundancy_model);

    let su_ids: Vec<SuId> = world
        .sus
        .values()
        .filter(|su| su.sg == world.sg.id)
        .map(|su| su.id)
        .collect();
    let su_refs: Vec<&Su> = su_ids.iter().map(|id| &world.sus[id]).collect();
    let si_ids: Vec<SiId> = world
        .sis
        .values()
        .filter(|si| si.sg == world.sg.id)
        .map(|si| si.id)
        .collect();
    let si_refs: Vec<&Si> = si_ids.iter().map(|id| &world.sis[id]).collect();

    let assignments = planner.choose_and_assign(world.sg, &su_refs, &si_refs);

    let mut effects = Vec::new();
    for a in &assignments {
        // A planner may name an SU that already carries a SUSI for this
        // SI — a role promotion (STANDBY -> ACTIVE) rather than a brand
        // new pairing. Modify it in place instead of pushing a duplicate.
        let previous_ha = if let Some(susi) = world.susis.iter_mut().find(|s| s.su == a.su && s.si == a.si) {
            let previous = susi.ha_state;
            susi.ha_state = a.ha_state;
            susi.fsm = SusiFsm::Modify;
            Some(previous)
        } else {
            world.susis.push(Susi::new(a.su, a.si, a.ha_state));
            None
        };

        if let Some(su) = world.sus.get_mut(&a.su) {
            if !su.assigned_sis.contains(&a.si) {
                su.assigned_sis.push(a.si);
            }
            match previous_ha {
                Some(HaState::Active) => su.active_count = su.active_count.saturating_sub(1),
                Some(HaState::Standby) => su.standby_count = su.standby_count.saturating_sub(1),
                _ => {}
            }
            match a.ha_state {
                HaState::Active => su.active_count += 1,
                HaState::Standby => su.standby_count += 1,
                _ => {}
            }
        }
        if let Some(si) = world.sis.get_mut(&a.si) {
            if !si.susis.contains(&a.su) {
                si.susis.push(a.su);
            }
        }
        world.sg.add_to_oper_list(a.su);
        effects.push(Effect::IssueSusi {
            su: a.su,
            si: a.si,
            ha_state: a.ha_state,
        });
    }

    if !assignments.is_empty() {
        world.sg.fsm_state = SgFsmState::SgRealign;
    } else if matches!(world.sg.fsm_state, SgFsmState::SgRealign) {
        world.sg.try_settle_to_stable();
    }

    effects
}

/// spec.md §4.3 "SU fault".
fn on_su_fault(world: &mut SgWorld<'_>, su_id: SuId) -> Vec<Effect> {
    let mut effects = Vec::new();

    match world.sg.fsm_state {
        SgFsmState::Stable => {
            if let Some(su) = world.sus.get_mut(&su_id) {
                su.failed = true;
            }
            // modify-all-QUIESCED to the faulted SU.
            for susi in world.susis.iter_mut().filter(|s| s.su == su_id) {
                susi.pre_quiesce_ha_state = Some(susi.ha_state);
                susi.ha_state = HaState::Quiescing;
                susi.fsm = SusiFsm::Modify;
                effects.push(Effect::IssueSusi {
                    su: su_id,
                    si: susi.si,
                    ha_state: HaState::Quiescing,
                });
            }
            world.sg.add_to_oper_list(su_id);
            world.sg.fsm_state = SgFsmState::SuOper;
        }
        SgFsmState::SuOper => {
            if world.sg.su_oper_list.contains(&su_id) {
                let all_quiescing = world
                    .susis
                    .iter()
                    .filter(|s| s.su == su_id)
                    .all(|s| s.ha_state == HaState::Quiescing);
                if all_quiescing {
                    for susi in world.susis.iter_mut().filter(|s| s.su == su_id) {
                        susi.ha_state = HaState::Quiesced;
                        susi.fsm = SusiFsm::Asgnd;
                    }
                    finish_admin_su_if_shutting_down(world, su_id);
                }
            }
        }
        SgFsmState::SiOper => {
            if let Some(admin_si) = world.sg.admin_si {
                let only_assignment_here = world
                    .susis
                    .iter()
                    .filter(|s| s.si == admin_si)
                    .all(|s| s.su == su_id);
                if only_assignment_here {
                    if let Some(si) = world.sis.get_mut(&admin_si) {
                        si.admin_state = AdminState::Locked;
                    }
                    world.sg.admin_si = None;
                }
            }
        }
        _ => {}
    }

    effects
}

fn finish_admin_su_if_shutting_down(world: &mut SgWorld<'_>, su_id: SuId) {
    if let Some(su) = world.sus.get_mut(&su_id) {
        if matches!(su.admin_state, AdminState::ShuttingDown) {
            su.admin_state = AdminState::Locked;
        }
    }
}

/// spec.md §4.3 "SUSI success". A `Mod` ack that finishes quiescing a SU
/// under an in-progress SU-fault (all its SUSIs QUIESCED, SU still on the
/// oper list) is itself terminal for that assignment: the SU is faulted,
/// so there is nothing left to modify it *to* — the kernel frees the
/// SUSI in the same step rather than waiting for a separate DEL ack.
fn on_susi_success(world: &mut SgWorld<'_>, su_id: SuId, si_id: SiId, action: SusiAction) -> Vec<Effect> {
    let mut effects = Vec::new();
    // While a SU sits on the fault oper list, the only `Mod` it is ever
    // sent is the QUIESCING one (spec.md Open Question #3: QUIESCING and
    // QUIESCED are treated as the same "HA changed" event here) — so a
    // `Mod` ack arriving for it is always that quiesce completing.
    let su_fault_quiesce_done = !matches!(action, SusiAction::Del)
        && matches!(world.sg.fsm_state, SgFsmState::SuOper)
        && world.sg.su_oper_list.contains(&su_id);
    // Same pattern for an admin-lock/shutdown quiesce (spec.md §4.3
    // "Admin SG-lock / shutdown"): the MOD it's waiting on is the one
    // `on_admin_change` issued, and its ack is terminal for the SUSI.
    let admin_quiesce_done = !matches!(action, SusiAction::Del)
        && matches!(world.sg.fsm_state, SgFsmState::SgAdmin)
        && world.sg.su_oper_list.contains(&su_id);
    let quiesce_done = su_fault_quiesce_done || admin_quiesce_done;

    if matches!(action, SusiAction::Del) || quiesce_done {
        let freed_ha_state = world
            .susis
            .iter()
            .find(|s| s.su == su_id && s.si == si_id)
            .map(|s| s.pre_quiesce_ha_state.unwrap_or(s.ha_state));
        world.susis.retain(|s| !(s.su == su_id && s.si == si_id));
        if let Some(su) = world.sus.get_mut(&su_id) {
            su.assigned_sis.retain(|si| *si != si_id);
            match freed_ha_state {
                Some(HaState::Active) => su.active_count = su.active_count.saturating_sub(1),
                Some(HaState::Standby) => su.standby_count = su.standby_count.saturating_sub(1),
                _ => {}
            }
        }
        if let Some(si) = world.sis.get_mut(&si_id) {
            si.susis.retain(|su| *su != su_id);
        }
        if quiesce_done {
            effects.push(Effect::FreeSusi { su: su_id, si: si_id });
        }

        let su_has_no_assignments = world.susis.iter().all(|s| s.su != su_id);
        if su_has_no_assignments {
            world.sg.remove_from_oper_list(su_id);
            if admin_quiesce_done {
                if let Some(su) = world.sus.get_mut(&su_id) {
                    su.admin_state = AdminState::Locked;
                }
            }
        }
    } else {
        for susi in world.susis.iter_mut().filter(|s| s.su == su_id && s.si == si_id) {
            susi.fsm = SusiFsm::Asgnd;
        }
        // A freshly planned Assign/Modify drains the SU off the oper
        // list once every SUSI the planner gave it has settled.
        if matches!(world.sg.fsm_state, SgFsmState::SgRealign) && world.sg.su_oper_list.contains(&su_id) {
            let su_settled = world
                .susis
                .iter()
                .filter(|s| s.su == su_id)
                .all(|s| matches!(s.fsm, SusiFsm::Asgnd));
            if su_settled {
                world.sg.remove_from_oper_list(su_id);
            }
        }
    }

    if world.sg.su_oper_list.is_empty() && world.sg.admin_si.is_none() {
        if matches!(world.sg.fsm_state, SgFsmState::SgRealign) || su_fault_quiesce_done {
            effects.extend(run_planner(world));
            if effects.is_empty() {
                world.sg.try_settle_to_stable();
            }
            return effects;
        }
        if matches!(world.sg.fsm_state, SgFsmState::SgAdmin) {
            world.sg.try_settle_to_stable();
            if let Some(invocation_id) = world.sg.admin_invocation.take() {
                effects.push(Effect::AdminOpResult { invocation_id, result: Ok(()) });
            }
            return effects;
        }
        world.sg.try_settle_to_stable();
    }

    effects
}

/// spec.md §4.3 "SUSI failure": best-effort forced quiesced + DEL,
/// reporting component-failover upward if the SU's policy requires it.
fn on_susi_failure(world: &mut SgWorld<'_>, su_id: SuId, si_id: SiId) -> Vec<Effect> {
    let mut effects = Vec::new();
    let freed_ha_states: Vec<HaState> = world
        .susis
        .iter()
        .filter(|s| s.su == su_id && s.si == si_id)
        .map(|s| s.pre_quiesce_ha_state.unwrap_or(s.ha_state))
        .collect();
    for susi in world.susis.iter_mut().filter(|s| s.su == su_id && s.si == si_id) {
        susi.ha_state = HaState::Quiesced;
        susi.fsm = SusiFsm::Unasgn;
    }
    effects.push(Effect::FreeSusi { su: su_id, si: si_id });

    if let Some(su) = world.sus.get_mut(&su_id) {
        for ha in freed_ha_states {
            match ha {
                HaState::Active => su.active_count = su.active_count.saturating_sub(1),
                HaState::Standby => su.standby_count = su.standby_count.saturating_sub(1),
                _ => {}
            }
        }
    }

    if let Some(su) = world.sus.get(&su_id) {
        if matches!(su.failover_policy, amf_types::SuFailoverPolicy::Enabled) {
            effects.push(Effect::EscalateRecovery {
                scope: crate::effects::EscalationScope::Su(su_id),
                recommendation: amf_types::RecoveryRecommendation::SuFailover,
            });
        }
    }

    effects
}

/// spec.md §4.3 "Node fail".
fn on_node_fail(world: &mut SgWorld<'_>, node: NodeId) -> Vec<Effect> {
    let mut effects = Vec::new();
    let affected_sus: Vec<SuId> = world
        .sus
        .values()
        .filter(|su| su.node == Some(node) && su.sg == world.sg.id)
        .map(|su| su.id)
        .collect();

    for su_id in &affected_sus {
        let si_ids: Vec<SiId> = world
            .susis
            .iter()
            .filter(|s| s.su == *su_id)
            .map(|s| s.si)
            .collect();
        for si_id in si_ids {
            effects.push(Effect::FreeSusi { su: *su_id, si: si_id });
            if let Some(si) = world.sis.get_mut(&si_id) {
                si.susis.retain(|su| su != su_id);
            }
        }
        world.susis.retain(|s| s.su != *su_id);
        if let Some(su) = world.sus.get_mut(su_id) {
            su.assigned_sis.clear();
            su.active_count = 0;
            su.standby_count = 0;
        }
        world.sg.remove_from_oper_list(*su_id);
    }

    world.sg.admin_si = None;
    effects.extend(run_planner(world));
    effects
}

/// spec.md §4.3 "Admin SG-lock / shutdown". A SU with no assignments
/// locks immediately; one with live SUSIs is quiesced first, and its
/// oper-list ack (`on_susi_success`'s `admin_quiesce_done` branch) is
/// what finally locks it. Either way exactly one `Effect::AdminOpResult`
/// is produced for this invocation: now, if nothing needed quiescing, or
/// later, once the last quiesced SU drains the oper-list.
fn on_admin_change(world: &mut SgWorld<'_>, target: AdminTarget, invocation_id: u64) -> Vec<Effect> {
    let mut effects = Vec::new();

    let sg_su_ids: Vec<SuId> = match target {
        AdminTarget::Sg => world
            .sus
            .values()
            .filter(|su| su.sg == world.sg.id)
            .map(|su| su.id)
            .collect(),
        AdminTarget::Su(su_id) => vec![su_id],
    };

    let shutdown = matches!(world.sg.admin_state, AdminState::ShuttingDown);

    for su_id in &sg_su_ids {
        let has_assignment = world.susis.iter().any(|s| s.su == *su_id);
        if !has_assignment {
            if let Some(su) = world.sus.get_mut(su_id) {
                su.admin_state = AdminState::Locked;
            }
            continue;
        }
        for susi in world.susis.iter_mut().filter(|s| s.su == *su_id) {
            susi.pre_quiesce_ha_state = Some(susi.ha_state);
            let target_ha = if shutdown {
                HaState::Quiescing
            } else {
                HaState::Quiesced
            };
            susi.ha_state = target_ha;
            susi.fsm = SusiFsm::Modify;
            effects.push(Effect::IssueSusi {
                su: *su_id,
                si: susi.si,
                ha_state: target_ha,
            });
        }
        world.sg.add_to_oper_list(*su_id);
    }

    if world.sg.su_oper_list.is_empty() {
        effects.push(Effect::AdminOpResult { invocation_id, result: Ok(()) });
    } else {
        world.sg.admin_invocation = Some(invocation_id);
        world.sg.fsm_state = SgFsmState::SgAdmin;
    }

    effects
}
