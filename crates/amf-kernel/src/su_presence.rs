//! SU presence aggregator (spec.md §4.2).
//!
//! Rolls up per-component [`Presence`] into the SU-level presence and
//! calls back into the SG FSM (via the returned [`SuTerminal`]) on
//! terminal transitions.

use amf_types::{Component, OperState, Presence, Su};

use crate::effects::Effect;

/// Terminal SU-presence transitions the SG FSM reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuTerminal {
    Instantiated,
    InstantiationFailed,
    TerminationFailed,
    Uninstantiated,
    Restarting,
    Terminating,
}

/// Extra context the aggregator needs that isn't on [`Su`] itself.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorContext {
    pub shutting_down: bool,
    pub su_failover_in_progress: bool,
}

/// Recomputes `su.presence` from its components' presences and returns
/// the terminal transition (if any) plus side effects to perform.
pub fn update_su_presence(
    su: &mut Su,
    components: &[&Component],
    ctx: AggregatorContext,
) -> Option<(SuTerminal, Vec<Effect>)> {
    if components.is_empty() {
        return None;
    }

    let all = |p: Presence| components.iter().all(|c| c.presence == p);
    let any = |p: Presence| components.iter().any(|c| c.presence == p);

    let previous = su.presence;

    if any(Presence::InstantiationFailed) {
        su.presence = Presence::InstantiationFailed;
        if previous != su.presence {
            su.failed = true;
            return Some((SuTerminal::InstantiationFailed, Vec::new()));
        }
        return None;
    }

    if any(Presence::TerminationFailed) {
        su.presence = Presence::TerminationFailed;
        if previous != su.presence {
            su.failed = true;
            return Some((SuTerminal::TerminationFailed, Vec::new()));
        }
        return None;
    }

    if all(Presence::Instantiated) {
        su.presence = Presence::Instantiated;
        if previous != su.presence {
            su.oper_state = OperState::Enabled;
            su.failed = false;
            // Readiness recomputation and CSI reassignment are driven
            // by the SG FSM reacting to this terminal transition, not
            // by the aggregator itself.
            return Some((SuTerminal::Instantiated, Vec::new()));
        }
        return None;
    }

    if all(Presence::Uninstantiated) {
        su.presence = Presence::Uninstantiated;
        if previous != su.presence {
            let mut effects = Vec::new();
            if su.pre_instantiable {
                // Non-pre-instantiable case handled at the component
                // level; for NPI SUs the operational state follows the
                // assigned state rather than presence.
            } else {
                su.oper_state = OperState::Enabled;
            }
            if su.failed
                && su.assigned_sis.is_empty()
                && !ctx.shutting_down
                && !ctx.su_failover_in_progress
            {
                effects.push(Effect::LaunchClcCommand {
                    comp: components[0].id,
                    command: crate::effects::ClcCommandKind::Instantiate,
                    timeout: std::time::Duration::from_secs(0),
                    error_source: None,
                });
            }
            return Some((SuTerminal::Uninstantiated, effects));
        }
        return None;
    }

    if any(Presence::Restarting) {
        su.presence = Presence::Restarting;
        if previous != su.presence {
            return Some((SuTerminal::Restarting, Vec::new()));
        }
        return None;
    }

    if any(Presence::Terminating) {
        su.presence = Presence::Terminating;
        if previous != su.presence {
            return Some((SuTerminal::Terminating, Vec::new()));
        }
        return None;
    }

    // Mixed Instantiating / Instantiated with no failure or terminal
    // condition yet: presence tracks Instantiating, no SG callback.
    if any(Presence::Instantiating) {
        su.presence = Presence::Instantiating;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_types::{
        Capability, ClcCommandSet, ComponentConfig, CompId, CsTypeId, SgId, SuId,
    };

    fn comp(id: u32, presence: Presence) -> Component {
        let mut c = Component::new(
            CompId::new(id),
            SuId::new(1),
            ComponentConfig {
                comp_type: "t".into(),
                cs_type: CsTypeId::new(1),
                capability: Capability::NonPreInstantiable,
                pre_instantiable: false,
                clc: ClcCommandSet::default(),
                env: Vec::new(),
                inst_retry_max: 3,
                no_retry_exit_code: None,
            },
        );
        c.presence = presence;
        c
    }

    #[test]
    fn all_instantiated_enables_su() {
        let mut su = Su::new(SuId::new(1), SgId::new(1), None);
        let c1 = comp(1, Presence::Instantiated);
        let c2 = comp(2, Presence::Instantiated);
        let ctx = AggregatorContext {
            shutting_down: false,
            su_failover_in_progress: false,
        };
        let result = update_su_presence(&mut su, &[&c1, &c2], ctx);
        assert_eq!(result.unwrap().0, SuTerminal::Instantiated);
        assert_eq!(su.oper_state, OperState::Enabled);
    }

    #[test]
    fn any_instantiation_failed_marks_su_failed() {
        let mut su = Su::new(SuId::new(1), SgId::new(1), None);
        let c1 = comp(1, Presence::Instantiated);
        let c2 = comp(2, Presence::InstantiationFailed);
        let ctx = AggregatorContext {
            shutting_down: false,
            su_failover_in_progress: false,
        };
        let result = update_su_presence(&mut su, &[&c1, &c2], ctx);
        assert_eq!(result.unwrap().0, SuTerminal::InstantiationFailed);
        assert!(su.failed);
    }
}
