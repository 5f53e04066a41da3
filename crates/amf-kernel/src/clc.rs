//! Component Lifecycle Controller FSM (spec.md §4.1).
//!
//! A fixed transition matrix; any `(state, event)` pair not listed here is
//! a no-op, matching spec.md's "unlisted pairs are no-ops" rule.

use amf_types::{ComponentErrorSource, Component, Presence};

use crate::effects::{ClcCommandKind, Effect};

/// CLC events driving [`Presence`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClcEvent {
    Inst,
    InstSucc,
    /// `exit_code` is `None` for an exec-failure or signal-exit outcome
    /// (spec.md §4.1 executor outcomes), `Some(code)` on a normal
    /// non-zero exit — the only case the `no_retry` sentinel can match.
    InstFail { exit_code: Option<i32> },
    Term,
    TermSucc,
    TermFail,
    Cleanup,
    CleanupSucc,
    CleanupFail,
    Restart,
    /// Proxied-only: the owning proxy has disappeared.
    Orph,
}

/// Applies one CLC event to a component, mutating its [`Presence`] and
/// retry counter, and returning the effects the runtime must perform.
///
/// This is the sole place the `inst_retry_max` bound and the `no_retry`
/// sentinel exit code (spec.md §4.1) are enforced.
pub fn clc_transition(comp: &mut Component, event: ClcEvent) -> Vec<Effect> {
    use Presence::*;

    // Proxied components deliver CLEANUP as an up-call to the proxy
    // rather than launching a local script (spec.md §4.1); that
    // distinction is made by the runtime when it executes the effect
    // (it inspects `comp.proxy`), not here.

    if matches!(event, ClcEvent::Orph) {
        if comp.is_proxied() {
            comp.presence = Orphaned;
        }
        return Vec::new();
    }

    match (comp.presence, event) {
        (Uninstantiated, ClcEvent::Inst) => {
            comp.presence = Instantiating;
            comp.inst_retry_count = 0;
            vec![launch(comp, ClcCommandKind::Instantiate, None)]
        }

        (Instantiating, ClcEvent::InstSucc) => {
            if comp.requires_registration() && !comp.registered {
                // Command exited zero but the component hasn't
                // registered yet: stay INSTANTIATING and arm the
                // comp-reg timer; its expiry re-raises InstFail.
                vec![Effect::StartCompRegTimer { comp: comp.id }]
            } else {
                comp.presence = Instantiated;
                comp.inst_retry_count = 0;
                Vec::new()
            }
        }

        (Instantiating, ClcEvent::InstFail { exit_code }) => {
            let is_no_retry_sentinel = exit_code.is_some() && exit_code == comp.config.no_retry_exit_code;
            comp.inst_retry_count += 1;
            if is_no_retry_sentinel || comp.retries_exhausted() {
                comp.presence = InstantiationFailed;
                Vec::new()
            } else {
                vec![launch(comp, ClcCommandKind::Instantiate, None)]
            }
        }

        (Instantiated, ClcEvent::Term) => {
            comp.presence = Terminating;
            vec![
                Effect::StopHealthMonitoring { comp: comp.id },
                launch(comp, ClcCommandKind::Terminate, None),
            ]
        }

        (Instantiated, ClcEvent::Restart) => {
            comp.presence = Restarting;
            comp.restart_count += 1;
            vec![
                Effect::StopHealthMonitoring { comp: comp.id },
                launch(comp, ClcCommandKind::Terminate, None),
            ]
        }

        (Terminating, ClcEvent::TermSucc) => {
            comp.presence = Uninstantiated;
            Vec::new()
        }

        (Terminating, ClcEvent::TermFail) => {
            vec![launch(
                comp,
                ClcCommandKind::Cleanup,
                Some(ComponentErrorSource::Other(0)),
            )]
        }

        (Restarting, ClcEvent::TermSucc) => {
            comp.presence = Instantiating;
            comp.inst_retry_count = 0;
            vec![launch(comp, ClcCommandKind::Instantiate, None)]
        }

        (Restarting, ClcEvent::TermFail) => {
            vec![launch(
                comp,
                ClcCommandKind::Cleanup,
                Some(ComponentErrorSource::Other(0)),
            )]
        }

        // CLEANUP is retried/escalated with an error-source hint
        // (spec.md §4.1); the caller supplies the real source via the
        // Cleanup(source) variant constructed in `cleanup_with_source`.
        (Terminating | Restarting, ClcEvent::Cleanup) => {
            vec![launch(comp, ClcCommandKind::Cleanup, comp.last_error.map(|e| e.source))]
        }

        (Terminating, ClcEvent::CleanupSucc) => {
            comp.presence = Uninstantiated;
            Vec::new()
        }
        (Restarting, ClcEvent::CleanupSucc) => {
            comp.presence = Instantiating;
            comp.inst_retry_count = 0;
            vec![launch(comp, ClcCommandKind::Instantiate, None)]
        }

        (Terminating, ClcEvent::CleanupFail) => {
            comp.presence = TerminationFailed;
            Vec::new()
        }
        (Restarting, ClcEvent::CleanupFail) => {
            comp.presence = TerminationFailed;
            Vec::new()
        }

        // All other (state, event) pairs are no-ops.
        _ => Vec::new(),
    }
}

fn launch(
    comp: &Component,
    kind: ClcCommandKind,
    error_source: Option<ComponentErrorSource>,
) -> Effect {
    let timeout = match kind {
        ClcCommandKind::Instantiate => comp.config.clc.instantiate.as_ref(),
        ClcCommandKind::Terminate => comp.config.clc.terminate.as_ref(),
        ClcCommandKind::Cleanup => comp.config.clc.cleanup.as_ref(),
        ClcCommandKind::AmStart => comp.config.clc.amstart.as_ref(),
        ClcCommandKind::AmStop => comp.config.clc.amstop.as_ref(),
        ClcCommandKind::HealthCheck => comp.config.clc.healthcheck.as_ref(),
    }
    .map(|c| c.timeout)
    .unwrap_or_default();

    Effect::LaunchClcCommand {
        comp: comp.id,
        command: kind,
        timeout,
        error_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_types::{ClcCommand, ClcCommandSet, Capability, ComponentConfig, CompId, CsTypeId, SuId};
    use std::time::Duration;

    fn test_component(pre_instantiable: bool, retry_max: u32) -> Component {
        let config = ComponentConfig {
            comp_type: "test".into(),
            cs_type: CsTypeId::new(1),
            capability: Capability::NonPreInstantiable,
            pre_instantiable,
            clc: ClcCommandSet {
                instantiate: Some(ClcCommand {
                    path: "/bin/true".into(),
                    timeout: Duration::from_secs(5),
                }),
                terminate: Some(ClcCommand {
                    path: "/bin/true".into(),
                    timeout: Duration::from_secs(5),
                }),
                cleanup: Some(ClcCommand {
                    path: "/bin/true".into(),
                    timeout: Duration::from_secs(5),
                }),
                ..Default::default()
            },
            env: Vec::new(),
            inst_retry_max: retry_max,
            no_retry_exit_code: None,
        };
        Component::new(CompId::new(1), SuId::new(1), config)
    }

    #[test]
    fn non_preinstantiable_instantiates_on_zero_exit() {
        let mut comp = test_component(false, 3);
        clc_transition(&mut comp, ClcEvent::Inst);
        assert_eq!(comp.presence, Presence::Instantiating);
        clc_transition(&mut comp, ClcEvent::InstSucc);
        assert_eq!(comp.presence, Presence::Instantiated);
    }

    #[test]
    fn preinstantiable_waits_for_registration() {
        let mut comp = test_component(true, 3);
        clc_transition(&mut comp, ClcEvent::Inst);
        let effects = clc_transition(&mut comp, ClcEvent::InstSucc);
        assert_eq!(comp.presence, Presence::Instantiating);
        assert!(matches!(effects[0], Effect::StartCompRegTimer { .. }));
        comp.registered = true;
        let effects = clc_transition(&mut comp, ClcEvent::InstSucc);
        assert_eq!(comp.presence, Presence::Instantiated);
        assert!(effects.is_empty());
    }

    #[test]
    fn instantiation_retries_bounded_by_inst_retry_max() {
        let mut comp = test_component(false, 2);
        clc_transition(&mut comp, ClcEvent::Inst);
        let e1 = clc_transition(&mut comp, ClcEvent::InstFail { exit_code: Some(1) });
        assert_eq!(comp.presence, Presence::Instantiating);
        assert!(!e1.is_empty());
        let e2 = clc_transition(&mut comp, ClcEvent::InstFail { exit_code: Some(1) });
        assert_eq!(comp.presence, Presence::InstantiationFailed);
        assert!(e2.is_empty());
    }

    #[test]
    fn no_retry_sentinel_exit_code_aborts_instantiation_early() {
        let mut comp = test_component(false, 5);
        comp.config.no_retry_exit_code = Some(99);
        clc_transition(&mut comp, ClcEvent::Inst);
        let effects = clc_transition(&mut comp, ClcEvent::InstFail { exit_code: Some(99) });
        assert_eq!(comp.presence, Presence::InstantiationFailed);
        assert!(effects.is_empty());
        assert_eq!(comp.inst_retry_count, 1);
    }

    #[test]
    fn unlisted_pair_is_a_no_op() {
        let mut comp = test_component(false, 3);
        let before = comp.presence;
        let effects = clc_transition(&mut comp, ClcEvent::TermSucc);
        assert_eq!(comp.presence, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn health_monitoring_torn_down_before_leaving_instantiated() {
        let mut comp = test_component(false, 3);
        comp.presence = Presence::Instantiated;
        let effects = clc_transition(&mut comp, ClcEvent::Term);
        assert!(matches!(effects[0], Effect::StopHealthMonitoring { .. }));
    }
}
