//! Effects produced by the kernel FSMs.
//!
//! Like the teacher's kernel, this crate is pure: it never launches a
//! process, starts a timer, or sends a message. Every side effect it
//! wants performed is returned as an [`Effect`] for the runtime (node
//! director / director event loop) to execute.

use std::time::Duration;

use amf_types::{
    ComponentErrorSource, CompId, HaState, NodeId, RecoveryRecommendation, SiId, SuId,
};

/// An effect for the runtime to execute after a kernel transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Launch a CLC command for a component (spec.md §4.1).
    LaunchClcCommand {
        comp: CompId,
        command: ClcCommandKind,
        timeout: Duration,
        error_source: Option<ComponentErrorSource>,
    },
    /// Start (or restart) the component-registration timer.
    StartCompRegTimer { comp: CompId },
    /// Start a probation timer for the given escalation scope.
    StartProbationTimer { scope: EscalationScope, duration: Duration },
    /// Tear down passive health monitoring before leaving INSTANTIATED.
    StopHealthMonitoring { comp: CompId },
    /// Issue a new or modified SU-SI assignment to the node director.
    IssueSusi {
        su: SuId,
        si: SiId,
        ha_state: HaState,
    },
    /// Request removal of a SU-SI assignment.
    FreeSusi { su: SuId, si: SiId },
    /// Escalate recovery to the given level.
    EscalateRecovery {
        scope: EscalationScope,
        recommendation: RecoveryRecommendation,
    },
    /// Reboot the local node ("reboot-to-repair", spec.md §4.1) or, when
    /// issued by the director, `D2N_REBOOT` (spec.md §4.4, §6).
    RebootNode { node: NodeId },
    /// Deliver an admin-operation result to the daemon/caller.
    AdminOpResult {
        invocation_id: u64,
        result: Result<(), amf_types::AisError>,
    },
}

/// Which CLC script to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClcCommandKind {
    Instantiate,
    Terminate,
    Cleanup,
    AmStart,
    AmStop,
    HealthCheck,
}

/// The scope a recovery-escalation counter/timer applies to
/// (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscalationScope {
    Component(CompId),
    Su(SuId),
    Node(NodeId),
}
