//! Enumerated states shared across the data model (spec.md §3).

use serde::{Deserialize, Serialize};

/// Administrative state, settable by an operator and honored by the SG FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminState {
    Unlocked,
    Locked,
    LockedInstantiation,
    ShuttingDown,
}

impl Default for AdminState {
    fn default() -> Self {
        AdminState::Unlocked
    }
}

/// Operational state: is the entity able to do work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperState {
    Enabled,
    Disabled,
}

impl Default for OperState {
    fn default() -> Self {
        OperState::Disabled
    }
}

/// Node membership state (spec.md §3 "Node").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Absent,
    NoConfig,
    NcsInit,
    Present,
    GoDown,
}

impl Default for NodeState {
    fn default() -> Self {
        NodeState::Absent
    }
}

/// SU readiness, derived from admin/oper state and assignment load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    InService,
    OutOfService,
    Stopping,
}

impl Default for Readiness {
    fn default() -> Self {
        Readiness::OutOfService
    }
}

/// SU presence, driven by the [`crate::component::ClcEvent`] aggregate
/// (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Uninstantiated,
    Instantiating,
    Instantiated,
    Terminating,
    Restarting,
    InstantiationFailed,
    TerminationFailed,
    /// Proxied-only: the proxy that would terminate it is itself gone.
    Orphaned,
}

impl Default for Presence {
    fn default() -> Self {
        Presence::Uninstantiated
    }
}

/// HA state carried by a [`crate::susi::Susi`] assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaState {
    Active,
    Standby,
    Quiescing,
    Quiesced,
}

/// Per-assignment FSM driving a [`crate::susi::Susi`] from issue to
/// completion (spec.md §3 "SUSI").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SusiFsm {
    /// A new assignment has been issued, awaiting the ND's ack.
    Asgn,
    /// The assignment is stable and acknowledged.
    Asgnd,
    /// An HA-state change is in flight (e.g. ACTIVE -> QUIESCING).
    Modify,
    /// A removal is in flight; only transitions to freed.
    Unasgn,
}

/// Redundancy model of a Service Group (spec.md §3 "Service Group").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedundancyModel {
    TwoN,
    NPlusM,
    NWay,
    NWayActive,
    NoRedundancy,
}

/// SG FSM state (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SgFsmState {
    Stable,
    SgRealign,
    SuOper,
    SiOper,
    SgAdmin,
}

impl Default for SgFsmState {
    fn default() -> Self {
        SgFsmState::Stable
    }
}

/// SI-SI dependency state (spec.md §3 "Service Instance").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyState {
    Assigned,
    Unassigned,
    SponsorUnassigned,
    UnassigningDueToDep,
}

impl Default for DependencyState {
    fn default() -> Self {
        DependencyState::Unassigned
    }
}

/// Whether an SU has an in-flight operator-initiated HA switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchState {
    Stable,
    Switch,
}

impl Default for SwitchState {
    fn default() -> Self {
        SwitchState::Stable
    }
}

/// SU failover policy (`saAmfSUFailover`): whether an SU-level fault
/// should be escalated directly to SU failover rather than restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuFailoverPolicy {
    Disabled,
    Enabled,
}

impl Default for SuFailoverPolicy {
    fn default() -> Self {
        SuFailoverPolicy::Disabled
    }
}

/// Admin operation identifiers accepted on an SU (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminOpId {
    Unlock,
    Lock,
    Shutdown,
    LockInstantiation,
    UnlockInstantiation,
    Repaired,
}

/// Opaque error-source hint passed to the CLEANUP command via
/// `OSAF_COMPONENT_ERROR_SOURCE` (spec.md §4.1, §4.4). Logged, never
/// interpreted by the SG FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentErrorSource {
    HealthCheckFailure,
    ProxiedRegistrationTimeout,
    ForcedFailover,
    Other(u32),
}

impl ComponentErrorSource {
    /// The numeric value passed via the environment variable.
    pub fn as_env_value(self) -> u32 {
        match self {
            ComponentErrorSource::HealthCheckFailure => 1,
            ComponentErrorSource::ProxiedRegistrationTimeout => 2,
            ComponentErrorSource::ForcedFailover => 3,
            ComponentErrorSource::Other(v) => v,
        }
    }
}

/// Recovery recommendation escalated up from component/SU fault handling
/// (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryRecommendation {
    ComponentRestart,
    SuRestart,
    SuFailover,
    NodeFailover,
    NodeFailfast,
}
