//! Component-level data model (spec.md §3 "Component", §4.1 "CLC FSM").

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::{CompId, CsTypeId, SuId};
use crate::states::{ComponentErrorSource, Presence};

/// Whether a component can host more than one active assignment
/// (`SA_AMF_COMP_X_ACTIVE_AND_Y_STANDBY` family, simplified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    XActiveAndYStandby,
    XActiveOrXStandby,
    OneActiveOrOneStandby,
    NonPreInstantiable,
}

/// A single CLC command: the script path plus its timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClcCommand {
    pub path: String,
    pub timeout: Duration,
}

/// The full set of CLC commands a component may be driven through
/// (spec.md §4.1). `amstart`/`amstop`/`healthcheck` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClcCommandSet {
    pub instantiate: Option<ClcCommand>,
    pub terminate: Option<ClcCommand>,
    pub cleanup: Option<ClcCommand>,
    pub amstart: Option<ClcCommand>,
    pub amstop: Option<ClcCommand>,
    pub healthcheck: Option<ClcCommand>,
}

/// Static configuration for a component, as pushed by `REG_SU`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub comp_type: String,
    pub cs_type: CsTypeId,
    pub capability: Capability,
    pub pre_instantiable: bool,
    pub clc: ClcCommandSet,
    /// Extra environment entries applied to every CLC invocation
    /// (spec.md §4.1 "Environment passed to every CLC command").
    pub env: Vec<(String, String)>,
    /// Bound on INSTANTIATE retries before giving up (`inst_retry_max`).
    pub inst_retry_max: u32,
    /// The `no_retry` sentinel exit code (spec.md §4.1): an INSTANTIATE
    /// failure exiting with this code aborts retries immediately instead
    /// of counting against `inst_retry_max`.
    pub no_retry_exit_code: Option<i32>,
}

/// A single outstanding callback awaiting a reply from the component
/// (invocation id + admin-op id, spec.md §3 "Service Unit").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCallback {
    pub invocation_id: u64,
    pub admin_op_id: Option<crate::states::AdminOpId>,
}

/// Error information recorded the last time a component faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentErrorInfo {
    pub source: ComponentErrorSource,
    pub recovery: crate::states::RecoveryRecommendation,
}

/// A process-level entity inside an SU (spec.md §3 "Component").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: CompId,
    pub su: SuId,
    pub config: ComponentConfig,
    pub presence: Presence,
    /// Set once the component has registered with the local agent
    /// (relevant only for pre-instantiable components).
    pub registered: bool,
    /// The proxy component, if this component is proxied.
    pub proxy: Option<CompId>,
    /// Number of CSIs currently assigned to this component.
    pub csi_count: u32,
    /// Cumulative restarts, reset only by probation-timer expiry
    /// (spec.md §4.4).
    pub restart_count: u32,
    /// INSTANTIATE retry attempts within the current instantiation
    /// sequence; reset to zero on reaching `Instantiated`
    /// (SPEC_FULL.md §11).
    pub inst_retry_count: u32,
    pub pending_callback: Option<PendingCallback>,
    pub last_error: Option<ComponentErrorInfo>,
}

impl Component {
    pub fn new(id: CompId, su: SuId, config: ComponentConfig) -> Self {
        Self {
            id,
            su,
            config,
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

    pub fn is_proxied(&self) -> bool {
        self.proxy.is_some()
    }

    /// Whether this component needs to actively register (pre-instantiable)
    /// versus being considered instantiated as soon as the script exits 0.
    pub fn requires_registration(&self) -> bool {
        self.config.pre_instantiable
    }

    pub fn retries_exhausted(&self) -> bool {
        self.inst_retry_count >= self.config.inst_retry_max
    }
}
