//! # amf-kernel: the pure functional core of the AMF control plane
//!
//! Every FSM here is a plain function over owned state: given the
//! current entity state and an event, it mutates the state in place and
//! returns the [`effects::Effect`]s the runtime must carry out. Nothing
//! in this crate launches a process, starts a timer, or touches a
//! socket — that discipline is what makes the escalation ladder and the
//! SG FSM property-testable (see `amf-properties`) without a live
//! cluster.
//!
//! Modules:
//! - [`clc`]: Component Lifecycle Controller FSM (spec.md §4.1).
//! - [`su_presence`]: SU presence aggregator (spec.md §4.2).
//! - [`sg_fsm`]: Service Group FSM (spec.md §4.3), dispatching into
//!   `amf-directory` for choose-and-assign.
//! - [`escalation`]: recovery escalation ladder (spec.md §4.4).
//! - [`admin_policy`]: SU admin-operation policy table (spec.md §6).
//! - [`state`]: the `DirectorState` arena tying entities together by id.
//! - [`effects`]: the `Effect` vocabulary every FSM emits into.

pub mod admin_policy;
pub mod clc;
pub mod effects;
pub mod escalation;
pub mod sg_fsm;
pub mod state;
pub mod su_presence;

pub use admin_policy::{admin_op_policy, outcome_error, AdminOpOutcome};
pub use clc::{clc_transition, ClcEvent};
pub use effects::{ClcCommandKind, EscalationScope, Effect};
pub use escalation::{EscalationCounters, EscalationThresholds};
pub use sg_fsm::{sg_fsm_step, AdminTarget, SgEvent, SgWorld, SusiAction};
pub use state::DirectorState;
pub use su_presence::{update_su_presence, AggregatorContext, SuTerminal};

use thiserror::Error;

/// Errors the kernel's own bookkeeping can raise (as distinct from
/// [`amf_types::AisError`], which is the public AIS-facing taxonomy).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("unknown service group {0:?}")]
    UnknownSg(amf_types::SgId),
    #[error("unknown service unit {0:?}")]
    UnknownSu(amf_types::SuId),
    #[error("unknown service instance {0:?}")]
    UnknownSi(amf_types::SiId),
    #[error("unknown component {0:?}")]
    UnknownComponent(amf_types::CompId),
}
