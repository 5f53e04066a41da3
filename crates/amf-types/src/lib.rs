//! # amf-types: Core data model for the AMF control plane
//!
//! Shared entity types and state enums used by every other crate in the
//! workspace:
//! - Identifiers ([`ids`]): [`NodeId`], [`SgId`], [`SuId`], [`SiId`],
//!   [`CompId`], [`CsiId`], [`HandleValue`], [`CcbId`].
//! - Entities: [`node::Node`], [`sg::Sg`], [`su::Su`], [`si::Si`],
//!   [`csi::Csi`], [`component::Component`], [`susi::Susi`].
//! - Shared enumerated states ([`states`]).
//! - The SAF AIS error taxonomy ([`error::AisError`]).

pub mod component;
pub mod csi;
pub mod error;
pub mod ids;
pub mod node;
pub mod sg;
pub mod si;
pub mod states;
pub mod su;
pub mod susi;

pub use component::{
    Capability, ClcCommand, ClcCommandSet, Component, ComponentConfig, ComponentErrorInfo,
    PendingCallback,
};
pub use csi::Csi;
pub use error::{AisError, AisResult};
pub use ids::{CcbId, CompId, CsTypeId, CsiId, HandleValue, NodeId, SgId, SiId, SuId};
pub use node::Node;
pub use sg::Sg;
pub use si::Si;
pub use states::{
    AdminOpId, AdminState, ComponentErrorSource, DependencyState, HaState, NodeState, OperState,
    Presence, Readiness, RecoveryRecommendation, RedundancyModel, SgFsmState, SuFailoverPolicy,
    SusiFsm, SwitchState,
};
pub use su::Su;
pub use susi::Susi;
