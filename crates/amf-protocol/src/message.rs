//! Director <-> Node Director protocol messages (spec.md §6).
//!
//! ## Director -> Node Director
//! - [`MessagePayload::RegSu`] - push a component's static configuration
//! - [`MessagePayload::InfoSuSiAssign`] - issue or change a SU-SI assignment
//! - [`MessagePayload::AdminOpReq`] - forward an operator admin request
//! - [`MessagePayload::Reboot`] - `D2N_REBOOT`
//! - [`MessagePayload::ClientHigh`] - reseed the peer's expected `msg_id`
//!   after a role switch
//!
//! ## Node Director -> Director
//! - [`MessagePayload::OperationState`] - SU presence/oper-state report
//! - [`MessagePayload::SusiResult`] - SUSI action outcome
//! - [`MessagePayload::Ack`] - acknowledges a `msg_id`

use amf_types::{CompId, HaState, NodeId, SiId, SuId};
use serde::{Deserialize, Serialize};

use crate::msg_id::MsgId;

/// An envelope carrying one protocol message between a director and a
/// node director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: NodeId,
    pub to: NodeId,
    pub msg_id: MsgId,
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(from: NodeId, to: NodeId, msg_id: MsgId, payload: MessagePayload) -> Self {
        Self { from, to, msg_id, payload }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self.payload, MessagePayload::Ack { .. })
    }
}

/// The SUSI action a [`MessagePayload::InfoSuSiAssign`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SusiActionKind {
    Assign,
    Modify,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagePayload {
    RegSu {
        su: SuId,
        components: Vec<CompId>,
    },
    InfoSuSiAssign {
        su: SuId,
        si: SiId,
        ha_state: HaState,
        action: SusiActionKind,
    },
    AdminOpReq {
        su: SuId,
        op: amf_types::AdminOpId,
        invocation_id: u64,
    },
    OperationState {
        su: SuId,
        oper_state: amf_types::OperState,
    },
    SusiResult {
        su: SuId,
        si: SiId,
        success: bool,
    },
    Reboot {
        reason: String,
    },
    /// Sent once after a role switch (standby -> active director) so the
    /// peer reseeds its expected `msg_id` instead of treating the new
    /// active's counter as a gap (spec.md §6 "CLIENT_HIGH").
    ClientHigh {
        next_expected: MsgId,
    },
    Ack {
        acked_msg_id: MsgId,
    },
}
