//! # amf-protocol: the Director <-> Node Director wire protocol
//!
//! Message shapes, per-peer `msg_id` ordering, and resend bookkeeping
//! for the channel between a director and the node directors it
//! controls (spec.md §6). This crate only describes the protocol; the
//! `amf` binaries own the actual sockets and event loop.

pub mod message;
pub mod msg_id;
pub mod retransmit;

pub use message::{Message, MessagePayload, SusiActionKind};
pub use msg_id::{MsgId, MsgIdError, MsgIdTracker};
pub use retransmit::Retransmitter;
