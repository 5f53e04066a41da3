//! # amf: the director and node-director daemons
//!
//! Wires `amf-kernel` (pure FSMs), `amf-directory` (choose-and-assign),
//! and `amf-protocol` (wire messages, `msg_id` ordering) into two
//! `mio`-based, single-threaded event loops — one per role, no async
//! runtime, following the teacher's server design.
//!
//! - [`director`]: `DirectorRuntime`, translating kernel effects into
//!   outbound messages and tracking per-peer acks/resends.
//! - [`node_director`]: `NodeDirectorRuntime`, applying inbound
//!   assignment directives to the local component set via the CLC FSM.
//! - [`connection`] / [`codec`]: the mio socket plumbing and wire
//!   framing shared by both binaries.

pub mod clc_executor;
pub mod codec;
pub mod connection;
pub mod director;
pub mod error;
pub mod node_director;

pub use error::{AmfError, AmfResult};
