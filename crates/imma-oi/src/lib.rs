//! # imma-oi: the IMMA-OI client core
//!
//! The hardest client-side subsystem (spec.md §4.7): per-process "cb"
//! state, a handle state machine with resurrection, the stale-handle
//! callback protocol, CCB participation tracking, and the dispatch
//! model's `pend_dis`/`pend_fin` discipline (spec.md §5).
//!
//! This crate models the state machines and their transitions; it does
//! not own a transport. Callers (the OM/OI bindings) drive it with the
//! daemon's actual responses and execute the [`handle::ResurrectAction`]s
//! it returns.

pub mod admin_reply;
pub mod cb;
pub mod ccb;
pub mod dispatch;
pub mod handle;
pub mod mailbox;

pub use admin_reply::{route_reply, AdminOpReplyRoute, InvocationId, PBE_OWNER};
pub use cb::{CallbackEvent, ControlBlock};
pub use ccb::{CcbPhase, CcbRecord, CcbResolution, RecoverCcbOutcome};
pub use dispatch::{DispatchCounters, DispatchFlags};
pub use handle::{
    begin_resurrect, on_implementer_reset, on_resurrect_response, DaemonResurrectResponse,
    HandleRecord, HandleState, ResurrectAction, ResurrectOutcome,
};
pub use mailbox::{Mailbox, Priority};
