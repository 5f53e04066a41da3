//! Admin-op reply routing (spec.md §4.7 "Admin-op response invariants").
//!
//! `saImmOiAdminOperationResult` must be delivered back to the daemon over
//! one of three channels depending on how the admin op was issued. The
//! distinction rides along in the invocation id itself rather than in any
//! side table, the same packing trick [`crate::handle`]'s `HandleValue`
//! uses for client/node ids.

use amf_types::AisError;

/// Reserved "owner" value for admin ops issued on behalf of the
/// persistent back-end. No live client ever owns this id (real owners
/// are daemon-assigned, lifetime-monotonic, and start at 1), so it can
/// be told apart from a synchronous or asynchronous owner by value
/// alone, with the low-sign-bit ignored for this route.
pub const PBE_OWNER: u32 = 0;

/// Where `saImmOiAdminOperationResult` must be sent for one invocation
/// (spec.md §4.7): over the request/response channel, as an async event,
/// or over the cluster-broadcast channel (fake FEVS) for the PBE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOpReplyRoute {
    Sync,
    Async,
    Pbe,
}

/// An admin-op invocation id, packed as `owner:high32 | sign-bit:low32`
/// (spec.md §4.7). The owner identifies who issued the op; the low
/// half's sign bit distinguishes a synchronous caller from an
/// asynchronous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationId(u64);

impl InvocationId {
    pub const fn new(owner: u32, low: i32) -> Self {
        Self(((owner as u64) << 32) | (low as u32 as u64))
    }

    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn owner(self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn low(self) -> i32 {
        self.0 as u32 as i32
    }

    fn is_async(self) -> bool {
        self.low() < 0
    }

    /// Which channel `saImmOiAdminOperationResult` must use for this
    /// invocation (spec.md §4.7). The PBE route is keyed off the
    /// handle's `isPbe` flag, not the invocation id alone, since a PBE
    /// implementer's owner id is assigned the same way any other
    /// client's is; `owner == PBE_OWNER` is only a fallback for replies
    /// that arrive with no handle to consult (spec.md §6
    /// `A2ND_PBE_ADMOP_RSP`).
    pub fn reply_route(self, handle_is_pbe: bool) -> AdminOpReplyRoute {
        if handle_is_pbe || self.owner() == PBE_OWNER {
            AdminOpReplyRoute::Pbe
        } else if self.is_async() {
            AdminOpReplyRoute::Async
        } else {
            AdminOpReplyRoute::Sync
        }
    }
}

/// Builds the outbound reply message kind for one admin-op result
/// (spec.md §6: `A2ND_PBE_ADMOP_RSP` / `A2ND_ADMOP_RSP` /
/// `A2ND_ASYNC_ADMOP_RSP`).
pub fn route_reply(invocation: InvocationId, handle_is_pbe: bool, result: Result<(), AisError>) -> (AdminOpReplyRoute, Result<(), AisError>) {
    (invocation.reply_route(handle_is_pbe), result)
}
