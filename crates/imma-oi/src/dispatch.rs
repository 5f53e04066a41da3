//! Dispatch model and `pend_dis`/`pend_fin` deferred-shutdown discipline
//! (spec.md §4.7.b "Dispatch model", §5 "pend_dis/pend_fin...").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchFlags {
    /// Process exactly one queued callback.
    One,
    /// Drain every queued callback.
    All,
    /// Drain, then block on the mailbox for more.
    Blocking,
}

/// The deferred-shutdown counters living on the CB (spec.md §5).
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchCounters {
    /// Dispatches currently in progress.
    pend_dis: u32,
    /// Finalizes deferred because a dispatch was in flight when they
    /// arrived.
    pend_fin: u32,
}

impl DispatchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_dispatch(&mut self) {
        self.pend_dis += 1;
    }

    /// Returns the number of deferred shutdowns to perform now, draining
    /// `pend_fin` if this is the last dispatch to exit.
    pub fn exit_dispatch(&mut self) -> u32 {
        self.pend_dis = self.pend_dis.saturating_sub(1);
        if self.pend_dis == 0 && self.pend_fin > 0 {
            std::mem::take(&mut self.pend_fin)
        } else {
            0
        }
    }

    /// A finalize arrived while `pend_dis > 0`: defer it instead of
    /// shutting down now. Returns `true` if deferred (caller must not
    /// finalize immediately), `false` if it's safe to finalize now.
    pub fn request_finalize(&mut self) -> bool {
        if self.pend_dis > 0 {
            self.pend_fin += 1;
            true
        } else {
            false
        }
    }

    pub fn pend_dis(&self) -> u32 {
        self.pend_dis
    }

    pub fn pend_fin(&self) -> u32 {
        self.pend_fin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_during_dispatch_is_deferred() {
        let mut c = DispatchCounters::new();
        c.enter_dispatch();
        assert!(c.request_finalize());
        assert_eq!(c.pend_fin(), 1);
    }

    #[test]
    fn last_dispatch_to_exit_drains_deferred_finalizes() {
        let mut c = DispatchCounters::new();
        c.enter_dispatch();
        c.enter_dispatch();
        c.request_finalize();
        c.request_finalize();
        assert_eq!(c.exit_dispatch(), 0, "one dispatch still outstanding");
        assert_eq!(c.exit_dispatch(), 2, "last dispatch drains both deferred finalizes");
        assert_eq!(c.pend_fin(), 0);
    }

    #[test]
    fn finalize_with_no_dispatch_in_flight_runs_immediately() {
        let mut c = DispatchCounters::new();
        assert!(!c.request_finalize());
        assert_eq!(c.pend_fin(), 0);
    }
}
