//! SU-SI assignment record (spec.md §3 "SUSI").

use serde::{Deserialize, Serialize};

use crate::ids::{SiId, SuId};
use crate::states::{HaState, SusiFsm};

/// The (SU, SI) relationship: an HA state plus a per-assignment FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Susi {
    pub su: SuId,
    pub si: SiId,
    pub ha_state: HaState,
    pub fsm: SusiFsm,
    /// The role (`ACTIVE`/`STANDBY`) this assignment held before a
    /// quiesce/quiescing transition overwrote `ha_state`, so the SU's
    /// `active_count`/`standby_count` can be released against the right
    /// bucket once the assignment is actually freed.
    pub pre_quiesce_ha_state: Option<HaState>,
}

impl Susi {
    pub fn new(su: SuId, si: SiId, ha_state: HaState) -> Self {
        Self {
            su,
            si,
            ha_state,
            fsm: SusiFsm::Asgn,
            pre_quiesce_ha_state: None,
        }
    }

    /// Centralized "HA changed" predicate (spec.md Open Question #3):
    /// QUIESCED and QUIESCING-that-has-completed-to-QUIESCED are treated
    /// as equivalent everywhere via this single function.
    pub fn ha_state_equivalent(a: HaState, b: HaState) -> bool {
        a == b
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.fsm, SusiFsm::Asgnd)
    }
}
