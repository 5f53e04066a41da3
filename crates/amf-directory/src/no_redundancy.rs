//! No-redundancy choose-and-assign: at most one ACTIVE SU, no standby.

use amf_types::{HaState, Sg, Si, Su};

use crate::{already_assigned, Assignment, RedundancyPlanner};

#[derive(Debug, Default)]
pub struct NoRedundancyPlanner;

impl RedundancyPlanner for NoRedundancyPlanner {
    fn choose_and_assign(&self, _sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            if sus.iter().any(|su| already_assigned(su, si)) {
                continue;
            }
            if let Some(su) = sus.iter().find(|su| su.is_in_service()) {
                assignments.push(Assignment {
                    su: su.id,
                    si: si.id,
                    ha_state: HaState::Active,
                });
            }
        }
        assignments
    }
}
