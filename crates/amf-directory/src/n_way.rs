//! N-way choose-and-assign: one ACTIVE SU per SI, up to
//! `preferred_standby_su_count` STANDBY SUs per SI, any SU may carry both
//! roles for different SIs.

use amf_types::{HaState, Sg, Si, Su};

use crate::{already_assigned, Assignment, RedundancyPlanner};

#[derive(Debug, Default)]
pub struct NWayPlanner;

impl RedundancyPlanner for NWayPlanner {
    fn choose_and_assign(&self, _sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment> {
        let mut assignments = Vec::new();

        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            let has_active = sus.iter().any(|su| already_assigned(su, si) && su.active_count > 0);
            if !has_active {
                if let Some(su) = sus
                    .iter()
                    .find(|su| su.is_in_service() && !already_assigned(su, si))
                {
                    assignments.push(Assignment {
                        su: su.id,
                        si: si.id,
                        ha_state: HaState::Active,
                    });
                }
            }

            let current_standby = sus
                .iter()
                .filter(|su| already_assigned(su, si) && su.standby_count > 0)
                .count() as u32;
            let mut needed = si.preferred_standby_su_count.saturating_sub(current_standby);
            for su in sus {
                if needed == 0 {
                    break;
                }
                if su.is_in_service()
                    && !already_assigned(su, si)
                    && !assignments.iter().any(|a| a.su == su.id && a.si == si.id)
                {
                    assignments.push(Assignment {
                        su: su.id,
                        si: si.id,
                        ha_state: HaState::Standby,
                    });
                    needed -= 1;
                }
            }
        }

        assignments
    }
}
