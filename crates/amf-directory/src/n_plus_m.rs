//! N+M choose-and-assign: N SUs each carry one distinct ACTIVE SI, M
//! spare SUs are held back as STANDBY cover shared across the SIs they
//! are assigned to.

use amf_types::{HaState, Sg, Si, Su};

use crate::{already_assigned, Assignment, RedundancyPlanner};

#[derive(Debug, Default)]
pub struct NPlusMPlanner;

impl RedundancyPlanner for NPlusMPlanner {
    fn choose_and_assign(&self, _sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let mut used: std::collections::HashSet<amf_types::SuId> = std::collections::HashSet::new();

        // Active pass: every eligible SI without an active SU gets the
        // next unused in-service SU.
        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            if sus.iter().any(|su| already_assigned(su, si) && su.active_count > 0) {
                continue;
            }
            if let Some(su) = sus
                .iter()
                .find(|su| su.is_in_service() && !already_assigned(su, si) && !used.contains(&su.id))
            {
                assignments.push(Assignment {
                    su: su.id,
                    si: si.id,
                    ha_state: HaState::Active,
                });
                used.insert(su.id);
            }
        }

        // Spare pass: remaining in-service SUs not used as active this
        // round cover as STANDBY for any SI still missing one.
        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            if sus.iter().any(|su| already_assigned(su, si) && su.standby_count > 0) {
                continue;
            }
            if let Some(su) = sus
                .iter()
                .find(|su| su.is_in_service() && !already_assigned(su, si) && !used.contains(&su.id))
            {
                assignments.push(Assignment {
                    su: su.id,
                    si: si.id,
                    ha_state: HaState::Standby,
                });
                used.insert(su.id);
            }
        }

        assignments
    }
}
