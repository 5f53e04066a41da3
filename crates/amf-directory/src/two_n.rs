//! 2N choose-and-assign: exactly one ACTIVE SU and one STANDBY SU per SI.

use amf_types::{HaState, Sg, Si, Su};

use crate::{already_assigned, Assignment, RedundancyPlanner};

#[derive(Debug, Default)]
pub struct TwoNPlanner;

impl RedundancyPlanner for TwoNPlanner {
    fn choose_and_assign(&self, _sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let mut used: std::collections::HashSet<amf_types::SuId> = std::collections::HashSet::new();

        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            let active_su = sus
                .iter()
                .find(|su| already_assigned(su, si) && su.active_count > 0)
                .map(|su| su.id);
            let standby_su = sus
                .iter()
                .find(|su| already_assigned(su, si) && su.standby_count > 0)
                .map(|su| su.id);

            let mut promoted = None;
            let active_id = match active_su {
                Some(id) => Some(id),
                None => match standby_su {
                    // No healthy ACTIVE left: promote the existing STANDBY
                    // in place rather than picking a fresh SU.
                    Some(id) => {
                        assignments.push(Assignment { su: id, si: si.id, ha_state: HaState::Active });
                        used.insert(id);
                        promoted = Some(id);
                        Some(id)
                    }
                    None => sus
                        .iter()
                        .find(|su| su.is_in_service() && !already_assigned(su, si) && !used.contains(&su.id))
                        .map(|su| {
                            assignments.push(Assignment { su: su.id, si: si.id, ha_state: HaState::Active });
                            used.insert(su.id);
                            su.id
                        }),
                },
            };

            let standby_needs_new = match standby_su {
                Some(id) => promoted == Some(id),
                None => true,
            };
            if standby_needs_new {
                if let Some(su) = sus.iter().find(|su| {
                    su.is_in_service()
                        && !already_assigned(su, si)
                        && !used.contains(&su.id)
                        && Some(su.id) != active_id
                }) {
                    assignments.push(Assignment { su: su.id, si: si.id, ha_state: HaState::Standby });
                    used.insert(su.id);
                }
            }
        }

        assignments
    }
}
