//! N-way-active choose-and-assign (spec.md §4.3, the model described in
//! full detail; the other four models follow the same skeleton).

use amf_types::{HaState, Sg, Si, Su};

use crate::{already_assigned, Assignment, RedundancyPlanner};

#[derive(Debug, Default)]
pub struct NWayActivePlanner;

impl RedundancyPlanner for NWayActivePlanner {
    fn choose_and_assign(&self, sg: &Sg, sus: &[&Su], sis: &[&Si]) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let mut active_count: std::collections::HashMap<amf_types::SuId, u32> = sus
            .iter()
            .map(|su| (su.id, su.active_count))
            .collect();

        for si in sis.iter().filter(|si| si.eligible_for_assignment()) {
            // Each SI targets its own `preferred_active_su_count`;
            // `sg.active_max_su` separately bounds how many actives any
            // one SU may carry across all SIs (checked as `slack` below).
            let cap = si.preferred_active_su_count.min(sg.active_max_su);
            let mut active_curr_su = sus
                .iter()
                .filter(|su| su.assigned_sis.contains(&si.id))
                .count() as u32;
            if active_curr_su >= cap {
                continue;
            }

            // First pass: honor saAmfSIRankedSU order.
            for ranked_su_id in &si.ranked_sus {
                if active_curr_su >= cap {
                    break;
                }
                if let Some(su) = sus.iter().find(|su| su.id == *ranked_su_id) {
                    if !su.is_in_service() {
                        continue;
                    }
                    let slack = active_count.get(&su.id).copied().unwrap_or(0) < sg.active_max_su;
                    if slack && !already_assigned(su, si) {
                        assignments.push(Assignment {
                            su: su.id,
                            si: si.id,
                            ha_state: HaState::Active,
                        });
                        *active_count.entry(su.id).or_insert(0) += 1;
                        active_curr_su += 1;
                    }
                }
            }

            // Second pass: insertion order, no rank preference.
            if active_curr_su < cap {
                for su in sus {
                    if active_curr_su >= cap {
                        break;
                    }
                    if !su.is_in_service() || already_assigned(su, si) {
                        continue;
                    }
                    let slack = active_count.get(&su.id).copied().unwrap_or(0) < sg.active_max_su;
                    if slack {
                        assignments.push(Assignment {
                            su: su.id,
                            si: si.id,
                            ha_state: HaState::Active,
                        });
                        *active_count.entry(su.id).or_insert(0) += 1;
                        active_curr_su += 1;
                    }
                }
            }
        }

        assignments
    }
}
