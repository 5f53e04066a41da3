//! Property 2 (spec.md §8): `fsm_state == STABLE ⇒ su_oper_list == ∅ ∧
//! admin_si == ∅ ∧ no SUSI is in MODIFY or UNASGN`, for arbitrary event
//! sequences.

use amf_kernel::{sg_fsm_step, AdminTarget, SgEvent, SusiAction};
use amf_types::{RedundancyModel, SgFsmState, SuId, SusiFsm};
use amf_test_harness::ClusterFixture;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Realign,
    SuFault(u32),
    AdminLockSu(u32),
    SusiDel(u32),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Realign),
        (1u32..=4).prop_map(Step::SuFault),
        (1u32..=4).prop_map(Step::AdminLockSu),
        (1u32..=4).prop_map(Step::SusiDel),
    ]
}

proptest! {
    #[test]
    fn stable_implies_quiescent_after_any_event_sequence(steps in proptest::collection::vec(step_strategy(), 0..30)) {
        let (mut state, sg_id, si_id) = ClusterFixture::new(RedundancyModel::TwoN).with_nodes(4).build();

        for step in steps {
            let su_ids: Vec<SuId> = state.sus.keys().copied().collect();
            match step {
                Step::Realign => {
                    let mut world = state.world_mut(sg_id);
                    sg_fsm_step(&mut world, SgEvent::Realign);
                }
                Step::SuFault(idx) => {
                    if let Some(su) = su_ids.get((idx as usize) % su_ids.len().max(1)) {
                        let mut world = state.world_mut(sg_id);
                        sg_fsm_step(&mut world, SgEvent::SuFault(*su));
                    }
                }
                Step::AdminLockSu(idx) => {
                    if let Some(su) = su_ids.get((idx as usize) % su_ids.len().max(1)) {
                        let mut world = state.world_mut(sg_id);
                        sg_fsm_step(&mut world, SgEvent::AdminChange { target: AdminTarget::Su(*su), invocation_id: idx as u64 });
                    }
                }
                Step::SusiDel(idx) => {
                    if let Some(su) = su_ids.get((idx as usize) % su_ids.len().max(1)) {
                        let mut world = state.world_mut(sg_id);
                        sg_fsm_step(&mut world, SgEvent::SusiSuccess { su: *su, si: si_id, action: SusiAction::Del });
                    }
                }
            }

            let sg = &state.sgs[&sg_id];
            if sg.fsm_state == SgFsmState::Stable {
                prop_assert!(sg.su_oper_list.is_empty());
                prop_assert!(sg.admin_si.is_none());
                prop_assert!(state.susis.iter().all(|s| !matches!(s.fsm, SusiFsm::Modify | SusiFsm::Unasgn)));
            }
        }
    }
}
