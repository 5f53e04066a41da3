//! Director state arena.
//!
//! SUs, SIs, and SUSIs reference each other (a `Su` lists its
//! `assigned_sis`, an `Si` lists its `susis`, each `Susi` names both);
//! rather than own these cyclically, every entity lives in an
//! [`IndexMap`] keyed by its id, and relationships are carried as ids
//! that index back into the same arena. Iteration order is insertion
//! order, so replaying the same sequence of inserts always walks SUs/SIs
//! in the same order — load-bearing for the "rank-preferred SU wins
//! ties" rule in the N-way-active planner.

use indexmap::IndexMap;

use amf_types::{CompId, Component, Node, NodeId, Sg, SgId, Si, SiId, Su, SuId, Susi};

/// All entities belonging to one cluster.
#[derive(Debug, Clone, Default)]
pub struct DirectorState {
    pub nodes: IndexMap<NodeId, Node>,
    pub sgs: IndexMap<SgId, Sg>,
    pub sus: IndexMap<SuId, Su>,
    pub sis: IndexMap<SiId, Si>,
    pub components: IndexMap<CompId, Component>,
    pub susis: Vec<Susi>,
}

impl DirectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components_of(&self, su: SuId) -> Vec<&Component> {
        self.components.values().filter(|c| c.su == su).collect()
    }

    pub fn susis_of_su(&self, su: SuId) -> impl Iterator<Item = &Susi> {
        self.susis.iter().filter(move |s| s.su == su)
    }

    pub fn susis_of_si(&self, si: SiId) -> impl Iterator<Item = &Susi> {
        self.susis.iter().filter(move |s| s.si == si)
    }

    /// A borrow of the (SG, SUs, SIs, SUSIs) needed to run [`crate::sg_fsm`]
    /// for one Service Group.
    pub fn world_mut(&mut self, sg: SgId) -> crate::sg_fsm::SgWorld<'_> {
        crate::sg_fsm::SgWorld {
            sg: self.sgs.get_mut(&sg).expect("unknown service group"),
            sus: &mut self.sus,
            sis: &mut self.sis,
            susis: &mut self.susis,
        }
    }
}
