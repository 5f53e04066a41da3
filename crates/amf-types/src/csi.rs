//! Component Service Instance (spec.md §3 "CSI").

use serde::{Deserialize, Serialize};

use crate::ids::{CsTypeId, CsiId, SiId};

/// The finest assignment unit: a slice of an SI handed to one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Csi {
    pub id: CsiId,
    pub si: SiId,
    pub cs_type: CsTypeId,
    pub attributes: Vec<(String, String)>,
    /// Set while this CSI is being matched against a candidate
    /// component during assignment planning; never persisted.
    #[serde(skip)]
    pub assignment_in_progress: bool,
}

impl Csi {
    pub fn new(id: CsiId, si: SiId, cs_type: CsTypeId) -> Self {
        Self {
            id,
            si,
            cs_type,
            attributes: Vec::new(),
            assignment_in_progress: false,
        }
    }

    /// Builds the `name=value` environment entries for a non-proxied
    /// component with exactly one CSI assigned (spec.md §4.1).
    /// Duplicate attribute names: first value wins, duplicates logged
    /// by the caller and dropped.
    pub fn env_entries(&self) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::with_capacity(self.attributes.len());
        for (k, v) in &self.attributes {
            if seen.insert(k.clone()) {
                out.push((k.clone(), v.clone()));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_attribute_names_first_value_wins() {
        let mut csi = Csi::new(CsiId::new(1), SiId::new(1), CsTypeId::new(1));
        csi.attributes.push(("KEY".into(), "first".into()));
        csi.attributes.push(("KEY".into(), "second".into()));
        let env = csi.env_entries();
        assert_eq!(env, vec![("KEY".to_string(), "first".to_string())]);
    }
}
