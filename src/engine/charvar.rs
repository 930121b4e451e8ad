//! Characteristic-variable mapping: which EP owns each `x`/`e` ARG0.
//!
//! Quantifiers share their ARG0 with the noun they bind, so the owner is the
//! single candidate without `RSTR` when there is one. Everything else goes
//! through [`dependent_ep`]; a failure there is recorded as unresolved and
//! the variable stays unmapped.

use crate::dmrs::DependencyGraph;
use crate::engine::Diagnostics;
use crate::engine::dependent::{Resolution, dependent_ep};
use crate::ep::{Ep, EpId};
use crate::mrs::Mrs;
use crate::var::VarName;
use std::collections::HashMap;
use tracing::debug;

pub(crate) fn map_characteristic_variables(
    mrs: &Mrs,
    graph: &mut DependencyGraph,
    diagnostics: &mut Diagnostics,
) -> HashMap<VarName, EpId> {
    let mut map: HashMap<VarName, EpId> = HashMap::new();

    for ep in mrs.eps() {
        let Some(arg0) = ep.arg0() else {
            continue;
        };
        if !arg0.sort.is_characteristic() || map.contains_key(&arg0) {
            continue;
        }

        let candidates: Vec<&Ep> = mrs.eps().filter(|e| e.arg0() == Some(arg0)).collect();
        let owner = match owner_without_rstr(&candidates) {
            Some(id) => Some(id),
            None => match dependent_ep(&candidates) {
                Resolution::Single(id) => Some(id),
                Resolution::Clique { members, canonical } => {
                    debug!(var = %arg0, size = members.len(), "equal-label clique owns variable");
                    graph.add_equal_label_clique(members);
                    Some(canonical)
                }
                Resolution::Unresolved => {
                    diagnostics.unresolved(arg0.to_string(), candidates.iter().map(|e| e.id).collect());
                    None
                }
            },
        };
        if let Some(owner) = owner {
            map.insert(arg0, owner);
        }
    }

    map
}

fn owner_without_rstr(candidates: &[&Ep]) -> Option<EpId> {
    if let [only] = candidates {
        return Some(only.id);
    }
    let mut bare = candidates.iter().filter(|ep| !ep.has_feature("RSTR"));
    match (bare.next(), bare.next()) {
        (Some(ep), None) => Some(ep.id),
        _ => None,
    }
}
