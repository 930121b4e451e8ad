//! Coreference resolution.
//!
//! Rebuilds the variable arena from the EP list in order. The first
//! occurrence of an `x` name becomes the canonical slot and every later
//! occurrence is pointed at it. Other sorts keep one slot per occurrence:
//! events are matched by name, handles through HCONS.
//!
//! Slots that are no longer referenced (earlier aliases, removed EPs) are
//! dropped, so the rebuilt table stays proportional to the MRS.

use crate::ep::{Ep, EpId};
use crate::fvpair::FvValue;
use crate::var::{Sort, Var, VarId, VarName, VarTable};
use indexmap::IndexMap;
use std::collections::HashMap;

pub(crate) struct CorefOutcome {
    pub vars: VarTable,
    pub coref: HashMap<VarName, VarId>,
    pub shared_occurrences: usize,
}

pub(crate) fn resolve_coreference(eps: &mut IndexMap<EpId, Ep>, old: &VarTable) -> CorefOutcome {
    let mut vars = VarTable::new();
    let mut coref: HashMap<VarName, VarId> = HashMap::new();
    let mut shared_occurrences = 0;

    for ep in eps.values_mut() {
        for pair in &mut ep.fvpairs {
            let FvValue::Var(occurrence) = &mut pair.value else {
                continue;
            };
            let canonical = match occurrence.name.sort {
                Sort::Individual => coref.get(&occurrence.name).copied(),
                _ => None,
            };
            if let Some(canonical) = canonical {
                occurrence.id = canonical;
                shared_occurrences += 1;
                continue;
            }

            let mut var = old.get(occurrence.id).cloned().unwrap_or_else(|| Var::new(occurrence.name));
            var.name = occurrence.name;
            let fresh = vars.insert(var);
            occurrence.id = fresh.id;
            if occurrence.name.sort == Sort::Individual {
                coref.insert(occurrence.name, fresh.id);
            }
        }
    }

    CorefOutcome { vars, coref, shared_occurrences }
}
