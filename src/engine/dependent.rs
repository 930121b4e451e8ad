//! Dependent-EP resolution.
//!
//! Several EPs can share a label (a noun and its adjectives) or an ARG0 (a
//! comparative and its adjective). Given such a candidate list, find the one
//! the others depend on:
//!
//! 1. Walking backward, a candidate whose label or ARG0 appears among the
//!    non-ARG0 values of every other candidate.
//! 2. Otherwise link candidates by arguments (`a` is governed by `b` when one
//!    of `b`'s `ARG<n>` values, n > 0, is `a`'s ARG0) and pick the candidate
//!    whose governor chain runs through all others.
//! 3. Otherwise, if all candidates share one label, they form an equal-label
//!    clique and the last one stands for it.
//!
//! Anything else is unresolved and left to the caller to report.

use crate::ep::{Ep, EpId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Single(EpId),
    Clique { members: BTreeSet<EpId>, canonical: EpId },
    Unresolved,
}

pub(crate) fn dependent_ep(candidates: &[&Ep]) -> Resolution {
    match candidates {
        [] => return Resolution::Unresolved,
        [only] => return Resolution::Single(only.id),
        _ => {}
    }
    let n = candidates.len();

    for dep in candidates.iter().rev() {
        let governed_by_all = candidates.iter().filter(|other| other.id != dep.id).all(|other| {
            other.values_except_arg0().any(|v| v == dep.label || Some(v) == dep.arg0())
        });
        if governed_by_all {
            return Resolution::Single(dep.id);
        }
    }

    let governors: Vec<Vec<usize>> = candidates
        .iter()
        .map(|ep| {
            let Some(arg0) = ep.arg0() else {
                return Vec::new();
            };
            (0..n)
                .filter(|&j| candidates[j].id != ep.id && candidates[j].arg_values_except_arg0().any(|v| v == arg0))
                .collect()
        })
        .collect();
    for (i, ep) in candidates.iter().enumerate() {
        let mut on_path = vec![false; n];
        if governor_depth(i, &governors, &mut on_path) == n - 1 {
            return Resolution::Single(ep.id);
        }
    }

    let first = candidates[0].label;
    if candidates.iter().all(|ep| ep.label == first) {
        let members = candidates.iter().map(|ep| ep.id).collect();
        return Resolution::Clique { members, canonical: candidates[n - 1].id };
    }

    Resolution::Unresolved
}

/// Longest governor chain above `i`, ignoring cycles.
fn governor_depth(i: usize, governors: &[Vec<usize>], on_path: &mut [bool]) -> usize {
    on_path[i] = true;
    let mut max = 0;
    for &g in &governors[i] {
        if on_path[g] {
            continue;
        }
        max = max.max(1 + governor_depth(g, governors, on_path));
    }
    on_path[i] = false;
    max
}
