//! DMRS construction: turn the flat EP list into governor/dependent edges.
//!
//! ```text
//!  quantifier (has RSTR)        other EPs, per feature (ARG0/RSTR/BODY skipped)
//!  ─────────────────────        ───────────────────────────────────────────────
//!  RSTR ─qeq─► lo label         x/e value ─charvar─► owner      EQ | NEQ
//!        └─► EPs with lo        h value   ─label──► EP          HEQ
//!            (same ARG0 first,            ─qeq────► EP          H
//!             else dependent)   unresolved ARG<n>               NULL (dangling)
//!  emit RSTR/H
//! ```
//!
//! EPs with a single pair (only ARG0) govern nothing and are skipped. After
//! the pass every EP without any edge is reported as isolated.

use crate::dmrs::{DependencyGraph, PostSlash, PreSlash};
use crate::engine::Diagnostics;
use crate::engine::Warning;
use crate::engine::dependent::{Resolution, dependent_ep};
use crate::ep::{Ep, EpId};
use crate::mrs::Mrs;
use crate::var::{Sort, VarName};
use tracing::debug;

const SKIPPED_FEATURES: [&str; 3] = ["ARG0", "RSTR", "BODY"];

pub(crate) fn build_dependencies(mrs: &Mrs, graph: &mut DependencyGraph, diagnostics: &mut Diagnostics) {
    for ep in mrs.eps() {
        graph.register(ep.id);
        match ep.rstr() {
            Some(rstr) => link_restriction(mrs, ep, rstr, graph, diagnostics),
            None => link_arguments(mrs, ep, graph, diagnostics),
        }
    }

    for ep in mrs.eps() {
        if graph.is_isolated(ep.id) {
            diagnostics.warn(Warning::IsolatedEp(ep.id));
        }
    }
    debug!(edges = graph.edge_count(), eps = mrs.len(), "dependencies built");
}

fn link_restriction(
    mrs: &Mrs,
    quantifier: &Ep,
    rstr: VarName,
    graph: &mut DependencyGraph,
    diagnostics: &mut Diagnostics,
) {
    let restricted = mrs.lo_label(rstr).map(|lo| mrs.eps_with_label(lo)).unwrap_or_default();
    if restricted.is_empty() {
        diagnostics.warn(Warning::UnresolvedRstr { quantifier: quantifier.id, rstr });
        return;
    }

    let same_arg0 = quantifier
        .arg0()
        .and_then(|arg0| restricted.iter().rev().find(|ep| ep.arg0() == Some(arg0)).map(|ep| ep.id));
    let dependent = match same_arg0 {
        Some(id) => Some(id),
        None => resolve(&restricted, &format!("{rstr} of {}", quantifier.id), graph, diagnostics),
    };
    if let Some(dependent) = dependent {
        graph.add_pair(quantifier.id, dependent, PreSlash::Rstr, PostSlash::H);
    }
}

fn link_arguments(mrs: &Mrs, ep: &Ep, graph: &mut DependencyGraph, diagnostics: &mut Diagnostics) {
    if ep.fvpairs.len() == 1 {
        return;
    }

    for pair in &ep.fvpairs {
        if SKIPPED_FEATURES.contains(&pair.feature.as_str()) {
            continue;
        }
        let Some(value) = pair.var_name() else {
            continue;
        };
        let pre = PreSlash::from_feature(&pair.feature);

        let target = match value.sort {
            Sort::Individual | Sort::Event => mrs.characteristic_ep(value).and_then(|owner| {
                let owner_label = mrs.ep(owner)?.label;
                Some((owner, if owner_label == ep.label { PostSlash::Eq } else { PostSlash::Neq }))
            }),
            Sort::Handle => {
                let direct = mrs.eps_with_label(value);
                if !direct.is_empty() {
                    resolve(&direct, &value.to_string(), graph, diagnostics).map(|id| (id, PostSlash::Heq))
                } else {
                    let scoped = mrs.lo_label(value).map(|lo| mrs.eps_with_label(lo)).unwrap_or_default();
                    if scoped.is_empty() {
                        None
                    } else {
                        resolve(&scoped, &value.to_string(), graph, diagnostics).map(|id| (id, PostSlash::H))
                    }
                }
            }
            Sort::Underspecified(_) => None,
        };

        match target {
            Some((dependent, post)) => graph.add_pair(ep.id, dependent, pre, post),
            None if pair.is_arg() => graph.add_dangling(ep.id, pre),
            None => {}
        }
    }
}

fn resolve(
    candidates: &[&Ep],
    subject: &str,
    graph: &mut DependencyGraph,
    diagnostics: &mut Diagnostics,
) -> Option<EpId> {
    match dependent_ep(candidates) {
        Resolution::Single(id) => Some(id),
        Resolution::Clique { members, canonical } => {
            graph.add_equal_label_clique(members);
            Some(canonical)
        }
        Resolution::Unresolved => {
            diagnostics.unresolved(subject.to_string(), candidates.iter().map(|e| e.id).collect());
            None
        }
    }
}
