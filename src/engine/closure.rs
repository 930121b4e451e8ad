//! Decomposition: the semantic closure of a seed set over the DMRS graph.
//!
//! Each pass walks the edges of every target that is not an exception:
//!
//! ```text
//!   edge       rule
//!   ────────   ──────────────────────────────────────────────────────────────
//!   NULL       ignored
//!   DEP        dependent always joins; with relax_eq, an /EQ edge out of a
//!              verb (or a preposition's ARG2) first moves the target to a
//!              fresh label so the dependent keeps its own scope
//!   GOV        governor joins unless
//!                - !keep_eq and it is a verb/preposition linked by /EQ with
//!                  no empty argument, or
//!                - the edge is /NEQ or /H and the governor is a verb, a
//!                  passive marker, or a preposition before every target
//! ```
//!
//! New EPs are unioned into the targets and the pass repeats with
//! `relax_eq = false, keep_eq = true` until nothing is added.
//!
//! Relabelling only touches EP labels. Edges are left as they were; callers
//! rebuild them through the removal APIs, which post-process.

use crate::dmrs::{Direction, PostSlash, PreSlash};
use crate::engine::{ClosureMetrics, PassMetrics};
use crate::ep::EpId;
use crate::mrs::Mrs;
use crate::var::VarName;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

/// The two switches of the closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosurePolicy {
    /// Split a shared label when following an `/EQ` dependent (first pass only).
    pub relax_eq: bool,
    /// Keep verb/preposition governors linked by `/EQ`.
    pub keep_eq: bool,
}

impl ClosurePolicy {
    pub fn new(relax_eq: bool, keep_eq: bool) -> Self {
        ClosurePolicy { relax_eq, keep_eq }
    }
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        ClosurePolicy { relax_eq: false, keep_eq: true }
    }
}

/// Soft-deletion marks. EPs without an explicit mark read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpMarks {
    flags: BTreeMap<EpId, bool>,
}

impl EpMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(ids: impl IntoIterator<Item = EpId>, flag: bool) -> Self {
        EpMarks { flags: ids.into_iter().map(|id| (id, flag)).collect() }
    }

    pub fn set(&mut self, id: EpId, flag: bool) {
        self.flags.insert(id, flag);
    }

    pub fn get(&self, id: EpId) -> bool {
        self.flags.get(&id).copied().unwrap_or(false)
    }
}

/// Result of a decomposition wrapper.
#[derive(Debug, Clone, Default)]
pub struct Closure {
    /// The closure itself, targets included.
    pub kept: BTreeSet<EpId>,
    /// `true` on every EP outside `kept`.
    pub marks: EpMarks,
    pub metrics: ClosureMetrics,
}

impl Closure {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// --- Primitive --------------------------------------------------------------

pub(crate) fn decompose(
    mrs: &mut Mrs,
    targets: &BTreeSet<EpId>,
    exceptions: &BTreeSet<EpId>,
    policy: ClosurePolicy,
) -> (BTreeSet<EpId>, ClosureMetrics) {
    let start = Instant::now();
    let mut metrics = ClosureMetrics::default();
    let mut targets: BTreeSet<EpId> = targets.iter().copied().filter(|id| mrs.contains(*id)).collect();
    if targets.is_empty() {
        metrics.total = start.elapsed();
        return (targets, metrics);
    }

    let ClosurePolicy { mut relax_eq, mut keep_eq } = policy;
    loop {
        let pass_start = Instant::now();
        let mut found: BTreeSet<EpId> = BTreeSet::new();
        let mut relabelled = 0;
        let mut edges_visited = 0;

        for &target in &targets {
            if exceptions.contains(&target) {
                continue;
            }
            let edges = mrs.graph().edges(target).to_vec();
            for edge in edges {
                edges_visited += 1;
                let Some(other) = edge.other else {
                    continue;
                };
                if edge.post == PostSlash::Null || targets.contains(&other) || exceptions.contains(&other) {
                    continue;
                }
                match edge.direction {
                    Direction::Dep => {
                        let splits = relax_eq
                            && edge.post == PostSlash::Eq
                            && mrs
                                .ep(target)
                                .is_some_and(|t| t.is_verb() || (t.is_preposition() && edge.pre == PreSlash::Arg(2)));
                        if splits {
                            if let Some(label) = mrs.generate_unused_labels(1).first().copied() {
                                relabelled += assign_new_label(mrs, target, other, label);
                            }
                        }
                        found.insert(other);
                    }
                    Direction::Gov => {
                        let Some(governor) = mrs.ep(other) else {
                            continue;
                        };
                        let verbal = governor.is_verb() || governor.is_preposition();
                        if !keep_eq && verbal && edge.post == PostSlash::Eq && !mrs.has_empty_args(other) {
                            continue;
                        }
                        let outer_scope = matches!(edge.post, PostSlash::Neq | PostSlash::H)
                            && (governor.is_verb()
                                || governor.is_passive()
                                || mrs.is_preposition_before(other, &targets));
                        if !outer_scope {
                            found.insert(other);
                        }
                    }
                    Direction::Dangling => {}
                }
            }
        }

        debug!(pass = metrics.passes.len(), added = found.len(), relabelled, relax_eq, keep_eq, "closure pass");
        metrics.passes.push(PassMetrics {
            duration: pass_start.elapsed(),
            produced: found.len(),
            added: found.iter().copied().collect(),
            relabelled,
            relax_eq,
            keep_eq,
            _edges_visited: edges_visited,
        });

        if found.is_empty() {
            break;
        }
        targets.extend(found);
        relax_eq = false;
        keep_eq = true;
    }

    metrics.total = start.elapsed();
    (targets, metrics)
}

/// Move `target` to `label`, together with every EP reachable over `ARG/EQ`
/// edges that still carries the target's old label. `except` keeps its label.
fn assign_new_label(mrs: &mut Mrs, target: EpId, except: EpId, label: VarName) -> usize {
    let Some(old) = mrs.ep(target).map(|ep| ep.label) else {
        return 0;
    };
    let mut stack = vec![target];
    let mut moved = 0;
    while let Some(current) = stack.pop() {
        if mrs.ep(current).is_none_or(|ep| ep.label != old) {
            continue;
        }
        mrs.set_label_unsynced(current, label);
        moved += 1;
        for edge in mrs.graph().edges(current) {
            let Some(next) = edge.other else {
                continue;
            };
            if next != except && edge.is_arg_eq() && mrs.ep(next).is_some_and(|ep| ep.label == old) {
                stack.push(next);
            }
        }
    }
    moved
}

// --- Wrappers ---------------------------------------------------------------

impl Mrs {
    /// The closure of `targets`, never entering `exceptions`.
    ///
    /// Labels may be split when `policy.relax_eq` is set; derived state is
    /// not rebuilt until the next removal or [`Mrs::postprocess`].
    pub fn decompose(
        &mut self,
        targets: &BTreeSet<EpId>,
        exceptions: &BTreeSet<EpId>,
        policy: ClosurePolicy,
    ) -> BTreeSet<EpId> {
        decompose(self, targets, exceptions, policy).0
    }

    pub fn decompose_with_metrics(
        &mut self,
        targets: &BTreeSet<EpId>,
        exceptions: &BTreeSet<EpId>,
        policy: ClosurePolicy,
    ) -> (BTreeSet<EpId>, ClosureMetrics) {
        decompose(self, targets, exceptions, policy)
    }

    /// Seed with at most one target and one exception. A missing target
    /// yields an empty closure.
    pub fn decompose_by_ep(&mut self, target: Option<EpId>, exception: Option<EpId>, policy: ClosurePolicy) -> Closure {
        let targets: BTreeSet<EpId> = target.into_iter().collect();
        let exceptions: BTreeSet<EpId> = exception.into_iter().collect();
        self.decompose_set(&targets, &exceptions, policy)
    }

    pub fn decompose_set(
        &mut self,
        targets: &BTreeSet<EpId>,
        exceptions: &BTreeSet<EpId>,
        policy: ClosurePolicy,
    ) -> Closure {
        let mut marks = EpMarks::all(self.ep_ids(), true);
        let (kept, metrics) = decompose(self, targets, exceptions, policy);
        for id in &kept {
            marks.set(*id, false);
        }
        Closure { kept, marks, metrics }
    }

    pub fn decompose_by_label(&mut self, seed: VarName, exception: Option<EpId>, policy: ClosurePolicy) -> Closure {
        let exceptions: BTreeSet<EpId> = exception.into_iter().collect();
        self.decompose_by_label_set(seed, &exceptions, policy)
    }

    /// Seed from a token: a handle resolves through qeq to the EPs carrying
    /// that label, any other variable to its characteristic EP.
    pub fn decompose_by_label_set(
        &mut self,
        seed: VarName,
        exceptions: &BTreeSet<EpId>,
        policy: ClosurePolicy,
    ) -> Closure {
        let targets = self.seed_eps(seed);
        self.decompose_set(&targets, exceptions, policy)
    }

    pub fn seed_eps(&self, seed: VarName) -> BTreeSet<EpId> {
        if seed.is_handle() {
            let label = self.lo_label(seed).unwrap_or(seed);
            self.eps_with_label(label).iter().map(|ep| ep.id).collect()
        } else {
            self.characteristic_ep(seed).into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MrsDocument;
    use crate::fixtures;
    use serde_json::{Value, json};

    fn ids(ids: &[u32]) -> BTreeSet<EpId> {
        ids.iter().map(|&id| EpId(id)).collect()
    }

    fn load(value: Value) -> Mrs {
        let doc: MrsDocument = serde_json::from_value(value).unwrap();
        Mrs::from_document(&doc).unwrap()
    }

    fn labels(mrs: &Mrs) -> Vec<String> {
        mrs.eps().map(|ep| ep.label.to_string()).collect()
    }

    /// "dogs bark in the house": noun, verb and preposition share `h5`; the
    /// preposition's ARG1 is the verb.
    fn shared_scope() -> Mrs {
        load(json!({
            "index": "e3",
            "eps": [
                { "pred": "_dog_n_1_rel", "label": "h5", "cfrom": 0, "cto": 4,
                  "fvpairs": [ { "feature": "ARG0", "var": "x2" } ] },
                { "pred": "_bark_v_1_rel", "label": "h5", "cfrom": 5, "cto": 9,
                  "fvpairs": [ { "feature": "ARG0", "var": "e3" }, { "feature": "ARG1", "var": "x2" } ] },
                { "pred": "_in_p_rel", "label": "h5", "cfrom": 10, "cto": 12,
                  "fvpairs": [ { "feature": "ARG0", "var": "e4" }, { "feature": "ARG1", "var": "e3" },
                               { "feature": "ARG2", "var": "x8" } ] },
                { "pred": "_house_n_1_rel", "label": "h7", "cfrom": 17, "cto": 22,
                  "fvpairs": [ { "feature": "ARG0", "var": "x8" } ] },
            ],
        }))
    }

    /// A preposition at 5..9 whose ARG2 is a noun starting at `noun_from`.
    fn preposition_and_noun(noun_from: usize) -> Mrs {
        load(json!({
            "eps": [
                { "pred": "_with_p_rel", "label": "h3", "cfrom": 5, "cto": 9,
                  "fvpairs": [ { "feature": "ARG0", "var": "e4" }, { "feature": "ARG2", "var": "x6" } ] },
                { "pred": "_stick_n_1_rel", "label": "h7", "cfrom": noun_from, "cto": noun_from + 5,
                  "fvpairs": [ { "feature": "ARG0", "var": "x6" } ] },
            ],
        }))
    }

    #[test]
    fn quantifier_and_noun_close_over_each_other() {
        let mut mrs = fixtures::quantified_noun();
        let from_noun = mrs.decompose_by_ep(Some(EpId(1)), None, ClosurePolicy::default());
        assert_eq!(from_noun.kept, ids(&[0, 1]));
        assert!(!from_noun.marks.get(EpId(0)));

        let from_quantifier = mrs.decompose_by_ep(Some(EpId(0)), None, ClosurePolicy::default());
        assert_eq!(from_quantifier.kept, ids(&[0, 1]));
    }

    #[test]
    fn verb_reaches_its_argument_but_not_the_reverse() {
        let mut mrs = fixtures::verb_and_noun("h9");
        assert_eq!(mrs.decompose(&ids(&[1]), &BTreeSet::new(), ClosurePolicy::default()), ids(&[0, 1]));
        assert_eq!(mrs.decompose(&ids(&[0]), &BTreeSet::new(), ClosurePolicy::default()), ids(&[0]));
        assert_eq!(mrs.decompose(&ids(&[0]), &BTreeSet::new(), ClosurePolicy::new(false, false)), ids(&[0]));
    }

    #[test]
    fn eq_governor_follows_keep_eq() {
        let mut mrs = fixtures::verb_and_noun("h5");
        assert_eq!(mrs.decompose(&ids(&[0]), &BTreeSet::new(), ClosurePolicy::new(false, true)), ids(&[0, 1]));
        assert_eq!(mrs.decompose(&ids(&[0]), &BTreeSet::new(), ClosurePolicy::new(false, false)), ids(&[0]));
    }

    #[test]
    fn relax_eq_moves_the_verb_to_a_fresh_label() {
        let mut mrs = fixtures::verb_and_noun("h5");
        let relax = ClosurePolicy::new(true, true);
        let (kept, metrics) = mrs.decompose_with_metrics(&ids(&[1]), &BTreeSet::new(), relax);
        assert_eq!(kept, ids(&[0, 1]));
        assert_eq!(mrs.ep(EpId(1)).unwrap().label, var!("h6"));
        assert_eq!(mrs.ep(EpId(0)).unwrap().label, var!("h5"));
        assert_eq!(metrics.passes[0].relabelled, 1);
        assert!(metrics.passes[0].relax_eq);
        assert!(!metrics.passes[1].relax_eq);
    }

    #[test]
    fn relax_eq_carries_eq_neighbours_to_the_same_label() {
        let mut mrs = shared_scope();
        assert_eq!(labels(&mrs), ["h5", "h5", "h5", "h7"]);
        let relax = ClosurePolicy::new(true, true);
        let (kept, metrics) = mrs.decompose_with_metrics(&ids(&[1]), &BTreeSet::new(), relax);
        assert_eq!(kept, ids(&[0, 1, 2, 3]));
        // the preposition follows the verb, the noun keeps its scope
        assert_eq!(labels(&mrs), ["h5", "h9", "h9", "h7"]);
        assert_eq!(metrics.passes[0].relabelled, 2);
    }

    #[test]
    fn clone_after_a_split_rebuilds_edges() {
        let mut mrs = fixtures::verb_and_noun("h5");
        mrs.decompose(&ids(&[1]), &BTreeSet::new(), ClosurePolicy::new(true, true));
        let eq_to_noun =
            |m: &Mrs| m.edges(EpId(1)).iter().any(|e| e.other == Some(EpId(0)) && e.post == PostSlash::Eq);
        assert!(eq_to_noun(&mrs));

        let copy = mrs.clone();
        assert!(!eq_to_noun(&copy));
        assert_eq!(copy.ep(EpId(1)).unwrap().label, var!("h6"));
    }

    #[test]
    fn split_without_free_labels_keeps_the_scope() {
        let mut mrs = load(json!({
            "index": "e3",
            "eps": [
                { "pred": "_dog_n_1_rel", "label": "h5", "fvpairs": [ { "feature": "ARG0", "var": "x4294967295" } ] },
                { "pred": "_bark_v_1_rel", "label": "h5",
                  "fvpairs": [ { "feature": "ARG0", "var": "e3" }, { "feature": "ARG1", "var": "x4294967295" } ] },
            ],
        }));
        let relax = ClosurePolicy::new(true, true);
        let (kept, metrics) = mrs.decompose_with_metrics(&ids(&[1]), &BTreeSet::new(), relax);
        assert_eq!(kept, ids(&[0, 1]));
        assert_eq!(labels(&mrs), ["h5", "h5"]);
        assert_eq!(metrics.passes[0].relabelled, 0);
    }

    #[test]
    fn preposition_governor_joins_only_when_it_overlaps() {
        let closure_of_noun = |noun_from| {
            let mut mrs = preposition_and_noun(noun_from);
            mrs.decompose(&ids(&[1]), &BTreeSet::new(), ClosurePolicy::default())
        };
        // overlapping spans: the preposition is not before the noun
        assert_eq!(closure_of_noun(8), ids(&[0, 1]));
        // touching and separated spans: it is
        assert_eq!(closure_of_noun(9), ids(&[1]));
        assert_eq!(closure_of_noun(10), ids(&[1]));
    }

    #[test]
    fn exceptions_are_never_entered() {
        let mut mrs = fixtures::appos();
        let (kept, metrics) = mrs.decompose_with_metrics(&ids(&[5]), &ids(&[2]), ClosurePolicy::default());
        assert_eq!(kept, ids(&[5, 6, 7, 8, 9, 10]));
        let produced: Vec<usize> = metrics.passes.iter().map(|p| p.produced).collect();
        assert_eq!(produced, [1, 2, 1, 1, 0]);
        assert_eq!(metrics.passes[1].added, [EpId(6), EpId(7)]);
    }

    #[test]
    fn closure_is_a_fixpoint() {
        let mut mrs = fixtures::appos();
        let once = mrs.decompose(&ids(&[3]), &BTreeSet::new(), ClosurePolicy::default());
        let twice = mrs.decompose(&once, &BTreeSet::new(), ClosurePolicy::default());
        assert_eq!(once, twice);
        assert!(once.contains(&EpId(3)));
    }

    #[test]
    fn handles_seed_through_qeq_or_label() {
        let mrs = fixtures::quantified_noun();
        assert_eq!(mrs.seed_eps(var!("h4")), ids(&[1]));
        assert_eq!(mrs.seed_eps(var!("h5")), ids(&[1]));
        assert_eq!(mrs.seed_eps(var!("h3")), ids(&[0]));
        assert_eq!(mrs.seed_eps(var!("x2")), ids(&[1]));
        assert!(mrs.seed_eps(var!("h77")).is_empty());
    }

    #[test]
    fn empty_seed_marks_everything() {
        let mut mrs = fixtures::quantified_noun();
        let closure = mrs.decompose_by_ep(None, None, ClosurePolicy::default());
        assert!(closure.is_empty());
        assert!(closure.marks.get(EpId(0)) && closure.marks.get(EpId(1)));
        assert!(closure.metrics.passes.is_empty());

        let missing = mrs.decompose(&ids(&[99]), &BTreeSet::new(), ClosurePolicy::default());
        assert!(missing.is_empty());
    }

    #[test]
    fn marks_default_to_false() {
        let mut marks = EpMarks::all([EpId(0), EpId(1)], true);
        marks.set(EpId(1), false);
        assert!(marks.get(EpId(0)));
        assert!(!marks.get(EpId(1)));
        assert!(!marks.get(EpId(7)));
    }
}
