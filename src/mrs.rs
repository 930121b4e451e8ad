//! The MRS aggregate.
//!
//! `Mrs` owns the EP arena (ordered by surface position), the handle
//! constraints, the variable table and the derived indices. Derived state
//! (coreference table, characteristic-variable map, dependency graph) is only
//! valid after [`Mrs::postprocess`]; every mutation API below that changes
//! structure ends by calling it.
//!
//! ## Lifecycle
//!
//! ```text
//!  new / from document ── add_ep, add_*_pair, add_hcons ──► postprocess()
//!         │                                                     │
//!         └──────────── clone() (ids are kept) ◄────────────────┘
//!                             │
//!            decompose_* ─► Closure { kept, marks }
//!                             │
//!            remove_eps_by_flag(&marks, flag) ─► clean_hcons + postprocess
//! ```
//!
//! Cloning copies every EP and variable slot, so a clone can be decomposed and
//! pruned without touching its source. EP ids survive the clone, which is how
//! an EP found in one MRS is located in a copy.

use crate::Span;
use crate::dmrs::{DependencyGraph, Direction, DmrsEdge};
use crate::engine::{self, Diagnostics, EpMarks, PostprocessMetrics, Warning};
use crate::ep::{Ep, EpId, Predicate};
use crate::error::{MrsError, MrsResult};
use crate::fvpair::{FvPair, FvValue};
use crate::hcons::HandleConstraint;
use crate::var::{Sort, Var, VarId, VarName, VarRef, VarTable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Sentence type tag carried through decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentenceType {
    #[default]
    Declarative,
    YesNo,
    /// A wh-question type such as `WHO` or `WHERE`.
    Wh(String),
}

impl SentenceType {
    pub fn is_declarative(&self) -> bool {
        *self == SentenceType::Declarative
    }
}

impl From<String> for SentenceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "declarative" => SentenceType::Declarative,
            "Y/N" => SentenceType::YesNo,
            _ => SentenceType::Wh(value),
        }
    }
}

impl From<SentenceType> for String {
    fn from(value: SentenceType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SentenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceType::Declarative => f.write_str("declarative"),
            SentenceType::YesNo => f.write_str("Y/N"),
            SentenceType::Wh(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Default)]
pub struct Mrs {
    ltop: Option<VarName>,
    index: Option<VarName>,
    eps: IndexMap<EpId, Ep>,
    hcons: Vec<HandleConstraint>,
    vars: VarTable,
    sentence_type: SentenceType,
    provenance: Vec<String>,
    answer_range: Option<Span>,
    next_id: u32,
    // derived
    coref: HashMap<VarName, VarId>,
    char_vars: HashMap<VarName, EpId>,
    graph: DependencyGraph,
    diagnostics: Diagnostics,
    // labels moved since the last postprocess
    stale: bool,
}

/// A clone of an MRS whose labels were split by a closure gets its derived
/// indices rebuilt; otherwise they are copied as they are.
impl Clone for Mrs {
    fn clone(&self) -> Self {
        let mut copy = Mrs {
            ltop: self.ltop,
            index: self.index,
            eps: self.eps.clone(),
            hcons: self.hcons.clone(),
            vars: self.vars.clone(),
            sentence_type: self.sentence_type.clone(),
            provenance: self.provenance.clone(),
            answer_range: self.answer_range,
            next_id: self.next_id,
            coref: self.coref.clone(),
            char_vars: self.char_vars.clone(),
            graph: self.graph.clone(),
            diagnostics: self.diagnostics.clone(),
            stale: self.stale,
        };
        if copy.stale {
            copy.postprocess();
        }
        copy
    }
}

impl Mrs {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction -----------------------------------------------------------

    pub fn set_ltop(&mut self, ltop: VarName) {
        self.ltop = Some(ltop);
    }

    pub fn set_index(&mut self, index: VarName) {
        if index.sort != Sort::Event {
            warn!(%index, "main index is not an event");
        }
        self.index = Some(index);
    }

    /// Append an EP with no pairs yet. Call [`Mrs::postprocess`] once the
    /// structure is complete.
    pub fn add_ep(&mut self, predicate: &str, label: VarName, span: Option<Span>) -> EpId {
        let id = EpId(self.next_id);
        self.next_id += 1;
        self.eps.insert(id, Ep { id, predicate: Predicate::new(predicate), label, span, fvpairs: Vec::new() });
        id
    }

    pub fn add_var_pair(&mut self, ep: EpId, feature: &str, var: Var) -> MrsResult<VarRef> {
        if !self.eps.contains_key(&ep) {
            return Err(MrsError::EpNotFound(ep));
        }
        let occurrence = self.vars.insert(var);
        self.push_pair(ep, FvPair::var(feature, occurrence))?;
        Ok(occurrence)
    }

    pub fn add_constant_pair(&mut self, ep: EpId, feature: &str, value: &str) -> MrsResult<()> {
        self.push_pair(ep, FvPair::constant(feature, value))
    }

    fn push_pair(&mut self, ep: EpId, pair: FvPair) -> MrsResult<()> {
        let target = self.eps.get_mut(&ep).ok_or(MrsError::EpNotFound(ep))?;
        target.fvpairs.push(pair);
        Ok(())
    }

    pub fn add_hcons(&mut self, constraint: HandleConstraint) {
        self.hcons.push(constraint);
    }

    // --- Post-processing --------------------------------------------------------

    /// Rebuild every derived index: coreference, characteristic variables,
    /// dependencies, then structural checks.
    pub fn postprocess(&mut self) -> &Diagnostics {
        let start = Instant::now();
        let mut diagnostics = Diagnostics::default();
        let mut metrics = PostprocessMetrics { _eps: self.eps.len(), ..PostprocessMetrics::default() };

        let t = Instant::now();
        let outcome = engine::resolve_coreference(&mut self.eps, &self.vars);
        self.vars = outcome.vars;
        self.coref = outcome.coref;
        metrics.shared_occurrences = outcome.shared_occurrences;
        metrics.coref = t.elapsed();

        let t = Instant::now();
        let mut graph = DependencyGraph::new();
        self.char_vars = engine::map_characteristic_variables(self, &mut graph, &mut diagnostics);
        metrics.char_vars = t.elapsed();

        let t = Instant::now();
        engine::build_dependencies(self, &mut graph, &mut diagnostics);
        metrics.edges = graph.edge_count();
        self.graph = graph;
        metrics.dependencies = t.elapsed();

        self.check_structure(&mut diagnostics);
        metrics.total = start.elapsed();
        diagnostics.metrics = metrics;
        debug!(
            eps = self.eps.len(),
            edges = diagnostics.metrics.edges,
            warnings = diagnostics.warnings.len(),
            "postprocessed"
        );
        self.diagnostics = diagnostics;
        self.stale = false;
        &self.diagnostics
    }

    fn check_structure(&self, diagnostics: &mut Diagnostics) {
        let values = self.all_values();
        let labels = self.all_labels();
        for h in &self.hcons {
            if !h.is_qeq() {
                diagnostics.warn(Warning::UnsupportedRelation(*h));
            }
            if !values.contains(&h.hi) || !labels.contains(&h.lo) {
                diagnostics.warn(Warning::DanglingHcons(*h));
            }
        }
        if let Some(index) = self.index {
            if index.sort != Sort::Event {
                diagnostics.warn(Warning::NonEventIndex(index));
            }
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // --- Accessors --------------------------------------------------------------

    pub fn ltop(&self) -> Option<VarName> {
        self.ltop
    }

    pub fn index(&self) -> Option<VarName> {
        self.index
    }

    pub fn eps(&self) -> impl Iterator<Item = &Ep> {
        self.eps.values()
    }

    pub fn ep_ids(&self) -> Vec<EpId> {
        self.eps.keys().copied().collect()
    }

    pub fn ep(&self, id: EpId) -> Option<&Ep> {
        self.eps.get(&id)
    }

    /// Direct access for predicate or span edits. Structural edits made
    /// through this handle require [`Mrs::postprocess`] afterwards.
    pub fn ep_mut(&mut self, id: EpId) -> Option<&mut Ep> {
        self.eps.get_mut(&id)
    }

    pub fn contains(&self, id: EpId) -> bool {
        self.eps.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.eps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eps.is_empty()
    }

    pub fn hcons(&self) -> &[HandleConstraint] {
        &self.hcons
    }

    pub fn var(&self, id: VarId) -> Option<&Var> {
        self.vars.get(id)
    }

    pub fn var_mut(&mut self, id: VarId) -> Option<&mut Var> {
        self.vars.get_mut(id)
    }

    pub fn vars(&self) -> &VarTable {
        &self.vars
    }

    /// The variable slot behind `feature` of `ep`.
    pub fn var_of(&self, ep: EpId, feature: &str) -> Option<&Var> {
        let occurrence = self.ep(ep)?.fvpair(feature)?.var_ref()?;
        self.vars.get(occurrence.id)
    }

    /// Set an extra attribute on the slot behind `feature` of `ep`. Shared
    /// `x` slots make the write visible through every occurrence.
    pub fn set_var_extra(&mut self, ep: EpId, feature: &str, key: &str, value: &str) -> MrsResult<()> {
        let target = self.ep(ep).ok_or(MrsError::EpNotFound(ep))?;
        let Some(occurrence) = target.fvpair(feature).and_then(FvPair::var_ref) else {
            return Ok(());
        };
        if let Some(var) = self.vars.get_mut(occurrence.id) {
            var.set_extra(key, value);
        }
        Ok(())
    }

    pub fn sentence_type(&self) -> &SentenceType {
        &self.sentence_type
    }

    pub fn set_sentence_type(&mut self, sentence_type: SentenceType) {
        self.sentence_type = sentence_type;
    }

    /// Names of the strategies that produced this MRS, oldest first.
    pub fn provenance(&self) -> &[String] {
        &self.provenance
    }

    pub fn add_provenance(&mut self, strategy: &str) {
        self.provenance.push(strategy.to_string());
    }

    pub fn answer_range(&self) -> Option<Span> {
        self.answer_range
    }

    pub fn set_answer_range(&mut self, range: Option<Span>) {
        self.answer_range = range;
    }

    // --- Derived indices ----------------------------------------------------------

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn edges(&self, id: EpId) -> &[DmrsEdge] {
        self.graph.edges(id)
    }

    /// Canonical slot of an `x` variable.
    pub fn coref_var(&self, name: VarName) -> Option<VarId> {
        self.coref.get(&name).copied()
    }

    /// The EP owning `name` as its characteristic variable.
    pub fn characteristic_ep(&self, name: VarName) -> Option<EpId> {
        self.char_vars.get(&name).copied()
    }

    pub fn characteristic_map(&self) -> &HashMap<VarName, EpId> {
        &self.char_vars
    }

    // --- Queries ----------------------------------------------------------------

    pub fn eps_with_label(&self, label: VarName) -> Vec<&Ep> {
        self.eps().filter(|ep| ep.label == label).collect()
    }

    pub fn eps_by_predicate(&self, name: &str) -> Vec<EpId> {
        self.eps().filter(|ep| ep.name() == name).map(|ep| ep.id).collect()
    }

    pub fn eps_by_feature_value(&self, feature: &str, value: VarName) -> Vec<EpId> {
        self.eps()
            .filter(|ep| ep.fvpairs.iter().any(|p| p.feature == feature && p.var_name() == Some(value)))
            .map(|ep| ep.id)
            .collect()
    }

    /// The first pair per EP whose variable is `value`.
    pub fn fvpairs_by_value(&self, value: VarName) -> Vec<(EpId, &FvPair)> {
        self.eps()
            .filter_map(|ep| ep.fvpairs.iter().find(|p| p.var_name() == Some(value)).map(|p| (ep.id, p)))
            .collect()
    }

    /// Every occurrence of `value`, across all EPs and features.
    pub fn occurrences(&self, value: VarName) -> Vec<VarRef> {
        self.eps().flat_map(|ep| ep.fvpairs.iter()).filter_map(FvPair::var_ref).filter(|r| r.name == value).collect()
    }

    /// EPs whose span is exactly `span`.
    pub fn eps_at(&self, span: Span) -> Vec<EpId> {
        self.eps().filter(|ep| ep.span == Some(span)).map(|ep| ep.id).collect()
    }

    /// The EP immediately before the first EP spanning exactly `span`, if the
    /// two do not overlap.
    pub fn ep_before(&self, span: Span) -> Option<EpId> {
        let mut previous: Option<&Ep> = None;
        for ep in self.eps() {
            if ep.span == Some(span) {
                let before = previous?;
                return match before.span {
                    Some(b) if b.to >= span.from => {
                        error!(before = %before.id, next = %ep.id, "EPs are not in surface order");
                        None
                    }
                    _ => Some(before.id),
                };
            }
            previous = Some(ep);
        }
        None
    }

    /// EPs with a span inside `range`.
    pub fn eps_in_range(&self, range: Span) -> BTreeSet<EpId> {
        self.eps().filter(|ep| ep.span.is_some_and(|s| range.contains(s))).map(|ep| ep.id).collect()
    }

    /// EPs with a span entirely outside `range`. EPs without a span count as
    /// outside.
    pub fn eps_not_in_range(&self, range: Span) -> BTreeSet<EpId> {
        self.eps()
            .filter(|ep| ep.span.is_none_or(|s| s.from >= range.to || s.to <= range.from))
            .map(|ep| ep.id)
            .collect()
    }

    /// The lo label constrained by `hi`. When no constraint exists but some EP
    /// is labelled `hi` directly, `hi` itself is returned.
    pub fn lo_label(&self, hi: VarName) -> Option<VarName> {
        if let Some(h) = self.hcons.iter().find(|h| h.hi == hi) {
            return Some(h.lo);
        }
        self.eps().any(|ep| ep.label == hi).then_some(hi)
    }

    pub fn hi_label(&self, lo: VarName) -> Option<VarName> {
        self.hcons.iter().find(|h| h.lo == lo).map(|h| h.hi)
    }

    /// The EP introducing the main event. A modal taking the event is looked
    /// through to the verb its ARG1 scopes over.
    pub fn main_verb(&self) -> Option<EpId> {
        let event = self.index?;
        let mut verb = None;
        let mut modal = None;
        for id in self.eps_by_feature_value("ARG0", event) {
            let ep = self.ep(id)?;
            if ep.name().contains("_modal_") {
                modal = Some(ep);
            } else {
                verb = Some(id);
            }
        }
        if let Some(modal) = modal {
            let scoped = modal
                .value("ARG1")
                .and_then(|hi| self.lo_label(hi))
                .map(|lo| self.eps_with_label(lo))
                .unwrap_or_default();
            match scoped.as_slice() {
                [only] => verb = Some(only.id),
                _ => warn!(modal = %modal.id, candidates = scoped.len(), "modal does not scope over exactly one verb"),
            }
        }
        verb
    }

    /// `TENSE` of the main event, `PRES` when unset.
    pub fn tense(&self) -> String {
        self.index
            .and_then(|index| self.fvpairs_by_value(index).first().and_then(|(_, p)| p.var_ref()))
            .and_then(|r| self.vars.get(r.id))
            .and_then(|var| var.extra("TENSE"))
            .unwrap_or("PRES")
            .to_string()
    }

    pub fn set_tense(&mut self, tense: &str) {
        if let Some(index) = self.index {
            self.set_extra_everywhere(index, "TENSE", tense);
        }
    }

    /// Mark the main event as a question.
    pub fn set_sf_question(&mut self) {
        match self.index {
            Some(index) => self.set_extra_everywhere(index, "SF", "QUES"),
            None => error!("cannot set sentence force without a main index"),
        }
    }

    /// Mark every variable carrying a sentence force as a question.
    pub fn set_all_sf_question(&mut self) {
        for var in self.vars.iter_mut() {
            if var.extras.contains_key("SF") {
                var.set_extra("SF", "QUES");
            }
        }
    }

    fn set_extra_everywhere(&mut self, name: VarName, key: &str, value: &str) {
        let slots: HashSet<VarId> = self.occurrences(name).into_iter().map(|r| r.id).collect();
        for id in slots {
            if let Some(var) = self.vars.get_mut(id) {
                var.set_extra(key, value);
            }
        }
    }

    /// The answer phrase in `sentence`: `yes` for yes/no questions, else the
    /// answer range with a trailing ` .` or ` ,` dropped.
    pub fn answer_phrase(&self, sentence: &str) -> String {
        if self.sentence_type == SentenceType::YesNo {
            return "yes".to_string();
        }
        let Some(range) = self.answer_range else {
            return String::new();
        };
        let chars: Vec<char> = sentence.chars().collect();
        if range.from > range.to || range.to > chars.len() {
            return String::new();
        }
        let phrase: String = chars[range.from..range.to].iter().collect();
        match phrase.strip_suffix(" .").or_else(|| phrase.strip_suffix(" ,")) {
            Some(trimmed) => trimmed.to_string(),
            None => phrase,
        }
    }

    /// Cover the spans of `ids`; EPs without a span are skipped.
    pub fn set_answer_range_from(&mut self, ids: &BTreeSet<EpId>) {
        let spans: Vec<Span> = ids.iter().filter_map(|id| self.ep(*id)).filter_map(|ep| ep.span).collect();
        let from = spans.iter().map(|s| s.from).min();
        let to = spans.iter().map(|s| s.to).max();
        if let (Some(from), Some(to)) = (from, to) {
            self.answer_range = Some(Span::new(from, to));
        }
    }

    /// `n` handles whose indices are above every index in use. Indices are
    /// global across sorts, so `x7` blocks `h7`. Fewer than `n` come back
    /// when the index space runs out.
    pub fn generate_unused_labels(&self, n: usize) -> Vec<VarName> {
        let labels = self.eps().map(|ep| ep.label);
        let values = self.eps().flat_map(|ep| ep.values());
        let constraints = self.hcons.iter().flat_map(|h| [h.hi, h.lo]);
        let top = labels
            .chain(values)
            .chain(constraints)
            .chain(self.ltop)
            .chain(self.index)
            .map(|v| v.index)
            .max()
            .unwrap_or(0);
        let labels: Vec<VarName> = (1..=n as u32).map_while(|i| top.checked_add(i)).map(VarName::handle).collect();
        if labels.len() < n {
            warn!(requested = n, top, "variable indices exhausted");
        }
        labels
    }

    fn all_values(&self) -> HashSet<VarName> {
        self.eps().flat_map(|ep| ep.values()).collect()
    }

    fn all_labels(&self) -> HashSet<VarName> {
        self.eps().map(|ep| ep.label).collect()
    }

    // --- Graph-based EP predicates --------------------------------------------------

    /// Any `ARG<n>/EQ` edge, in either direction.
    pub fn has_eq_arg(&self, id: EpId) -> bool {
        self.edges(id).iter().any(DmrsEdge::is_arg_eq)
    }

    /// An `ARG<n>/EQ` edge to something that is neither a verb nor a preposition.
    pub fn has_eq_arg_to_non_pp_or_verb(&self, id: EpId) -> bool {
        self.edges(id)
            .iter()
            .filter(|e| e.is_arg_eq())
            .filter_map(|e| e.other.and_then(|o| self.ep(o)))
            .any(|o| !o.is_verb() && !o.is_preposition())
    }

    /// An unfillable `ARG<n>/NULL` argument.
    pub fn has_empty_args(&self, id: EpId) -> bool {
        self.edges(id).iter().any(DmrsEdge::is_empty_arg)
    }

    /// As [`Mrs::has_empty_args`], but false when a passive marker is linked.
    pub fn has_empty_args_except_passive(&self, id: EpId) -> bool {
        let passive = self.edges(id).iter().filter_map(|e| e.other.and_then(|o| self.ep(o))).any(Ep::is_passive);
        !passive && self.has_empty_args(id)
    }

    /// A preposition ending before every spanned EP in `set`. EPs without a
    /// span are ignored; a preposition without a span is never "before".
    pub fn is_preposition_before(&self, id: EpId, set: &BTreeSet<EpId>) -> bool {
        let Some(ep) = self.ep(id) else {
            return false;
        };
        let Some(span) = ep.span.filter(|_| ep.is_preposition()) else {
            return false;
        };
        set.iter().filter_map(|other| self.ep(*other)).filter_map(|other| other.span).all(|other| span.to <= other.from)
    }

    /// A verb whose event is untensed and progressive ("people suffering").
    pub fn is_progressive_in_relative(&self, id: EpId) -> bool {
        if !self.ep(id).is_some_and(Ep::is_verb) {
            return false;
        }
        self.var_of(id, "ARG0")
            .is_some_and(|var| var.extra("TENSE") == Some("UNTENSED") && var.extra("PROG") == Some("+"))
    }

    /// The verb a preposition modifies, following `ARG/EQ` dependents through
    /// chains of prepositions.
    pub fn verb_of_preposition(&self, id: EpId) -> Option<EpId> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            if !self.ep(current)?.is_preposition() || !seen.insert(current) {
                return None;
            }
            let next = self
                .edges(current)
                .iter()
                .filter(|e| e.is_arg_eq() && e.direction == Direction::Dep)
                .filter_map(|e| e.other.and_then(|o| self.ep(o)))
                .find(|o| o.is_verb() || o.is_preposition())?;
            if next.is_verb() {
                return Some(next.id);
            }
            current = next.id;
        }
    }

    // --- Mutation ---------------------------------------------------------------

    pub fn remove_ep(&mut self, id: EpId) -> MrsResult<()> {
        self.remove_eps(&[id])
    }

    /// Remove all of `ids` or nothing.
    pub fn remove_eps(&mut self, ids: &[EpId]) -> MrsResult<()> {
        if let Some(missing) = ids.iter().find(|id| !self.eps.contains_key(*id)) {
            error!(ep = %missing, "cannot remove EP");
            return Err(MrsError::EpNotFound(*missing));
        }
        for id in ids {
            self.eps.shift_remove(id);
        }
        self.clean_hcons();
        self.postprocess();
        Ok(())
    }

    /// Remove every EP whose mark equals `flag`; returns how many went.
    pub fn remove_eps_by_flag(&mut self, marks: &EpMarks, flag: bool) -> MrsResult<usize> {
        let ids: Vec<EpId> = self.eps.keys().copied().filter(|id| marks.get(*id) == flag).collect();
        if ids.is_empty() {
            error!(flag, "no EP carries the removal flag");
            return Err(MrsError::NothingMarked { flag });
        }
        self.remove_eps(&ids)?;
        Ok(ids.len())
    }

    pub fn remove_hcons(&mut self, constraint: &HandleConstraint) -> MrsResult<()> {
        match self.hcons.iter().position(|h| h == constraint) {
            Some(pos) => {
                self.hcons.remove(pos);
                Ok(())
            }
            None => Err(MrsError::HconsNotFound(constraint.to_string())),
        }
    }

    /// Drop constraints whose `hi` is no EP value or whose `lo` is no EP
    /// label. Returns the number dropped.
    pub fn clean_hcons(&mut self) -> usize {
        let values = self.all_values();
        let labels = self.all_labels();
        let before = self.hcons.len();
        self.hcons.retain(|h| values.contains(&h.hi) && labels.contains(&h.lo));
        let dropped = before - self.hcons.len();
        if dropped > 0 {
            debug!(dropped, "cleaned handle constraints");
        }
        dropped
    }

    /// Move `ids` to `label` and resynchronise.
    pub fn relabel_eps(&mut self, ids: &[EpId], label: VarName) -> MrsResult<()> {
        if let Some(missing) = ids.iter().find(|id| !self.eps.contains_key(*id)) {
            return Err(MrsError::EpNotFound(*missing));
        }
        for id in ids {
            self.set_label_unsynced(*id, label);
        }
        self.clean_hcons();
        self.postprocess();
        Ok(())
    }

    pub(crate) fn set_label_unsynced(&mut self, id: EpId, label: VarName) {
        if let Some(ep) = self.eps.get_mut(&id) {
            ep.label = label;
            self.stale = true;
        }
    }

    /// Rename every occurrence of `old` to `new`, keeping attribute slots.
    pub fn rename_value(&mut self, old: VarName, new: VarName) {
        for ep in self.eps.values_mut() {
            for pair in &mut ep.fvpairs {
                if let FvValue::Var(r) = &mut pair.value {
                    if r.name == old {
                        r.name = new;
                        if let Some(var) = self.vars.get_mut(r.id) {
                            var.name = new;
                        }
                    }
                }
            }
        }
        self.clean_hcons();
        self.postprocess();
    }

    /// Point every occurrence of `old` at the slot of `with`. A name with no
    /// occurrence yet gets a fresh slot.
    pub fn replace_var(&mut self, old: VarName, with: VarName) {
        let existing = self.coref_var(with).or_else(|| self.occurrences(with).first().map(|r| r.id));
        let slot = match existing {
            Some(id) => id,
            None => self.vars.insert(Var::new(with)).id,
        };
        let target = VarRef { name: with, id: slot };
        for ep in self.eps.values_mut() {
            for pair in &mut ep.fvpairs {
                if let FvValue::Var(r) = &mut pair.value {
                    if r.name == old {
                        *r = target;
                    }
                }
            }
        }
        self.clean_hcons();
        self.postprocess();
    }

    pub fn rename_predicate(&mut self, id: EpId, name: &str) -> MrsResult<()> {
        let ep = self.eps.get_mut(&id).ok_or(MrsError::EpNotFound(id))?;
        ep.set_predicate(name);
        Ok(())
    }

    /// `NAMED_UNK_REL` becomes `NAMED_REL`.
    pub fn named_unknown_to_named(&mut self) {
        for ep in self.eps.values_mut() {
            if ep.predicate.is_relation() && ep.name().eq_ignore_ascii_case("NAMED_UNK_REL") {
                ep.set_predicate("NAMED_REL");
            }
        }
    }

    /// Rewrite tagged unknown-word predicates (`_fluffy/JJ_u_unknown_rel`) to
    /// the grammar's lexical form (`_fluffy_a_unknown_rel`).
    pub fn normalize_unknown_words(&mut self) {
        const TAGS: [(&str, &str); 6] =
            [("/JJ_u", "_a"), ("/JJR_u", "_a"), ("/JJS_u", "_a"), ("/NN_u", "_n"), ("/RB_u", "_a"), ("/FW_u", "_n")];
        for ep in self.eps.values_mut() {
            let name = ep.name().to_string();
            if !name.contains("_unknown_rel") {
                continue;
            }
            match TAGS.iter().find(|(tag, _)| name.contains(tag)) {
                Some((tag, replacement)) => ep.set_predicate(&name.replacen(tag, replacement, 1)),
                None => debug!(pred = %name, "unknown word left as is"),
            }
        }
    }
}

impl fmt::Display for Mrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<VarName>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        writeln!(f, "[ LTOP: {}", show(self.ltop))?;
        writeln!(f, "  INDEX: {}", show(self.index))?;
        writeln!(f, "  RELS: <")?;
        for ep in self.eps() {
            write!(f, "    [ {}", ep.predicate)?;
            if let Some(span) = ep.span {
                write!(f, "<{}:{}>", span.from, span.to)?;
            }
            write!(f, " LBL: {}", ep.label)?;
            for pair in &ep.fvpairs {
                match &pair.value {
                    FvValue::Var(r) => {
                        write!(f, " {}: {}", pair.feature, r.name)?;
                        if let Some(var) = self.vars.get(r.id).filter(|v| !v.extras.is_empty()) {
                            let extras: Vec<String> = var.extras.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                            write!(f, " [ {} ]", extras.join(" "))?;
                        }
                    }
                    FvValue::Constant(c) => write!(f, " {}: \"{}\"", pair.feature, c)?,
                }
            }
            writeln!(f, " ]")?;
        }
        writeln!(f, "  >")?;
        let hcons: Vec<String> = self.hcons.iter().map(ToString::to_string).collect();
        write!(f, "  HCONS: < {} > ]", hcons.join(" "))
    }
}
