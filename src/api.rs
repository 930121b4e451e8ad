use crate::Span;
use crate::document::MrsDocument;
use crate::engine::{ClosureMetrics, ClosurePolicy, PostprocessMetrics, Warning};
use crate::ep::{Ep, EpId};
use crate::error::{MrsError, MrsResult};
use crate::mrs::Mrs;
use crate::strategies::{Decomposer, default_strategies};
use crate::var::VarName;
use std::time::{Duration, Instant};
use tracing::debug;

/// Options that affect loading.
#[derive(Debug, Clone)]
pub struct Options {
    /// Fail when a characteristic variable or dependent EP cannot be resolved.
    pub strict: bool,
    /// Rewrite tagged unknown-word predicates (`_fluffy/JJ_u_unknown_rel`).
    pub normalize_unknown_words: bool,
    /// Turn `NAMED_UNK_REL` into `NAMED_REL`.
    pub named_unknown_to_named: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { strict: true, normalize_unknown_words: true, named_unknown_to_named: false }
    }
}

/// A compact EP summary used in verbose traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpSummary {
    pub id: EpId,
    pub pred: String,
    pub label: VarName,
    pub span: Option<Span>,
}

impl From<&Ep> for EpSummary {
    fn from(ep: &Ep) -> Self {
        EpSummary { id: ep.id, pred: ep.name().to_string(), label: ep.label, span: ep.span }
    }
}

/// One strategy's contribution in [`decompose_verbose`].
#[derive(Debug, Clone)]
pub struct StrategyPass {
    pub strategy: &'static str,
    pub duration: Duration,
    pub produced: usize,
    /// Predicates of each produced MRS, in order.
    pub samples: Vec<Vec<EpSummary>>,
}

/// Additional details returned by [`decompose_verbose`].
#[derive(Debug, Clone)]
pub struct DecomposeDetails {
    pub total: Duration,
    /// Post-processing of the input, as recorded when it was loaded.
    pub postprocess: PostprocessMetrics,
    pub warnings: Vec<Warning>,
    pub passes: Vec<StrategyPass>,
    pub outputs: Vec<Mrs>,
}

/// Result of [`closure_verbose`]: the closure of one seed and the pruned MRS.
#[derive(Debug, Clone)]
pub struct ClosureDetails {
    pub seed: VarName,
    pub kept: Vec<EpSummary>,
    pub removed: Vec<EpSummary>,
    pub metrics: ClosureMetrics,
    pub result: Mrs,
}

// --- Loading and writing ------------------------------------------------------

/// Build and post-process an MRS from its document form.
pub fn read_document(doc: &MrsDocument, options: &Options) -> MrsResult<Mrs> {
    let mut mrs = Mrs::from_document(doc)?;
    if options.normalize_unknown_words {
        mrs.normalize_unknown_words();
    }
    if options.named_unknown_to_named {
        mrs.named_unknown_to_named();
    }
    if options.strict {
        mrs.diagnostics().check_resolved()?;
    }
    debug!(eps = mrs.len(), warnings = mrs.diagnostics().warnings.len(), "document loaded");
    Ok(mrs)
}

pub fn read_json(json: &str, options: &Options) -> MrsResult<Mrs> {
    let doc: MrsDocument = serde_json::from_str(json)?;
    read_document(&doc, options)
}

pub fn write_document(mrs: &Mrs) -> MrsDocument {
    mrs.to_document()
}

pub fn to_json(mrs: &Mrs) -> MrsResult<String> {
    serde_json::to_string_pretty(&mrs.to_document()).map_err(MrsError::from)
}

// --- Decomposition ------------------------------------------------------------

/// Run the default strategies on `mrs`.
///
/// # Example
/// ```
/// use mrsgraph::{Options, decompose, read_json};
///
/// let json = r#"{ "ltop": "h1", "index": "e2",
///   "eps": [ { "pred": "_rain_v_1_rel", "label": "h3", "cfrom": 0, "cto": 5,
///              "fvpairs": [ { "feature": "ARG0", "var": "e2" } ] } ] }"#;
/// let mrs = read_json(json, &Options::default()).unwrap();
/// assert!(decompose(&mrs).is_empty());
/// ```
pub fn decompose(mrs: &Mrs) -> Vec<Mrs> {
    decompose_with(mrs, &default_strategies())
}

pub fn decompose_with(mrs: &Mrs, strategies: &[Box<dyn Decomposer>]) -> Vec<Mrs> {
    crate::strategies::run_strategies(strategies, mrs)
}

/// As [`decompose_with`], with per-strategy timings and samples.
pub fn decompose_verbose(mrs: &Mrs, strategies: &[Box<dyn Decomposer>]) -> DecomposeDetails {
    let start = Instant::now();
    let mut passes = Vec::with_capacity(strategies.len());
    let mut outputs = Vec::new();

    for strategy in strategies {
        let t = Instant::now();
        let produced = strategy.decompose(std::slice::from_ref(mrs));
        passes.push(StrategyPass {
            strategy: strategy.name(),
            duration: t.elapsed(),
            produced: produced.len(),
            samples: produced.iter().map(|m| m.eps().map(EpSummary::from).collect()).collect(),
        });
        outputs.extend(produced);
    }

    DecomposeDetails {
        total: start.elapsed(),
        postprocess: mrs.diagnostics().metrics.clone(),
        warnings: mrs.diagnostics().warnings.clone(),
        passes,
        outputs,
    }
}

/// Closure of one seed token (a handle or a characteristic variable) on a
/// copy of `mrs`, with everything outside it removed.
pub fn closure_verbose(mrs: &Mrs, seed: VarName, policy: ClosurePolicy) -> MrsResult<ClosureDetails> {
    let mut result = mrs.clone();
    let closure = result.decompose_by_label(seed, None, policy);
    let kept = closure.kept.iter().filter_map(|id| result.ep(*id)).map(EpSummary::from).collect();
    let removed: Vec<EpSummary> = result.eps().filter(|ep| closure.marks.get(ep.id)).map(EpSummary::from).collect();

    if closure.is_empty() {
        debug!(seed = %seed, "seed selects no EP");
    } else if !removed.is_empty() {
        result.remove_eps_by_flag(&closure.marks, true)?;
    } else {
        result.postprocess();
    }
    Ok(ClosureDetails { seed, kept, removed, metrics: closure.metrics, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn read_json_post_processes() {
        let json = serde_json::to_string(&fixtures::appos_document()).unwrap();
        let mrs = read_json(&json, &Options::default()).unwrap();
        assert_eq!(mrs.len(), 11);
        assert_eq!(mrs.characteristic_ep(var!("x5")), Some(EpId(2)));
        assert_eq!(mrs.characteristic_ep(var!("e2")), Some(EpId(5)));
        assert!(mrs.diagnostics().unresolved.is_empty());
    }

    #[test]
    fn strict_loading_rejects_unresolved_variables() {
        // two unrelated EPs with different labels claim e2
        let doc: MrsDocument = serde_json::from_value(json!({
            "index": "e2",
            "eps": [
                { "pred": "_a_v_rel", "label": "h3", "fvpairs": [ { "feature": "ARG0", "var": "e2" } ] },
                { "pred": "_b_v_rel", "label": "h4", "fvpairs": [ { "feature": "ARG0", "var": "e2" } ] },
            ],
        }))
        .unwrap();

        let err = read_document(&doc, &Options::default()).unwrap_err();
        assert!(matches!(err, MrsError::Unresolved { ref subject, .. } if subject == "e2"));

        let lenient = Options { strict: false, ..Options::default() };
        let mrs = read_document(&doc, &lenient).unwrap();
        assert_eq!(mrs.characteristic_ep(var!("e2")), None);
        assert_eq!(mrs.diagnostics().unresolved.len(), 1);
    }

    #[test]
    fn unknown_words_are_normalized_on_load() {
        let doc: MrsDocument = serde_json::from_value(json!({
            "eps": [
                { "pred": "_fluffy/JJ_u_unknown_rel", "label": "h3",
                  "fvpairs": [ { "feature": "ARG0", "var": "e4" } ] },
                { "pred": "NAMED_UNK_REL", "label": "h5",
                  "fvpairs": [ { "feature": "ARG0", "var": "x6" }, { "feature": "CARG", "constant": "Zork" } ] },
            ],
        }))
        .unwrap();

        let options = Options { named_unknown_to_named: true, ..Options::default() };
        let mrs = read_document(&doc, &options).unwrap();
        let names: Vec<&str> = mrs.eps().map(|ep| ep.name()).collect();
        assert_eq!(names, ["_fluffy_a_unknown_rel", "NAMED_REL"]);

        let raw = read_document(&doc, &Options { normalize_unknown_words: false, ..Options::default() }).unwrap();
        assert_eq!(raw.eps().next().unwrap().name(), "_fluffy/JJ_u_unknown_rel");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(read_json("{ not json", &Options::default()), Err(MrsError::Json(_))));
    }

    #[test]
    fn to_json_writes_the_document() {
        let mrs = fixtures::quantified_noun();
        let value: serde_json::Value = serde_json::from_str(&to_json(&mrs).unwrap()).unwrap();
        assert_eq!(value["eps"][0]["pred"], "_a_q_rel");
        assert_eq!(value["hcons"][0], json!({ "hi": "h4", "rel": "qeq", "lo": "h5" }));
        assert_eq!(write_document(&mrs), mrs.to_document());
    }

    #[test]
    fn decompose_verbose_reports_each_strategy() {
        let mrs = fixtures::appos();
        let details = decompose_verbose(&mrs, &default_strategies());
        assert_eq!(details.passes.len(), 2);
        assert_eq!(details.passes[0].strategy, "Apposition");
        assert_eq!(details.passes[0].produced, 3);
        assert_eq!(details.passes[1].produced, 0);
        assert_eq!(details.outputs.len(), 3);
        assert_eq!(details.passes[0].samples[0].len(), 5);
        assert!(details.total >= details.passes[0].duration);
    }

    #[test]
    fn closure_verbose_prunes_a_copy() {
        let mrs = fixtures::appos();
        let details = closure_verbose(&mrs, var!("x6"), ClosurePolicy::default()).unwrap();
        let kept: Vec<EpId> = details.kept.iter().map(|s| s.id).collect();
        // Anna pulls in the apposition, which pulls in the girl; the verb stays out
        assert_eq!(kept, [EpId(0), EpId(1), EpId(2), EpId(3), EpId(4)]);
        assert_eq!(details.removed.len(), 6);
        assert_eq!(details.result.len(), 5);
        assert_eq!(mrs.len(), 11);
        assert!(details.metrics.iterations() >= 3);
    }

    #[test]
    fn closure_of_an_unknown_seed_is_empty() {
        let mrs = fixtures::quantified_noun();
        let details = closure_verbose(&mrs, var!("x99"), ClosurePolicy::default()).unwrap();
        assert!(details.kept.is_empty());
        assert_eq!(details.result.len(), 2);
    }
}
