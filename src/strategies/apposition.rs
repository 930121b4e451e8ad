//! Apposition: "the girl Anna likes the dog Bart."
//!
//! The first `APPOS_REL` (or `COMPOUND_NAME_REL`) produces three sentences:
//!
//! - the apposition itself as a copula: "the girl is Anna."
//! - the sentence with ARG2 dropped: "the girl likes the dog Bart."
//! - the sentence with ARG1 dropped, ARG2 standing in: "Anna likes the dog Bart."
//!
//! Later appositions are left for a second run over the outputs.

use crate::Span;
use crate::engine::{ClosurePolicy, EpMarks};
use crate::ep::{Ep, EpId};
use crate::error::{MrsError, MrsResult};
use crate::mrs::Mrs;
use crate::strategies::Decomposer;
use crate::var::VarName;
use tracing::{debug, error};

const APPOSITION_PREDICATES: [&str; 2] = ["APPOS_REL", "COMPOUND_NAME_REL"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ApposDecomposer;

impl Decomposer for ApposDecomposer {
    fn name(&self) -> &'static str {
        "Apposition"
    }

    fn decompose_one(&self, mrs: &Mrs) -> MrsResult<Vec<Mrs>> {
        let Some(appos) = mrs.eps().find(|ep| APPOSITION_PREDICATES.contains(&ep.name())).map(|ep| ep.id) else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        if let Some(copula) = self.assemble(mrs, appos)? {
            out.push(copula);
        }
        out.extend(self.divide(mrs, appos)?);
        Ok(out)
    }
}

impl ApposDecomposer {
    /// Keep only what the apposition spans and turn it into `_BE_V_ID_REL`.
    fn assemble(&self, mrs: &Mrs, appos: EpId) -> MrsResult<Option<Mrs>> {
        let Some(range) = mrs.ep(appos).and_then(|ep| ep.span) else {
            debug!(ep = %appos, "apposition without span");
            return Ok(None);
        };
        let tense = mrs.tense();
        let mut copula = mrs.clone();

        let mut marks = EpMarks::new();
        let mut inside = false;
        for ep in copula.eps() {
            match ep.span {
                // spanless EPs follow their predecessor
                None if inside => {}
                Some(span) if range.contains(span) => inside = true,
                _ => {
                    inside = false;
                    marks.set(ep.id, true);
                }
            }
        }
        match copula.remove_eps_by_flag(&marks, true) {
            Ok(_) => {}
            Err(MrsError::NothingMarked { .. }) => return Ok(None),
            Err(err) => return Err(err),
        }

        copula.rename_predicate(appos, "_BE_V_ID_REL")?;
        if let Some(event) = copula.ep(appos).and_then(Ep::arg0) {
            copula.set_index(event);
        }
        copula.set_var_extra(appos, "ARG0", "TENSE", &tense)?;
        copula.named_unknown_to_named();
        let udef: Vec<EpId> =
            copula.eps().filter(|ep| ep.name().eq_ignore_ascii_case("UDEF_Q_REL")).map(|ep| ep.id).collect();
        for id in udef {
            // "Hurricane Katrina" -> "the hurricane is Katrina"
            copula.rename_predicate(id, "_THE_Q_REL")?;
        }
        copula.clean_hcons();
        copula.add_provenance(self.name());
        copula.postprocess();
        Ok(Some(copula))
    }

    /// One sentence per apposition argument.
    fn divide(&self, mrs: &Mrs, appos: EpId) -> MrsResult<Vec<Mrs>> {
        let ep = mrs.ep(appos).ok_or(MrsError::EpNotFound(appos))?;
        let (Some(arg1), Some(arg2)) = (ep.value("ARG1"), ep.value("ARG2")) else {
            error!(ep = %ep, "apposition needs both ARG1 and ARG2");
            return Ok(Vec::new());
        };
        let Some(range) = ep.span.filter(|span| !span.is_empty()) else {
            error!(ep = %ep, "apposition has an empty span");
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(2);
        for (dropped, kept) in [(arg2, arg1), (arg1, arg2)] {
            out.push(self.drop_argument(mrs, appos, range, dropped, kept)?);
        }
        Ok(out)
    }

    fn drop_argument(&self, mrs: &Mrs, appos: EpId, range: Span, dropped: VarName, kept: VarName) -> MrsResult<Mrs> {
        let mut half = mrs.clone();
        let mut exceptions = half.eps_not_in_range(range);
        exceptions.insert(appos);

        let mut closure = half.decompose_by_label_set(dropped, &exceptions, ClosurePolicy::new(false, true));
        closure.marks.set(appos, false);
        debug!(dropped = %dropped, removed = closure.kept.len() + 1, "apposition argument dropped");

        half.remove_eps_by_flag(&closure.marks, false)?;
        half.replace_var(dropped, kept);
        half.named_unknown_to_named();
        half.add_provenance(self.name());
        Ok(half)
    }
}
