//! Relative clauses and participial modifiers: "the dog that barked chased
//! the cat." yields "the dog barked."
//!
//! Every verb or preposition that is not the main event, has its arguments
//! filled and attaches to a noun over `/EQ` becomes the seed of its own
//! sentence. The closure runs with `relax_eq` so the clause gets its own
//! scope label.

use crate::engine::ClosurePolicy;
use crate::ep::{Ep, EpId};
use crate::error::{MrsError, MrsResult};
use crate::mrs::Mrs;
use crate::strategies::Decomposer;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct SubclauseDecomposer;

impl Decomposer for SubclauseDecomposer {
    fn name(&self) -> &'static str {
        "Subclause"
    }

    fn decompose_one(&self, mrs: &Mrs) -> MrsResult<Vec<Mrs>> {
        let seeds: Vec<EpId> = mrs.eps().filter(|ep| is_clause_head(mrs, ep)).map(|ep| ep.id).collect();
        let mut out = Vec::new();
        for seed in seeds {
            if let Some(clause) = self.extract(mrs, seed)? {
                out.push(clause);
            }
        }
        Ok(out)
    }
}

fn is_clause_head(mrs: &Mrs, ep: &Ep) -> bool {
    if !(ep.is_verb() || ep.is_preposition()) || ep.arg0() == mrs.index() {
        return false;
    }
    if mrs.has_empty_args_except_passive(ep.id) || !(mrs.has_eq_arg(ep.id) || mrs.is_progressive_in_relative(ep.id)) {
        return false;
    }
    let proposition = mrs.var_of(ep.id, "ARG0").and_then(|var| var.extra("SF")).is_none_or(|sf| sf.starts_with("PROP"));
    // "Mary is the girl John fell in love with": neither 'fell' nor 'in' stands alone
    proposition && mrs.has_eq_arg_to_non_pp_or_verb(ep.id)
}

impl SubclauseDecomposer {
    fn extract(&self, mrs: &Mrs, seed: EpId) -> MrsResult<Option<Mrs>> {
        let mut clause = mrs.clone();
        let tense = match clause.tense().as_str() {
            "UNTENSED" => "PAST".to_string(),
            other => other.to_string(),
        };

        let closure = clause.decompose_by_ep(Some(seed), None, ClosurePolicy::new(true, true));

        let head = clause.ep(seed).ok_or(MrsError::EpNotFound(seed))?;
        let progressive = clause.is_progressive_in_relative(seed);
        let event = if head.is_verb() {
            head.arg0()
        } else {
            clause.verb_of_preposition(seed).and_then(|verb| clause.ep(verb)).and_then(Ep::arg0)
        };
        let Some(event) = event else {
            debug!(ep = %seed, "preposition without a verb");
            return Ok(None);
        };

        if progressive {
            clause.set_var_extra(seed, "ARG0", "TENSE", &tense)?;
            clause.set_var_extra(seed, "ARG0", "PROG", "-")?;
        }
        clause.set_index(event);
        if clause.tense() == "UNTENSED" {
            clause.set_tense(&tense);
        }
        clause.add_provenance(self.name());

        match clause.remove_eps_by_flag(&closure.marks, true) {
            Ok(removed) => {
                debug!(ep = %seed, kept = closure.kept.len(), removed, "clause extracted");
                Ok(Some(clause))
            }
            Err(MrsError::NothingMarked { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
