//! Structural warnings and unresolved ambiguities collected by post-processing.
//!
//! Grammar output is often partial, so most oddities are recorded and logged
//! rather than raised. Only [`Unresolved`] entries are promoted to errors, and
//! only when the caller asks for strict loading.

use crate::engine::PostprocessMetrics;
use crate::ep::EpId;
use crate::error::{MrsError, MrsResult};
use crate::hcons::HandleConstraint;
use crate::var::VarName;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `hi` is no EP's value or `lo` is no EP's label.
    DanglingHcons(HandleConstraint),
    /// An EP that neither governs nor is governed by anything.
    IsolatedEp(EpId),
    /// A quantifier whose restriction cannot be located.
    UnresolvedRstr { quantifier: EpId, rstr: VarName },
    /// `lheq` / `outscopes` constraints are carried but not interpreted.
    UnsupportedRelation(HandleConstraint),
    /// The main index is not an event variable.
    NonEventIndex(VarName),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DanglingHcons(h) => write!(f, "dangling handle constraint {h}"),
            Warning::IsolatedEp(id) => write!(f, "EP {id} has no dependencies"),
            Warning::UnresolvedRstr { quantifier, rstr } => {
                write!(f, "quantifier {quantifier} has no restriction for {rstr}")
            }
            Warning::UnsupportedRelation(h) => write!(f, "unsupported handle relation in {h}"),
            Warning::NonEventIndex(v) => write!(f, "main index {v} is not an event"),
        }
    }
}

/// A candidate set that could not be narrowed to one EP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub subject: String,
    pub candidates: Vec<EpId>,
}

impl Unresolved {
    pub fn to_error(&self) -> MrsError {
        MrsError::Unresolved { subject: self.subject.clone(), candidates: self.candidates.clone() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
    pub unresolved: Vec<Unresolved>,
    pub metrics: PostprocessMetrics,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, warning: Warning) {
        warn!(%warning, "structural warning");
        self.warnings.push(warning);
    }

    pub(crate) fn unresolved(&mut self, subject: String, candidates: Vec<EpId>) {
        if self.unresolved.iter().any(|u| u.subject == subject) {
            return;
        }
        error!(%subject, candidates = candidates.len(), "ambiguous resolution");
        self.unresolved.push(Unresolved { subject, candidates });
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.unresolved.is_empty()
    }

    /// Fail with the first unresolved ambiguity, if any.
    pub fn check_resolved(&self) -> MrsResult<()> {
        match self.unresolved.first() {
            Some(u) => Err(u.to_error()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_subjects_are_recorded_once() {
        let mut diag = Diagnostics::default();
        diag.unresolved("x5".into(), vec![EpId(1), EpId(2)]);
        diag.unresolved("x5".into(), vec![EpId(1), EpId(2)]);
        assert_eq!(diag.unresolved.len(), 1);
        assert!(matches!(diag.check_resolved(), Err(MrsError::Unresolved { .. })));
    }

    #[test]
    fn warnings_do_not_fail_resolution_checks() {
        let mut diag = Diagnostics::default();
        diag.warn(Warning::IsolatedEp(EpId(3)));
        assert!(!diag.is_clean());
        assert!(diag.check_resolved().is_ok());
        assert_eq!(diag.warnings[0].to_string(), "EP #3 has no dependencies");
    }
}
