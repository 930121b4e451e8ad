#[macro_use]
mod macros;
mod api;
mod dmrs;
mod document;
mod engine;
mod ep;
mod error;
mod fvpair;
mod hcons;
mod mrs;
mod strategies;
mod var;

#[cfg(test)]
mod fixtures;

pub use api::{
    ClosureDetails, DecomposeDetails, EpSummary, Options, StrategyPass, closure_verbose, decompose, decompose_verbose,
    decompose_with, read_document, read_json, to_json, write_document,
};
pub use dmrs::{DependencyGraph, Direction, DmrsEdge, PostSlash, PreSlash};
pub use document::{EpDocument, FvPairDocument, HconsDocument, MrsDocument};
pub use engine::{
    Closure, ClosureMetrics, ClosurePolicy, Diagnostics, EpMarks, PassMetrics, PostprocessMetrics, Unresolved, Warning,
};
pub use ep::{Ep, EpClass, EpId, Predicate};
pub use error::{MrsError, MrsResult};
pub use fvpair::{FvPair, FvValue};
pub use hcons::{HandleConstraint, HconsRelation};
pub use mrs::{Mrs, SentenceType};
pub use strategies::{ApposDecomposer, Decomposer, SubclauseDecomposer, default_strategies, run_strategies};
pub use var::{Sort, Var, VarId, VarName, VarRef, VarTable};

// --- Shared small types -----------------------------------------------------

/// Character range `[from, to)` of an EP in the source sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn new(from: usize, to: usize) -> Self {
        Span { from, to }
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: Span) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.from < other.to && other.from < self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
