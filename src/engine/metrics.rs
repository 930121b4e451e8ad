//! Engine run metrics.
//!
//! Two passes are observed:
//!
//! - post-processing (`Mrs::postprocess`): coreference, characteristic
//!   variables and dependency construction, timed separately.
//! - decomposition (`Mrs::decompose_with_metrics`): one [`PassMetrics`] per
//!   closure iteration, until an iteration adds nothing.
//!
//! ## Design notes
//!
//! - `PassMetrics::added` lists EP ids and is cheap; it is always collected.
//! - Fields prefixed with `_` are collected but not shown by the CLI report.

use crate::ep::EpId;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct PostprocessMetrics {
    /// Total elapsed time for one post-processing run.
    pub total: Duration,
    pub coref: Duration,
    pub char_vars: Duration,
    pub dependencies: Duration,
    /// Variable occurrences that were folded into an earlier `x` slot.
    pub shared_occurrences: usize,
    /// Edge records across all EPs (each pair counts twice).
    pub edges: usize,
    pub _eps: usize,
}

/// Timings for one decomposition run.
#[derive(Debug, Default, Clone)]
pub struct ClosureMetrics {
    pub total: Duration,
    /// One entry per iteration, including the final empty one.
    pub passes: Vec<PassMetrics>,
}

impl ClosureMetrics {
    pub fn iterations(&self) -> usize {
        self.passes.len()
    }
}

#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Number of EPs pulled into the closure by this pass.
    pub produced: usize,
    pub added: Vec<EpId>,
    /// EPs that received a fresh label while splitting an `/EQ` scope.
    pub relabelled: usize,
    pub relax_eq: bool,
    pub keep_eq: bool,
    pub _edges_visited: usize,
}
