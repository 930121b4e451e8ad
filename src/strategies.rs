//! Decomposition strategies.
//!
//! A strategy is a linguistic rule that picks seeds in an MRS and calls the
//! closure wrappers to carve out simpler sentences. Strategies never share
//! state: each one gets the original input and produces fresh clones.
//!
//! ```text
//!             ┌─► ApposDecomposer    ─► [the girl is Anna, the girl likes.., Anna likes..]
//!  input ─────┤
//!             └─► SubclauseDecomposer ─► [the dog barked]
//!                         │
//!                         v
//!             concatenated in strategy order
//! ```
//!
//! A strategy that fails on one input is logged and skipped; the pipeline
//! keeps going.

#[path = "strategies/apposition.rs"]
mod apposition;
#[path = "strategies/subclause.rs"]
mod subclause;


pub use apposition::ApposDecomposer;
pub use subclause::SubclauseDecomposer;

use crate::error::MrsResult;
use crate::mrs::Mrs;
use tracing::{debug, warn};

pub trait Decomposer {
    /// Provenance tag written into every produced MRS.
    fn name(&self) -> &'static str;

    fn decompose_one(&self, mrs: &Mrs) -> MrsResult<Vec<Mrs>>;

    /// Apply to every input; failures are logged and omitted.
    fn decompose(&self, inputs: &[Mrs]) -> Vec<Mrs> {
        let mut out = Vec::new();
        for (i, mrs) in inputs.iter().enumerate() {
            match self.decompose_one(mrs) {
                Ok(produced) => {
                    debug!(strategy = self.name(), input = i, produced = produced.len(), "strategy applied");
                    out.extend(produced);
                }
                Err(err) => warn!(strategy = self.name(), input = i, %err, "strategy failed, input skipped"),
            }
        }
        out
    }
}

pub fn default_strategies() -> Vec<Box<dyn Decomposer>> {
    vec![Box::new(ApposDecomposer), Box::new(SubclauseDecomposer)]
}

/// Run every strategy on `input` and concatenate the outputs in strategy order.
pub fn run_strategies(strategies: &[Box<dyn Decomposer>], input: &Mrs) -> Vec<Mrs> {
    strategies.iter().flat_map(|s| s.decompose(std::slice::from_ref(input))).collect()
}
