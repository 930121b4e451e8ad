//! Post-processing and decomposition engine.
//!
//! The engine turns a flat EP list into the indexed structure the rest of the
//! crate works on, then computes semantic closures over it. Submodules live
//! under `src/engine/`; their public types are re-exported here.
//!
//! ## How the parts work together
//!
//! ```text
//!  Mrs (eps, hcons, vars)
//!        │
//!        v
//!  resolve_coreference (coref.rs)
//!    - one canonical slot per x-variable name
//!        │
//!        v
//!  map_characteristic_variables (charvar.rs)
//!    - x/e ARG0 ─► owning EP
//!    - ambiguity ─► dependent_ep (dependent.rs)
//!        │
//!        v
//!  build_dependencies (graph.rs)
//!    - RSTR/H, ARG<n>/EQ|NEQ|HEQ|H, ARG<n>/NULL
//!    - isolated EPs ─► Diagnostics (diagnostics.rs)
//!        │
//!        v
//!  DependencyGraph ──► decompose (closure.rs)
//!                        - iterate to fixpoint
//!                        - optional label split on the first pass
//! ```
//!
//! ## Responsibilities by module
//!
//! - `coref.rs`: rebuilds the variable table so every `x` occurrence of a name
//!   points at one slot. Other sorts keep a slot per occurrence.
//! - `charvar.rs`: maps characteristic variables to their owners.
//! - `dependent.rs`: picks the dependent among EPs sharing a label or ARG0.
//! - `graph.rs`: emits DMRS edges into a [`DependencyGraph`](crate::DependencyGraph).
//! - `closure.rs`: the closure primitive, its wrappers and soft-deletion marks.
//! - `diagnostics.rs`: warnings and unresolved ambiguities.
//! - `metrics.rs`: timing data for post-processing and closure passes.
//!
//! ## Debugging
//!
//! Set `MRSGRAPH_LOG=debug` to trace closure passes and index rebuilds.

#[path = "engine/charvar.rs"]
mod charvar;
#[path = "engine/closure.rs"]
mod closure;
#[path = "engine/coref.rs"]
mod coref;
#[path = "engine/dependent.rs"]
mod dependent;
#[path = "engine/diagnostics.rs"]
mod diagnostics;
#[path = "engine/graph.rs"]
mod graph;
#[path = "engine/metrics.rs"]
mod metrics;

pub(crate) use charvar::map_characteristic_variables;
#[allow(unused_imports)]
pub use closure::{Closure, ClosurePolicy, EpMarks};
pub(crate) use coref::resolve_coreference;
#[allow(unused_imports)]
pub use diagnostics::{Diagnostics, Unresolved, Warning};
pub(crate) use graph::build_dependencies;
#[allow(unused_imports)]
pub use metrics::{ClosureMetrics, PassMetrics, PostprocessMetrics};

#[cfg(test)]
#[path = "engine/properties.rs"]
mod properties;
