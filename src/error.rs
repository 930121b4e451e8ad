//! Error types for MRS construction, mutation and decomposition.
//!
//! Structural oddities in grammar output (dangling constraints, isolated EPs)
//! are not errors; they are reported as [`crate::Warning`]s. Errors are kept for
//! malformed documents, failed removals and resolution failures that would
//! otherwise have to be guessed.

use crate::ep::EpId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrsError {
    /// A token that is not `<sort letter><index>`.
    #[error("invalid variable: {0:?}")]
    InvalidVariable(String),

    /// A feature/value pair with neither or both of a variable and a constant.
    #[error("malformed value for feature {feature}: expected exactly one of a variable or a constant")]
    MalformedValue { feature: String },

    /// An EP document without a scope label.
    #[error("EP {pred} has no scope label")]
    MissingLabel { pred: String },

    /// Removal or lookup of an EP that is not in the MRS.
    #[error("EP {0} not found")]
    EpNotFound(EpId),

    /// Removal of a handle constraint that is not in the MRS.
    #[error("handle constraint {0} not found")]
    HconsNotFound(String),

    /// A flag-based removal where no EP carries the flag.
    #[error("no EP is marked with flag {flag}")]
    NothingMarked { flag: bool },

    /// Ambiguous characteristic-variable or dependent-EP resolution.
    #[error("cannot resolve {subject} among candidates [{}]", join_ids(.candidates))]
    Unresolved { subject: String, candidates: Vec<EpId> },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MrsResult<T> = Result<T, MrsError>;

fn join_ids(ids: &[EpId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
