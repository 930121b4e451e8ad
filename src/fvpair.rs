//! Feature/value pairs.

use crate::var::{VarName, VarRef};

/// The value side of a pair: a variable occurrence or a literal (`CARG`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FvValue {
    Var(VarRef),
    Constant(String),
}

/// A named argument slot of an EP, e.g. `ARG1: x5` or `CARG: "Anna"`.
///
/// Feature names are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FvPair {
    pub feature: String,
    pub value: FvValue,
}

impl FvPair {
    pub fn var(feature: &str, var: VarRef) -> Self {
        FvPair { feature: feature.to_ascii_uppercase(), value: FvValue::Var(var) }
    }

    pub fn constant(feature: &str, value: &str) -> Self {
        FvPair { feature: feature.to_ascii_uppercase(), value: FvValue::Constant(value.to_string()) }
    }

    pub fn var_ref(&self) -> Option<VarRef> {
        match &self.value {
            FvValue::Var(r) => Some(*r),
            FvValue::Constant(_) => None,
        }
    }

    pub fn var_name(&self) -> Option<VarName> {
        self.var_ref().map(|r| r.name)
    }

    pub fn constant_value(&self) -> Option<&str> {
        match &self.value {
            FvValue::Constant(s) => Some(s),
            FvValue::Var(_) => None,
        }
    }

    pub fn is_arg(&self) -> bool {
        self.feature.starts_with("ARG")
    }

    /// Numeric suffix of an `ARG<n>` feature.
    pub fn arg_number(&self) -> Option<u8> {
        self.feature.strip_prefix("ARG").and_then(|n| n.parse().ok())
    }

    pub fn is_arg0(&self) -> bool {
        self.feature == "ARG0"
    }
}
