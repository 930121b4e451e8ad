//! Handle constraints (`h9 qeq h10`).

use crate::var::VarName;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HconsRelation {
    #[default]
    Qeq,
    Lheq,
    Outscopes,
}

impl fmt::Display for HconsRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HconsRelation::Qeq => "qeq",
            HconsRelation::Lheq => "lheq",
            HconsRelation::Outscopes => "outscopes",
        })
    }
}

/// `hi` is an argument handle of some EP, `lo` the label of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleConstraint {
    pub hi: VarName,
    pub lo: VarName,
    pub relation: HconsRelation,
}

impl HandleConstraint {
    pub fn qeq(hi: VarName, lo: VarName) -> Self {
        HandleConstraint { hi, lo, relation: HconsRelation::Qeq }
    }

    pub fn is_qeq(&self) -> bool {
        self.relation == HconsRelation::Qeq
    }
}

impl fmt::Display for HandleConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.hi, self.relation, self.lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_use_lowercase_names() {
        let rel: HconsRelation = serde_json::from_str("\"outscopes\"").unwrap();
        assert_eq!(rel, HconsRelation::Outscopes);
        assert_eq!(serde_json::to_string(&HconsRelation::Lheq).unwrap(), "\"lheq\"");
    }

    #[test]
    fn qeq_renders_inline() {
        let h = HandleConstraint::qeq(var!("h2"), var!("h3"));
        assert!(h.is_qeq());
        assert_eq!(h.to_string(), "h2 qeq h3");
        assert!(!HandleConstraint { relation: HconsRelation::Lheq, ..h }.is_qeq());
    }
}
