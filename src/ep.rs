//! Elementary predications.
//!
//! An EP is one predicate occurrence: a type name, a scope label, an optional
//! character span and an ordered list of feature/value pairs. Relations to
//! other EPs are *not* stored here; they live in the dependency graph owned by
//! the MRS and are rebuilt by post-processing.

use crate::Span;
use crate::fvpair::FvPair;
use crate::var::{Sort, VarName};
use std::fmt;

/// Stable identifier of an EP inside one MRS (and all of its clones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpId(pub(crate) u32);

impl EpId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Predicate name, split the way grammars emit them.
///
/// Grammar-level relations are written with upper case (`APPOS_REL`), lexical
/// ones in lower case (`_like_v_1_rel`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Relation(String),
    Surface(String),
}

impl Predicate {
    pub fn new(name: &str) -> Predicate {
        if name.chars().any(|c| c.is_uppercase()) {
            Predicate::Relation(name.to_string())
        } else {
            Predicate::Surface(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Predicate::Relation(s) | Predicate::Surface(s) => s,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Predicate::Relation(_))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Coarse lexical classes derived from the predicate name and ARG0.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EpClass: u8 {
        const VERB        = 1 << 0;
        const PREPOSITION = 1 << 1;
        const PASSIVE     = 1 << 2;
        const QUANTIFIER  = 1 << 3;
        const MODAL       = 1 << 4;
    }
}

// --- EP ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ep {
    pub id: EpId,
    pub predicate: Predicate,
    pub label: VarName,
    pub span: Option<Span>,
    pub fvpairs: Vec<FvPair>,
}

impl Ep {
    pub fn name(&self) -> &str {
        self.predicate.name()
    }

    pub fn fvpair(&self, feature: &str) -> Option<&FvPair> {
        self.fvpairs.iter().find(|p| p.feature.eq_ignore_ascii_case(feature))
    }

    /// Variable value of `feature`, e.g. `value("ARG1") == Some(x5)`.
    pub fn value(&self, feature: &str) -> Option<VarName> {
        self.fvpair(feature).and_then(FvPair::var_name)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.fvpair(feature).is_some()
    }

    /// The characteristic variable.
    pub fn arg0(&self) -> Option<VarName> {
        self.value("ARG0")
    }

    pub fn rstr(&self) -> Option<VarName> {
        self.value("RSTR")
    }

    /// All variable values in feature order.
    pub fn values(&self) -> impl Iterator<Item = VarName> + '_ {
        self.fvpairs.iter().filter_map(FvPair::var_name)
    }

    pub fn values_except_arg0(&self) -> impl Iterator<Item = VarName> + '_ {
        self.fvpairs.iter().filter(|p| !p.is_arg0()).filter_map(FvPair::var_name)
    }

    pub fn arg_values_except_arg0(&self) -> impl Iterator<Item = VarName> + '_ {
        self.fvpairs.iter().filter(|p| p.is_arg() && !p.is_arg0()).filter_map(FvPair::var_name)
    }

    pub fn classes(&self) -> EpClass {
        let lower = self.name().to_ascii_lowercase();
        let mut classes = EpClass::empty();
        if lower.contains("_v_") && self.arg0().is_some_and(|v| v.sort == Sort::Event) {
            classes |= EpClass::VERB;
        }
        if lower.contains("_p_") {
            classes |= EpClass::PREPOSITION;
        }
        if lower == "parg_d_rel" {
            classes |= EpClass::PASSIVE;
        }
        if self.has_feature("RSTR") {
            classes |= EpClass::QUANTIFIER;
        }
        if lower.contains("_modal_") {
            classes |= EpClass::MODAL;
        }
        classes
    }

    pub fn is_verb(&self) -> bool {
        self.classes().contains(EpClass::VERB)
    }

    pub fn is_preposition(&self) -> bool {
        self.classes().contains(EpClass::PREPOSITION)
    }

    pub fn is_passive(&self) -> bool {
        self.classes().contains(EpClass::PASSIVE)
    }

    pub fn is_quantifier(&self) -> bool {
        self.classes().contains(EpClass::QUANTIFIER)
    }

    pub fn set_predicate(&mut self, name: &str) {
        self.predicate = Predicate::new(name);
    }
}

impl fmt::Display for Ep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}", self.predicate)?;
        if let Some(span) = self.span {
            write!(f, "<{}:{}>", span.from, span.to)?;
        }
        write!(f, " LBL: {}", self.label)?;
        for pair in &self.fvpairs {
            match (pair.var_name(), pair.constant_value()) {
                (Some(v), _) => write!(f, " {}: {}", pair.feature, v)?,
                (None, Some(c)) => write!(f, " {}: \"{}\"", pair.feature, c)?,
                (None, None) => {}
            }
        }
        write!(f, " ]")
    }
}
