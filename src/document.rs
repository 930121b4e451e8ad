//! Structured document form of an MRS.
//!
//! This is the boundary the rest of the world talks to: an external grammar
//! front end produces it, strategies' outputs are written back to it. Field
//! names follow the usual MRS vocabulary (`pred`, `cfrom`, `cto`, `qeq`).
//!
//! ```json
//! { "ltop": "h1", "index": "e2",
//!   "eps": [ { "pred": "_like_v_1_rel", "label": "h8", "cfrom": 5, "cto": 10,
//!              "fvpairs": [ { "feature": "ARG0", "var": "e9", "extras": { "TENSE": "PRES" } } ] } ],
//!   "hcons": [ { "hi": "h2", "rel": "qeq", "lo": "h3" } ] }
//! ```

use crate::Span;
use crate::error::{MrsError, MrsResult};
use crate::fvpair::FvValue;
use crate::hcons::{HandleConstraint, HconsRelation};
use crate::mrs::{Mrs, SentenceType};
use crate::var::{Var, VarName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MrsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltop: Option<VarName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<VarName>,
    #[serde(default, skip_serializing_if = "SentenceType::is_declarative")]
    pub sentence_type: SentenceType,
    #[serde(default)]
    pub eps: Vec<EpDocument>,
    #[serde(default)]
    pub hcons: Vec<HconsDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpDocument {
    pub pred: String,
    #[serde(default)]
    pub label: Option<VarName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfrom: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cto: Option<usize>,
    #[serde(default)]
    pub fvpairs: Vec<FvPairDocument>,
}

/// Exactly one of `var` and `constant` must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FvPairDocument {
    pub feature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<VarName>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extras: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HconsDocument {
    pub hi: VarName,
    #[serde(default)]
    pub rel: HconsRelation,
    pub lo: VarName,
}

impl Mrs {
    /// Build an MRS from its document form and post-process it.
    ///
    /// Structural warnings end up in [`Mrs::diagnostics`]; only shape errors
    /// (missing label, malformed pair) fail here.
    pub fn from_document(doc: &MrsDocument) -> MrsResult<Mrs> {
        let mut mrs = Mrs::new();
        if let Some(ltop) = doc.ltop {
            mrs.set_ltop(ltop);
        }
        if let Some(index) = doc.index {
            mrs.set_index(index);
        }
        mrs.set_sentence_type(doc.sentence_type.clone());

        for ep in &doc.eps {
            let label = ep.label.ok_or_else(|| MrsError::MissingLabel { pred: ep.pred.clone() })?;
            let span = match (ep.cfrom, ep.cto) {
                (Some(from), Some(to)) => Some(Span::new(from, to)),
                _ => None,
            };
            let id = mrs.add_ep(&ep.pred, label, span);
            for pair in &ep.fvpairs {
                match (&pair.var, &pair.constant) {
                    (Some(name), None) => {
                        mrs.add_var_pair(id, &pair.feature, Var::with_extras(*name, pair.extras.clone()))?;
                    }
                    (None, Some(constant)) => mrs.add_constant_pair(id, &pair.feature, constant)?,
                    _ => return Err(MrsError::MalformedValue { feature: pair.feature.clone() }),
                }
            }
        }

        for h in &doc.hcons {
            mrs.add_hcons(HandleConstraint { hi: h.hi, lo: h.lo, relation: h.rel });
        }

        mrs.postprocess();
        Ok(mrs)
    }

    /// Walk EPs and constraints in order. Shared `x` slots repeat their
    /// extras at every occurrence.
    pub fn to_document(&self) -> MrsDocument {
        let eps = self
            .eps()
            .map(|ep| EpDocument {
                pred: ep.name().to_string(),
                label: Some(ep.label),
                cfrom: ep.span.map(|s| s.from),
                cto: ep.span.map(|s| s.to),
                fvpairs: ep
                    .fvpairs
                    .iter()
                    .map(|pair| match &pair.value {
                        FvValue::Var(r) => FvPairDocument {
                            feature: pair.feature.clone(),
                            var: Some(r.name),
                            extras: self.var(r.id).map(|v| v.extras.clone()).unwrap_or_default(),
                            constant: None,
                        },
                        FvValue::Constant(c) => FvPairDocument {
                            feature: pair.feature.clone(),
                            var: None,
                            extras: IndexMap::new(),
                            constant: Some(c.clone()),
                        },
                    })
                    .collect(),
            })
            .collect();

        MrsDocument {
            ltop: self.ltop(),
            index: self.index(),
            sentence_type: self.sentence_type().clone(),
            eps,
            hcons: self.hcons().iter().map(|h| HconsDocument { hi: h.hi, rel: h.relation, lo: h.lo }).collect(),
        }
    }
}
