//! Variables and handles.
//!
//! Every value slot in an MRS is either a constant (`CARG: "Anna"`) or a typed
//! variable written `<sort><index>`, e.g. `x6`, `e2`, `h3`. Variables carry an
//! ordered bag of grammatical attributes (`PERS: 3`, `NUM: SG`, `SF: PROP`).
//!
//! ## Aliasing
//!
//! Variable *occurrences* point into a [`VarTable`] arena by [`VarId`]. After
//! coreference resolution every occurrence of the same `x` name points at the
//! same slot, so an attribute write through one occurrence is observed by all
//! of them. `e`, `h`, `i` and `u` occurrences keep a slot each.
//!
//! ```text
//!   _girl_n_1_rel  ARG0: x5 ─┐
//!   _the_q_rel     ARG0: x5 ─┼──► VarTable[3] { x5, PERS: 3, NUM: SG }
//!   _like_v_1_rel  ARG1: x5 ─┘
//! ```

use crate::error::{MrsError, MrsResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Sort and name ----------------------------------------------------------

/// Variable class, the single letter in front of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sort {
    /// `x`: an individual (usually introduced by a noun).
    Individual,
    /// `e`: an event (verbs, prepositions, adjectives).
    Event,
    /// `h`: a handle or scope label.
    Handle,
    /// `i`, `u` and any other letter the grammar emits.
    Underspecified(char),
}

impl Sort {
    pub fn from_char(c: char) -> Sort {
        match c {
            'x' => Sort::Individual,
            'e' => Sort::Event,
            'h' => Sort::Handle,
            other => Sort::Underspecified(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sort::Individual => 'x',
            Sort::Event => 'e',
            Sort::Handle => 'h',
            Sort::Underspecified(c) => c,
        }
    }

    /// Individuals and events are the sorts owned by a characteristic EP.
    pub fn is_characteristic(self) -> bool {
        matches!(self, Sort::Individual | Sort::Event)
    }
}

/// A variable label such as `x6`: sort plus integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VarName {
    pub sort: Sort,
    pub index: u32,
}

impl VarName {
    pub fn new(sort: Sort, index: u32) -> Self {
        VarName { sort, index }
    }

    pub fn handle(index: u32) -> Self {
        VarName { sort: Sort::Handle, index }
    }

    pub fn is_handle(&self) -> bool {
        self.sort == Sort::Handle
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sort.as_char(), self.index)
    }
}

impl FromStr for VarName {
    type Err = MrsError;

    fn from_str(s: &str) -> MrsResult<Self> {
        let caps = regex!(r"^([a-z])(\d+)$")
            .captures(s.trim())
            .ok_or_else(|| MrsError::InvalidVariable(s.to_string()))?;
        let sort = caps[1].chars().next().map(Sort::from_char).ok_or_else(|| MrsError::InvalidVariable(s.to_string()))?;
        let index = caps[2].parse::<u32>().map_err(|_| MrsError::InvalidVariable(s.to_string()))?;
        Ok(VarName { sort, index })
    }
}

impl TryFrom<String> for VarName {
    type Error = MrsError;

    fn try_from(value: String) -> MrsResult<Self> {
        value.parse()
    }
}

impl From<VarName> for String {
    fn from(value: VarName) -> Self {
        value.to_string()
    }
}

// --- Variables and the arena ------------------------------------------------

/// A variable with its extra attributes, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: VarName,
    pub extras: IndexMap<String, String>,
}

impl Var {
    pub fn new(name: VarName) -> Self {
        Var { name, extras: IndexMap::new() }
    }

    pub fn with_extras(name: VarName, extras: IndexMap<String, String>) -> Self {
        Var { name, extras }
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    pub fn set_extra(&mut self, key: &str, value: &str) {
        self.extras.insert(key.to_string(), value.to_string());
    }
}

/// Index of a [`Var`] slot inside a [`VarTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) u32);

/// One variable occurrence inside a feature/value pair.
///
/// `name` is authoritative for graph building; `id` selects the attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub name: VarName,
    pub id: VarId,
}

/// Arena of variable slots owned by one MRS.
///
/// Cloning the table deep-copies every slot, which is what makes an MRS clone
/// independent from its source.
#[derive(Debug, Clone, Default)]
pub struct VarTable {
    slots: Vec<Var>,
}

impl VarTable {
    pub fn new() -> Self {
        VarTable { slots: Vec::new() }
    }

    pub fn insert(&mut self, var: Var) -> VarRef {
        let id = VarId(self.slots.len() as u32);
        let name = var.name;
        self.slots.push(var);
        VarRef { name, id }
    }

    pub fn get(&self, id: VarId) -> Option<&Var> {
        self.slots.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: VarId) -> Option<&mut Var> {
        self.slots.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Var> {
        self.slots.iter_mut()
    }
}
