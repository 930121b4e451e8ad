//! Dependency-MRS edges and the per-MRS dependency graph.
//!
//! An edge is stored on both endpoints. Seen from the governor it points
//! `Dep`-wards at the dependent; seen from the dependent it points `Gov`-wards
//! at the governor. Pre- and post-slash tags are identical on both sides:
//!
//! ```text
//!   _like_v_1_rel ──ARG1/NEQ──► _girl_n_1_rel
//!     edges[like] = [ ARG1/NEQ Dep -> girl ]
//!     edges[girl] = [ ARG1/NEQ Gov -> like ]
//! ```
//!
//! An argument that cannot be filled gets a one-sided `ARG<n>/NULL` edge with
//! no target and a `Dangling` direction.

use crate::ep::EpId;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreSlash {
    Arg(u8),
    Rstr,
    /// Non-ARG features keep their raw name (`L-HNDL`, `R-INDEX`, ...).
    Feature(String),
}

impl PreSlash {
    pub fn from_feature(feature: &str) -> PreSlash {
        if feature == "RSTR" {
            return PreSlash::Rstr;
        }
        match feature.strip_prefix("ARG").and_then(|n| n.parse().ok()) {
            Some(n) => PreSlash::Arg(n),
            None => PreSlash::Feature(feature.to_string()),
        }
    }

    pub fn is_arg(&self) -> bool {
        matches!(self, PreSlash::Arg(_))
    }
}

impl fmt::Display for PreSlash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreSlash::Arg(n) => write!(f, "ARG{n}"),
            PreSlash::Rstr => f.write_str("RSTR"),
            PreSlash::Feature(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostSlash {
    /// Both EPs carry the same label.
    Eq,
    /// Variable link across different labels.
    Neq,
    /// An argument handle that is directly another EP's label.
    Heq,
    /// A handle linked to a label through a qeq constraint.
    H,
    /// Argument present but unfillable.
    Null,
}

impl fmt::Display for PostSlash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostSlash::Eq => "EQ",
            PostSlash::Neq => "NEQ",
            PostSlash::Heq => "HEQ",
            PostSlash::H => "H",
            PostSlash::Null => "NULL",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The other EP governs this one.
    Gov,
    /// The other EP is governed by this one.
    Dep,
    Dangling,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Gov => "GOV",
            Direction::Dep => "DEP",
            Direction::Dangling => "NULL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DmrsEdge {
    pub other: Option<EpId>,
    pub pre: PreSlash,
    pub post: PostSlash,
    pub direction: Direction,
}

impl DmrsEdge {
    /// `ARG<n>/EQ` in either direction.
    pub fn is_arg_eq(&self) -> bool {
        self.pre.is_arg() && self.post == PostSlash::Eq
    }

    /// `ARG<n>/NULL`: an unfillable argument.
    pub fn is_empty_arg(&self) -> bool {
        self.pre.is_arg() && self.post == PostSlash::Null
    }
}

impl fmt::Display for DmrsEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.pre, self.post, self.direction)?;
        if let Some(other) = self.other {
            write!(f, " {other}")?;
        }
        Ok(())
    }
}

// --- Graph ------------------------------------------------------------------

/// Derived dependency edges for one MRS. Rebuilt from scratch by
/// post-processing; never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: IndexMap<EpId, Vec<DmrsEdge>>,
    equal_labels: Vec<BTreeSet<EpId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, id: EpId) {
        self.edges.entry(id).or_default();
    }

    pub(crate) fn add_pair(&mut self, governor: EpId, dependent: EpId, pre: PreSlash, post: PostSlash) {
        self.edges.entry(governor).or_default().push(DmrsEdge {
            other: Some(dependent),
            pre: pre.clone(),
            post,
            direction: Direction::Dep,
        });
        let back = DmrsEdge { other: Some(governor), pre, post, direction: Direction::Gov };
        self.edges.entry(dependent).or_default().push(back);
    }

    pub(crate) fn add_dangling(&mut self, ep: EpId, pre: PreSlash) {
        let edge = DmrsEdge { other: None, pre, post: PostSlash::Null, direction: Direction::Dangling };
        self.edges.entry(ep).or_default().push(edge);
    }

    pub(crate) fn add_equal_label_clique(&mut self, clique: BTreeSet<EpId>) {
        if !self.equal_labels.contains(&clique) {
            self.equal_labels.push(clique);
        }
    }

    pub fn edges(&self, id: EpId) -> &[DmrsEdge] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (EpId, &[DmrsEdge])> {
        self.edges.iter().map(|(id, edges)| (*id, edges.as_slice()))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_isolated(&self, id: EpId) -> bool {
        self.edges(id).is_empty()
    }

    /// The rare same-label clique `id` belongs to.
    pub fn equal_label_set(&self, id: EpId) -> Option<&BTreeSet<EpId>> {
        self.equal_labels.iter().find(|set| set.contains(&id))
    }

    pub fn equal_label_cliques(&self) -> &[BTreeSet<EpId>] {
        &self.equal_labels
    }

    // --- Filtered views ---------------------------------------------------------

    fn neighbours(&self, id: EpId, direction: Direction, by_arg: bool) -> BTreeSet<EpId> {
        self.edges(id)
            .iter()
            .filter(|e| e.direction == direction && e.pre.is_arg() == by_arg)
            .filter_map(|e| e.other)
            .collect()
    }

    pub fn governors_by_arg(&self, id: EpId) -> BTreeSet<EpId> {
        self.neighbours(id, Direction::Gov, true)
    }

    pub fn governors_by_non_arg(&self, id: EpId) -> BTreeSet<EpId> {
        self.neighbours(id, Direction::Gov, false)
    }

    pub fn dependents_by_arg(&self, id: EpId) -> BTreeSet<EpId> {
        self.neighbours(id, Direction::Dep, true)
    }

    pub fn dependents_by_non_arg(&self, id: EpId) -> BTreeSet<EpId> {
        self.neighbours(id, Direction::Dep, false)
    }

    /// Every governor, dependent and equal-label partner of `id`.
    pub fn all_connections(&self, id: EpId) -> BTreeSet<EpId> {
        let mut out: BTreeSet<EpId> = self.edges(id).iter().filter_map(|e| e.other).collect();
        if let Some(set) = self.equal_label_set(id) {
            out.extend(set.iter().copied().filter(|other| *other != id));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_slash_from_feature_names() {
        assert_eq!(PreSlash::from_feature("ARG2"), PreSlash::Arg(2));
        assert_eq!(PreSlash::from_feature("RSTR"), PreSlash::Rstr);
        assert_eq!(PreSlash::from_feature("L-HNDL"), PreSlash::Feature("L-HNDL".into()));
        assert_eq!(PreSlash::Arg(1).to_string(), "ARG1");
    }

    #[test]
    fn pairs_are_recorded_on_both_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.add_pair(EpId(0), EpId(1), PreSlash::Arg(1), PostSlash::Neq);

        let gov = &graph.edges(EpId(0))[0];
        assert_eq!((gov.other, gov.direction), (Some(EpId(1)), Direction::Dep));
        let dep = &graph.edges(EpId(1))[0];
        assert_eq!((dep.other, dep.direction), (Some(EpId(0)), Direction::Gov));
        assert_eq!(dep.pre, gov.pre);
        assert_eq!(dep.post, gov.post);
        assert_eq!(gov.to_string(), "ARG1/NEQ DEP #1");
    }

    #[test]
    fn filtered_views_split_arg_and_non_arg_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_pair(EpId(0), EpId(1), PreSlash::Rstr, PostSlash::H);
        graph.add_pair(EpId(2), EpId(1), PreSlash::Arg(1), PostSlash::Eq);
        graph.add_dangling(EpId(2), PreSlash::Arg(2));

        assert_eq!(graph.governors_by_non_arg(EpId(1)), BTreeSet::from([EpId(0)]));
        assert_eq!(graph.governors_by_arg(EpId(1)), BTreeSet::from([EpId(2)]));
        assert_eq!(graph.dependents_by_arg(EpId(2)), BTreeSet::from([EpId(1)]));
        assert_eq!(graph.all_connections(EpId(1)), BTreeSet::from([EpId(0), EpId(2)]));
        assert!(graph.edges(EpId(2))[1].is_empty_arg());
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn registered_eps_without_edges_are_isolated() {
        let mut graph = DependencyGraph::new();
        graph.register(EpId(7));
        assert!(graph.is_isolated(EpId(7)));
        assert!(graph.is_isolated(EpId(8)));
    }
}
