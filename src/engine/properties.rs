use crate::Span;
use crate::dmrs::Direction;
use crate::engine::ClosurePolicy;
use crate::ep::EpId;
use crate::hcons::HandleConstraint;
use crate::mrs::Mrs;
use crate::var::{Sort, Var, VarName};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone)]
struct VerbShape {
    /// Index of the noun whose label the verb shares.
    shares_label: Option<usize>,
    arg1: usize,
    arg2: Option<usize>,
}

#[derive(Debug, Clone)]
struct Shape {
    entities: usize,
    verbs: Vec<VerbShape>,
}

fn shape() -> impl Strategy<Value = Shape> {
    (1usize..5).prop_flat_map(|entities| {
        let verb = (proptest::option::of(0..entities), 0..entities, proptest::option::of(0..entities))
            .prop_map(|(shares_label, arg1, arg2)| VerbShape { shares_label, arg1, arg2 });
        prop::collection::vec(verb, 1..4).prop_map(move |verbs| Shape { entities, verbs })
    })
}

fn x(i: usize) -> VarName {
    VarName::new(Sort::Individual, 10 + i as u32)
}

fn h(i: u32) -> VarName {
    VarName::handle(i)
}

/// Quantified nouns `x10..` followed by verbs over them.
fn build(shape: &Shape) -> Mrs {
    let mut mrs = Mrs::new();
    mrs.set_ltop(h(1));
    let mut at = 0;
    let mut span = || {
        at += 2;
        Some(Span::new(at - 2, at - 1))
    };

    for i in 0..shape.entities {
        let n = i as u32;
        let quantifier = mrs.add_ep("_the_q_rel", h(100 + n), span());
        mrs.add_var_pair(quantifier, "ARG0", Var::new(x(i))).unwrap();
        mrs.add_var_pair(quantifier, "RSTR", Var::new(h(200 + n))).unwrap();
        mrs.add_var_pair(quantifier, "BODY", Var::new(h(250 + n))).unwrap();
        let noun = mrs.add_ep(&format!("_n{i}_n_1_rel"), h(300 + n), span());
        mrs.add_var_pair(noun, "ARG0", Var::new(x(i))).unwrap();
        mrs.add_hcons(HandleConstraint::qeq(h(200 + n), h(300 + n)));
    }

    for (j, verb) in shape.verbs.iter().enumerate() {
        let j = j as u32;
        let label = verb.shares_label.map_or(h(400 + j), |i| h(300 + i as u32));
        let id = mrs.add_ep(&format!("_v{j}_v_1_rel"), label, span());
        let event = VarName::new(Sort::Event, 500 + j);
        mrs.add_var_pair(id, "ARG0", Var::new(event)).unwrap();
        mrs.add_var_pair(id, "ARG1", Var::new(x(verb.arg1))).unwrap();
        if let Some(arg2) = verb.arg2 {
            mrs.add_var_pair(id, "ARG2", Var::new(x(arg2))).unwrap();
        }
        if j == 0 {
            mrs.set_index(event);
        }
    }

    mrs.postprocess();
    mrs
}

proptest! {
    #[test]
    fn every_x_name_has_one_slot(shape in shape()) {
        let mrs = build(&shape);
        for i in 0..shape.entities {
            let slots: HashSet<_> = mrs.occurrences(x(i)).into_iter().map(|r| r.id).collect();
            prop_assert_eq!(slots.len(), 1);
        }
        prop_assert!(mrs.diagnostics().unresolved.is_empty());
    }

    #[test]
    fn nouns_own_their_variables(shape in shape()) {
        let mrs = build(&shape);
        for i in 0..shape.entities {
            prop_assert_eq!(mrs.characteristic_ep(x(i)), Some(EpId(2 * i as u32 + 1)));
        }
    }

    #[test]
    fn every_edge_has_a_mirror(shape in shape()) {
        let mrs = build(&shape);
        for (id, edges) in mrs.graph().iter() {
            for edge in edges {
                let mirror = match edge.direction {
                    Direction::Dep => Direction::Gov,
                    Direction::Gov => Direction::Dep,
                    Direction::Dangling => continue,
                };
                let Some(other) = edge.other else {
                    continue;
                };
                let found = mrs.edges(other).iter().any(|back| {
                    back.other == Some(id) && back.direction == mirror && back.pre == edge.pre && back.post == edge.post
                });
                prop_assert!(found, "no mirror for {:?} on {}", edge, id);
            }
        }
    }

    #[test]
    fn removal_leaves_only_anchored_constraints(shape in shape(), mask in prop::collection::vec(any::<bool>(), 16)) {
        let mut mrs = build(&shape);
        let doomed: Vec<EpId> =
            mrs.ep_ids().into_iter().enumerate().filter(|(i, _)| mask[*i]).map(|(_, id)| id).collect();
        mrs.remove_eps(&doomed).unwrap();

        let values: HashSet<VarName> = mrs.eps().flat_map(|ep| ep.values()).collect();
        let labels: HashSet<VarName> = mrs.eps().map(|ep| ep.label).collect();
        for constraint in mrs.hcons() {
            prop_assert!(values.contains(&constraint.hi) && labels.contains(&constraint.lo));
        }
        prop_assert_eq!(mrs.clean_hcons(), 0);
    }

    #[test]
    fn closure_contains_its_seeds_and_is_stable(shape in shape(), picks in prop::collection::vec(0usize..16, 1..4)) {
        let mut mrs = build(&shape);
        let ids = mrs.ep_ids();
        let seeds: BTreeSet<EpId> = picks.iter().map(|p| ids[p % ids.len()]).collect();

        let kept = mrs.decompose(&seeds, &BTreeSet::new(), ClosurePolicy::default());
        prop_assert!(kept.is_superset(&seeds));
        let again = mrs.decompose(&kept, &BTreeSet::new(), ClosurePolicy::default());
        prop_assert_eq!(again, kept);
    }
}
