use formnav_core::{BlueprintNode, Form, FormBlueprint, collect_states};
use formnav_model::{Behavior, Direction, FormError, FormOptions, Kind, Node, Selector};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Move(Direction),
    Toggle(Kind, usize),
    GoTo(Kind, usize),
}

fn node(kind: Kind, id: &str, children: Vec<BlueprintNode>) -> BlueprintNode {
    BlueprintNode::new(kind, id).with_children(children)
}

fn field(id: &str) -> BlueprintNode {
    node(Kind::Field, id, vec![BlueprintNode::new(Kind::Input, format!("{id}-in"))])
}

/// Mixed shapes: groups inside sets, fields directly in sets and cards.
fn blueprint() -> FormBlueprint {
    FormBlueprint::new(
        "props",
        vec![
            node(
                Kind::Card,
                "c0",
                vec![node(
                    Kind::Set,
                    "s0",
                    vec![
                        node(Kind::Group, "g0", vec![field("f0"), field("f1")]),
                        node(Kind::Group, "g1", vec![field("f2")]),
                    ],
                )],
            ),
            node(
                Kind::Card,
                "c1",
                vec![
                    node(Kind::Set, "s1", vec![field("f3"), field("f4")]),
                    node(Kind::Set, "s2", vec![node(Kind::Group, "g2", vec![field("f5")])]),
                ],
            ),
            node(Kind::Card, "c2", vec![field("f6"), field("f7")]),
        ],
    )
}

fn totals(kind: Kind) -> usize {
    match kind {
        Kind::Card => 3,
        Kind::Set => 3,
        Kind::Group => 3,
        Kind::Field | Kind::Input => 8,
    }
}

fn navigable_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Card),
        Just(Kind::Set),
        Just(Kind::Group),
        Just(Kind::Field),
    ]
}

fn behavior() -> impl Strategy<Value = Behavior> {
    prop_oneof![
        Just(Behavior::ByField),
        Just(Behavior::ByGroup),
        Just(Behavior::BySet),
        Just(Behavior::ByCard),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop_oneof![Just(Direction::Next), Just(Direction::Prev)].prop_map(Op::Move),
        1 => (navigable_kind(), 0usize..8).prop_map(|(k, i)| Op::Toggle(k, i % totals(k))),
        1 => (navigable_kind(), 0usize..8).prop_map(|(k, i)| Op::GoTo(k, i % totals(k))),
    ]
}

fn apply(form: &mut Form, op: &Op) -> Result<(), FormError> {
    match op {
        Op::Move(direction) => form.handle_move(*direction).map(|_| ()),
        Op::Toggle(kind, index) => {
            let node = form
                .tree()
                .node(*kind, &Selector::Index(*index))
                .cloned()
                .expect("index in range");
            form.handle_inclusion(*kind, &node.id, !node.is_included)
                .map(|_| ())
        }
        Op::GoTo(kind, index) => match form.go_to(*kind, *index) {
            Ok(_) | Err(FormError::NodeExcluded { .. }) => Ok(()),
            Err(err) => Err(err),
        },
    }
}

fn nodes(form: &Form, kind: Kind) -> Vec<Node> {
    form.tree().controller(kind).get_all()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_under_random_operations(
        behavior in behavior(),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut form = Form::new(FormOptions::new(behavior));
        form.init(&blueprint()).unwrap();

        for op in &ops {
            prop_assert!(apply(&mut form, op).is_ok(), "{op:?} failed");

            for kind in Kind::ALL {
                let level = nodes(&form, kind);

                let current = level.iter().filter(|n| n.current).count();
                prop_assert!(current <= 1, "{kind} has {current} current nodes");

                if kind.is_navigable() {
                    let mut included: Vec<usize> = level
                        .iter()
                        .filter(|n| n.is_included)
                        .map(|n| n.index)
                        .collect();
                    included.sort_unstable();
                    prop_assert_eq!(form.tree().controller(kind).navigation_order(), &included[..]);
                }

                for child in &level {
                    let Some((parent_kind, link)) = child.parent_hierarchy.nearest() else {
                        prop_assert_eq!(kind, Kind::Card);
                        continue;
                    };
                    let parent = form
                        .tree()
                        .node(parent_kind, &Selector::Index(link.index))
                        .expect("parent is stored");
                    prop_assert_eq!(&parent.id, &link.id);
                    prop_assert!(child.parent_hierarchy.is_superset_of(&parent.parent_hierarchy));
                    prop_assert!(child.parent_hierarchy.len() > parent.parent_hierarchy.len());

                    if child.current {
                        prop_assert!(parent.current, "{} current under {}", child.id, parent.id);
                    }
                }
            }

            prop_assert_eq!(collect_states(form.tree()), collect_states(form.tree()));
        }
    }

    #[test]
    fn moves_never_land_on_hidden_nodes(
        behavior in behavior(),
        excluded in prop::collection::vec(
            (navigable_kind(), 0usize..8).prop_map(|(k, i)| (k, i % totals(k))),
            0..4,
        ),
        moves in prop::collection::vec(
            prop_oneof![Just(Direction::Next), Just(Direction::Prev)],
            1..20,
        ),
    ) {
        let mut form = Form::new(FormOptions::new(behavior));
        form.init(&blueprint()).unwrap();
        for (kind, index) in &excluded {
            let id = form
                .tree()
                .node(*kind, &Selector::Index(*index))
                .map(|node| node.id.clone())
                .unwrap();
            form.handle_inclusion(*kind, &id, false).unwrap();
        }

        for direction in moves {
            if let Some(change) = form.handle_move(direction).unwrap() {
                let target = form
                    .tree()
                    .node(change.level, &Selector::Index(change.target_index))
                    .unwrap();
                prop_assert!(form.tree().is_reachable(target), "{} is hidden", target.id);
                prop_assert!(change.level <= behavior.kind());
                prop_assert!(change.finest_changed >= change.level);

                for kind in Kind::ALL.into_iter().filter(|k| *k > change.level) {
                    if let Some(node) = form.tree().controller(kind).get_current() {
                        prop_assert!(form.tree().is_reachable(node), "{} is hidden", node.id);
                    }
                }
            }
        }
    }
}
