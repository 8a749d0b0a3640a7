use formnav_core::{BlueprintNode, Form, FormBlueprint, FormEvent, TOPIC_NAVIGATION_CHANGED};
use formnav_model::{Behavior, Direction, FormError, FormOptions, Kind, Selector};

fn card(id: &str, children: Vec<BlueprintNode>) -> BlueprintNode {
    BlueprintNode::new(Kind::Card, id).with_children(children)
}

fn set(id: &str, children: Vec<BlueprintNode>) -> BlueprintNode {
    BlueprintNode::new(Kind::Set, id).with_children(children)
}

fn group(id: &str, children: Vec<BlueprintNode>) -> BlueprintNode {
    BlueprintNode::new(Kind::Group, id).with_children(children)
}

fn field(id: &str) -> BlueprintNode {
    BlueprintNode::new(Kind::Field, id).with_children(vec![BlueprintNode::new(
        Kind::Input,
        format!("{id}-input"),
    )])
}

/// Two cards, each holding one set of two fields.
fn two_cards() -> FormBlueprint {
    FormBlueprint::new(
        "form",
        vec![
            card("c0", vec![set("s0", vec![field("f0"), field("f1")])]),
            card("c1", vec![set("s1", vec![field("f2"), field("f3")])]),
        ],
    )
}

fn init_form(behavior: Behavior, blueprint: &FormBlueprint) -> Form {
    let mut form = Form::new(FormOptions::new(behavior));
    form.init(blueprint).unwrap();
    form
}

fn current(form: &Form, kind: Kind) -> Option<String> {
    form.state().level(kind).current_id.clone()
}

#[test]
fn field_moves_cascade_across_cards() {
    let mut form = init_form(Behavior::ByField, &two_cards());
    let events = form.channel();

    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Field);
    assert!(!change.context_changed);
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f1"));

    // f1 is the last field of its set and s0 the only set of c0.
    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Card);
    assert_eq!(change.finest_changed, Kind::Field);
    assert!(change.context_changed);
    assert_eq!(current(&form, Kind::Card).as_deref(), Some("c1"));
    assert_eq!(current(&form, Kind::Set).as_deref(), Some("s1"));
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f2"));
    assert_eq!(current(&form, Kind::Input).as_deref(), Some("f2-input"));

    form.next().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f3"));

    let writes = form.sink().writes();
    assert!(form.next().unwrap().is_none());
    assert_eq!(form.sink().writes(), writes);

    let topics: Vec<&str> = events.try_iter().map(|e| e.topic()).collect();
    assert_eq!(topics, vec![TOPIC_NAVIGATION_CHANGED; 3]);
}

#[test]
fn prev_mirrors_next() {
    let mut form = init_form(Behavior::ByField, &two_cards());
    assert!(form.prev().unwrap().is_none());

    form.next().unwrap();
    form.next().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f2"));

    let change = form.prev().unwrap().unwrap();
    assert_eq!(change.level, Kind::Card);
    assert_eq!(change.direction, Some(Direction::Prev));
    assert_eq!(current(&form, Kind::Card).as_deref(), Some("c0"));
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f0"));
}

#[test]
fn excluded_fields_are_skipped() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![card("c0", vec![field("a"), field("b"), field("c")])],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    assert!(form.handle_inclusion(Kind::Field, "b", false).unwrap());

    form.next().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("c"));
    form.prev().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("a"));
}

#[test]
fn excluding_the_current_field_keeps_it_current() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![card("c0", vec![field("a"), field("b"), field("c")])],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    form.next().unwrap();
    form.handle_inclusion(Kind::Field, "b", false).unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("b"));

    form.next().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("c"));
}

#[test]
fn fields_inside_an_excluded_set_stay_hidden() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![
            card("c0", vec![set("s0", vec![field("a")])]),
            card("c1", vec![set("s1", vec![field("b")])]),
        ],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    assert!(form.handle_inclusion(Kind::Set, "s1", false).unwrap());

    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Card);
    let state = form.state();
    assert_eq!(state.card.current_id.as_deref(), Some("c1"));
    assert_eq!(state.set.current_id, None);
    assert_eq!(state.field.current_id, None);
    assert!(state.field.active_indices.is_empty());
    assert_eq!(state.input.current_id, None);
    assert!(!state.field.visited_ids.contains("b"));

    let err = form.go_to(Kind::Field, "b").unwrap_err();
    assert!(matches!(
        &err,
        FormError::NodeExcluded { kind: Kind::Set, id } if id == "s1"
    ));

    assert!(form.next().unwrap().is_none());
    form.prev().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("a"));
}

#[test]
fn excluding_the_current_set_moves_to_the_next_set() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![card(
            "c0",
            vec![set("s0", vec![field("a"), field("b")]), set("s1", vec![field("c")])],
        )],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    form.handle_inclusion(Kind::Set, "s0", false).unwrap();
    assert_eq!(current(&form, Kind::Set).as_deref(), Some("s0"));
    assert_eq!(form.state().field.next_index, None);

    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Set);
    assert_eq!(change.target_id, "s1");
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("c"));
    assert!(!form.state().field.visited_ids.contains("b"));

    // s0 is gone from the navigation order, so there is nothing before s1.
    assert!(form.prev().unwrap().is_none());
}

#[test]
fn excluded_cards_are_skipped() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![
            card("c0", vec![field("f0")]),
            card("c1", vec![field("f1")]),
            card("c2", vec![field("f2")]),
        ],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    form.handle_inclusion(Kind::Card, "c1", false).unwrap();

    form.next().unwrap();
    assert_eq!(current(&form, Kind::Card).as_deref(), Some("c2"));
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f2"));

    let err = form.go_to(Kind::Field, "f1").unwrap_err();
    assert!(matches!(
        &err,
        FormError::NodeExcluded { kind: Kind::Card, id } if id == "c1"
    ));

    form.prev().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f0"));
}

#[test]
fn sets_mixing_groups_and_fields_are_rejected() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![
            card(
                "c0",
                vec![set(
                    "s0",
                    vec![group("g0", vec![field("a"), field("b")]), field("loose")],
                )],
            ),
            card("c1", vec![field("z")]),
        ],
    );
    let mut form = Form::new(FormOptions::new(Behavior::ByField));
    let err = form.init(&blueprint).unwrap_err();
    assert!(matches!(
        &err,
        FormError::MixedChildren { parent_kind: Kind::Set, other_id, .. } if other_id == "loose"
    ));
}

#[test]
fn by_card_moves_between_cards_without_sets() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![
            card("c0", vec![field("a"), field("b")]),
            card("c1", vec![field("c"), field("d")]),
        ],
    );
    let mut form = init_form(Behavior::ByCard, &blueprint);
    assert_eq!(form.state().field.active_indices, vec![0, 1]);

    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Card);
    assert_eq!(change.target_id, "c1");

    let state = form.state();
    assert_eq!(state.field.current_id.as_deref(), Some("c"));
    assert_eq!(state.field.active_indices, vec![2, 3]);
    assert_eq!(state.input.active_indices, vec![2, 3]);
    assert_eq!(state.input.current_id.as_deref(), Some("c-input"));
}

#[test]
fn by_group_activates_the_whole_group() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![card(
            "c0",
            vec![set(
                "s0",
                vec![
                    group("g0", vec![field("a"), field("b")]),
                    group("g1", vec![field("c"), field("d")]),
                ],
            )],
        )],
    );
    let mut form = init_form(Behavior::ByGroup, &blueprint);
    assert_eq!(form.state().field.active_indices, vec![0, 1]);

    let change = form.next().unwrap().unwrap();
    assert_eq!(change.level, Kind::Group);
    let state = form.state();
    assert_eq!(state.group.current_id.as_deref(), Some("g1"));
    assert_eq!(state.group.active_indices, vec![1]);
    assert_eq!(state.field.active_indices, vec![2, 3]);
    assert_eq!(state.field.current_id.as_deref(), Some("c"));

    assert!(form.next().unwrap().is_none());
}

#[test]
fn go_to_switches_context() {
    let blueprint = FormBlueprint::new(
        "form",
        vec![
            card("c0", vec![set("s0", vec![group("g0", vec![field("a")])])]),
            card("c1", vec![set("s1", vec![field("b"), field("c")])]),
        ],
    );
    let mut form = init_form(Behavior::ByField, &blueprint);
    assert_eq!(current(&form, Kind::Group).as_deref(), Some("g0"));

    let change = form.go_to(Kind::Field, "c").unwrap();
    assert_eq!(change.direction, None);
    let state = form.state();
    assert_eq!(state.card.current_id.as_deref(), Some("c1"));
    assert_eq!(state.card.active_indices, vec![1]);
    assert_eq!(state.set.current_id.as_deref(), Some("s1"));
    assert_eq!(state.group.current_id, None);
    assert_eq!(state.field.current_id.as_deref(), Some("c"));
    assert_eq!(state.field.active_indices, vec![2]);

    form.prev().unwrap();
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("b"));
}

#[test]
fn go_to_unknown_node_is_an_error() {
    let mut form = init_form(Behavior::ByField, &two_cards());
    let err = form.go_to(Kind::Set, Selector::Index(7)).unwrap_err();
    assert!(matches!(err, FormError::NodeNotFound { kind: Kind::Set, .. }));
    assert_eq!(current(&form, Kind::Field).as_deref(), Some("f0"));
}

#[test]
fn navigation_event_names_the_resolving_level() {
    let mut form = init_form(Behavior::BySet, &two_cards());
    let events = form.channel();
    form.next().unwrap();
    match events.try_recv().unwrap() {
        FormEvent::NavigationChanged(change) => {
            assert_eq!(change.level, Kind::Card);
            assert_eq!(change.behavior, Behavior::BySet);
            assert_eq!(change.target_index, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn visited_follows_the_option() {
    let mut form = Form::new(FormOptions::new(Behavior::ByField).with_mark_visited(false));
    form.init(&two_cards()).unwrap();
    form.next().unwrap();
    assert!(form.state().field.visited_ids.is_empty());

    let mut form = init_form(Behavior::ByField, &two_cards());
    form.next().unwrap();
    let state = form.state();
    assert!(state.field.visited_ids.contains("f0"));
    assert!(state.field.visited_ids.contains("f1"));
}
