//! Tests for formnav-model types.

use formnav_model::{
    Behavior, FormError, FormOptions, FormState, Kind, LevelState, Node, NodePatch,
    ParentHierarchy, Selector,
};

#[test]
fn node_roundtrips_through_json() {
    let hierarchy = ParentHierarchy::root("signup")
        .with_link(Kind::Card, "account", 0)
        .with_link(Kind::Set, "credentials", 0);
    let node = Node::new(Kind::Field, "password", 4, hierarchy).with_title("Password");
    let json = serde_json::to_string(&node).expect("serialize node");
    let round: Node = serde_json::from_str(&json).expect("deserialize node");
    assert_eq!(round, node);
    assert_eq!(round.parent_hierarchy.id_of(Kind::Set), Some("credentials"));
}

#[test]
fn options_deserialize_with_defaults() {
    let options: FormOptions =
        serde_json::from_str(r#"{"behavior":"bySet"}"#).expect("deserialize options");
    assert_eq!(options.behavior, Behavior::BySet);
    assert!(options.mark_visited);
    assert!(options.form_id.is_none());
}

#[test]
fn unknown_behavior_in_options_is_rejected() {
    let result: Result<FormOptions, _> = serde_json::from_str(r#"{"behavior":"byPage"}"#);
    assert!(result.is_err());
}

#[test]
fn selector_matches_by_id_or_index() {
    let node = Node::new(Kind::Group, "address", 2, ParentHierarchy::root("f"));
    assert!(Selector::from("address").matches(&node));
    assert!(Selector::from(2).matches(&node));
    assert!(!Selector::from(1).matches(&node));
}

#[test]
fn empty_patch_changes_nothing() {
    let node = Node::new(Kind::Input, "zip", 0, ParentHierarchy::root("f"));
    let patch = NodePatch::default();
    assert!(patch.is_empty());
    assert_eq!(node.patched(&patch), node);
}

#[test]
fn level_state_validity_requires_every_node() {
    let mut state = LevelState::empty(Kind::Group);
    state.validity.insert("a".to_string(), true);
    assert!(state.is_valid());
    state.validity.insert("b".to_string(), false);
    assert!(!state.is_valid());
}

#[test]
fn form_state_level_lookup() {
    let state = FormState::default();
    for kind in Kind::ALL {
        assert_eq!(state.level(kind).kind, kind);
    }
}

#[test]
fn data_consistency_classification() {
    assert!(FormError::HierarchyOnCard { id: "c".into() }.is_data_consistency());
    assert!(
        FormError::NavigationOutOfSync {
            kind: Kind::Field,
            index: 9
        }
        .is_data_consistency()
    );
    assert!(!FormError::MissingRoot.is_data_consistency());
}
