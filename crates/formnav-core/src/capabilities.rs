//! Per-kind strategy records for the generic level controller.
//!
//! Every kind shares one [`LevelController`](crate::controller::LevelController).
//! What differs between kinds is captured here as plain data plus function
//! pointers, looked up with [`capabilities_for`].

use formnav_model::{Kind, Node, NodePatch};

/// Merge hook: `(stored node, its children, caller patch) -> merged node`.
pub type MergeFn = fn(&Node, &[Node], &NodePatch) -> Node;

/// What a level controller needs to know about its kind.
#[derive(Clone, Copy)]
pub struct LevelCapabilities {
    pub kind: Kind,
    /// Inputs follow their Field and keep no navigation order.
    pub builds_navigation_order: bool,
    pub merge_element_data: MergeFn,
}

impl LevelCapabilities {
    pub fn merge(&self, node: &Node, children: &[Node], patch: &NodePatch) -> Node {
        (self.merge_element_data)(node, children, patch)
    }
}

impl std::fmt::Debug for LevelCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelCapabilities")
            .field("kind", &self.kind)
            .field("builds_navigation_order", &self.builds_navigation_order)
            .finish_non_exhaustive()
    }
}

pub fn capabilities_for(kind: Kind) -> LevelCapabilities {
    match kind {
        Kind::Input => LevelCapabilities {
            kind,
            builds_navigation_order: false,
            merge_element_data: merge_leaf,
        },
        Kind::Card | Kind::Set | Kind::Group | Kind::Field => LevelCapabilities {
            kind,
            builds_navigation_order: true,
            merge_element_data: merge_rollup,
        },
    }
}

/// Inputs own their derived fields. Completing an input without an explicit
/// progress moves its progress to 100 (or back to 0).
fn merge_leaf(node: &Node, _children: &[Node], patch: &NodePatch) -> Node {
    let mut merged = node.patched(patch);
    if patch.progress.is_none()
        && let Some(completed) = patch.completed
    {
        merged.progress = if completed { 100.0 } else { 0.0 };
    }
    merged
}

/// Recomputes `completed`, `is_valid` and `progress` from included children,
/// then lets the caller's explicit fields win.
fn merge_rollup(node: &Node, children: &[Node], patch: &NodePatch) -> Node {
    let mut merged = node.clone();
    let rollup = Rollup::from_children(children);
    merged.completed = rollup.completed;
    merged.is_valid = rollup.valid;
    merged.progress = rollup.progress;
    patch.apply_to(&mut merged);
    merged
}

/// Aggregate of a node's included children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollup {
    pub completed: bool,
    pub valid: bool,
    pub progress: f32,
}

impl Rollup {
    /// A node without included children counts as complete and valid.
    pub fn from_children(children: &[Node]) -> Self {
        let included: Vec<&Node> = children.iter().filter(|child| child.is_included).collect();
        if included.is_empty() {
            return Self {
                completed: true,
                valid: true,
                progress: 100.0,
            };
        }
        let total: f32 = included.iter().map(|child| child.progress).sum();
        Self {
            completed: included.iter().all(|child| child.completed),
            valid: included.iter().all(|child| child.is_valid),
            progress: total / included.len() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use formnav_model::ParentHierarchy;

    use super::*;

    fn input(id: &str, index: usize, completed: bool, valid: bool) -> Node {
        let mut node = Node::new(Kind::Input, id, index, ParentHierarchy::root("f"));
        node.completed = completed;
        node.is_valid = valid;
        node.progress = if completed { 100.0 } else { 0.0 };
        node
    }

    #[test]
    fn only_inputs_skip_navigation_order() {
        for kind in Kind::ALL {
            let caps = capabilities_for(kind);
            assert_eq!(caps.kind, kind);
            assert_eq!(caps.builds_navigation_order, kind != Kind::Input);
        }
    }

    #[test]
    fn rollup_ignores_excluded_children() {
        let children = vec![
            input("a", 0, true, true),
            input("b", 1, false, false).with_included(false),
        ];
        let rollup = Rollup::from_children(&children);
        assert!(rollup.completed);
        assert!(rollup.valid);
        assert_eq!(rollup.progress, 100.0);
    }

    #[test]
    fn rollup_averages_progress() {
        let children = vec![input("a", 0, true, true), input("b", 1, false, true)];
        let rollup = Rollup::from_children(&children);
        assert!(!rollup.completed);
        assert_eq!(rollup.progress, 50.0);
    }

    #[test]
    fn explicit_patch_wins_over_rollup() {
        let field = Node::new(Kind::Field, "f", 0, ParentHierarchy::root("f"));
        let children = vec![input("a", 0, false, true)];
        let caps = capabilities_for(Kind::Field);
        let merged = caps.merge(&field, &children, &NodePatch::new().active(true));
        assert!(merged.active);
        assert!(!merged.completed);
        let forced = caps.merge(&field, &children, &NodePatch::new().completed(true));
        assert!(forced.completed);
    }

    #[test]
    fn leaf_completion_drives_progress() {
        let node = input("a", 0, false, true);
        let caps = capabilities_for(Kind::Input);
        let merged = caps.merge(&node, &[], &NodePatch::new().completed(true));
        assert_eq!(merged.progress, 100.0);
    }
}
