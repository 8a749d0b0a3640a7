//! Form nodes and partial updates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hierarchy::ParentHierarchy;
use crate::kind::Kind;

/// One discovered instance of a [`Kind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: Kind,
    /// Unique within its kind.
    pub id: String,
    /// Position within its kind's discovery order; stable for the session.
    pub index: usize,
    pub title: Option<String>,
    /// Part of the currently displayed subtree.
    pub active: bool,
    /// The single focused node of its kind.
    pub current: bool,
    pub visited: bool,
    pub completed: bool,
    /// 0-100 rollup of included children.
    pub progress: f32,
    /// Kept in navigation order by the condition evaluator.
    pub is_included: bool,
    pub is_valid: bool,
    pub parent_hierarchy: ParentHierarchy,
}

impl Node {
    /// A freshly discovered node: included, valid, nothing visited yet.
    pub fn new(
        kind: Kind,
        id: impl Into<String>,
        index: usize,
        parent_hierarchy: ParentHierarchy,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            index,
            title: None,
            active: false,
            current: false,
            visited: false,
            completed: false,
            progress: 0.0,
            is_included: true,
            is_valid: true,
            parent_hierarchy,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_included(mut self, is_included: bool) -> Self {
        self.is_included = is_included;
        self
    }

    /// True when `parent_kind`'s link in this node's hierarchy is `parent_id`.
    pub fn has_ancestor(&self, parent_kind: Kind, parent_id: &str) -> bool {
        self.parent_hierarchy.id_of(parent_kind) == Some(parent_id)
    }

    /// True when both nodes hang off the same immediate ancestor.
    ///
    /// Cards have no ancestor and are all siblings of each other.
    pub fn is_sibling_of(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.parent_hierarchy.nearest() == other.parent_hierarchy.nearest()
    }

    /// Returns a copy with every field set in `patch` applied.
    #[must_use]
    pub fn patched(&self, patch: &NodePatch) -> Node {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next
    }
}

/// Partial update of a [`Node`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub title: Option<String>,
    pub active: Option<bool>,
    pub current: Option<bool>,
    pub visited: Option<bool>,
    pub completed: Option<bool>,
    pub progress: Option<f32>,
    pub is_included: Option<bool>,
    pub is_valid: Option<bool>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(mut self, value: bool) -> Self {
        self.active = Some(value);
        self
    }

    #[must_use]
    pub fn current(mut self, value: bool) -> Self {
        self.current = Some(value);
        self
    }

    #[must_use]
    pub fn visited(mut self, value: bool) -> Self {
        self.visited = Some(value);
        self
    }

    #[must_use]
    pub fn completed(mut self, value: bool) -> Self {
        self.completed = Some(value);
        self
    }

    #[must_use]
    pub fn progress(mut self, value: f32) -> Self {
        self.progress = Some(value.clamp(0.0, 100.0));
        self
    }

    #[must_use]
    pub fn included(mut self, value: bool) -> Self {
        self.is_included = Some(value);
        self
    }

    #[must_use]
    pub fn valid(mut self, value: bool) -> Self {
        self.is_valid = Some(value);
        self
    }

    #[must_use]
    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, node: &mut Node) {
        if let Some(title) = &self.title {
            node.title = Some(title.clone());
        }
        if let Some(active) = self.active {
            node.active = active;
        }
        if let Some(current) = self.current {
            node.current = current;
        }
        if let Some(visited) = self.visited {
            node.visited = visited;
        }
        if let Some(completed) = self.completed {
            node.completed = completed;
        }
        if let Some(progress) = self.progress {
            node.progress = progress;
        }
        if let Some(is_included) = self.is_included {
            node.is_included = is_included;
        }
        if let Some(is_valid) = self.is_valid {
            node.is_valid = is_valid;
        }
    }
}

/// Addresses a node within one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Id(String),
    Index(usize),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Id(id) => node.id == *id,
            Self::Index(index) => node.index == *index,
        }
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Selector {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Selector {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id '{id}'"),
            Self::Index(index) => write!(f, "index {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_set_fields() {
        let node = Node::new(Kind::Field, "email", 3, ParentHierarchy::root("f"));
        let patched = node.patched(&NodePatch::new().active(true).completed(true));
        assert!(patched.active);
        assert!(patched.completed);
        assert!(!patched.current);
        assert!(patched.is_included);
        assert_eq!(patched.index, 3);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(NodePatch::new().progress(140.0).progress, Some(100.0));
        assert_eq!(NodePatch::new().progress(-3.0).progress, Some(0.0));
    }

    #[test]
    fn cards_are_siblings() {
        let a = Node::new(Kind::Card, "a", 0, ParentHierarchy::root("f"));
        let b = Node::new(Kind::Card, "b", 1, ParentHierarchy::root("f"));
        assert!(a.is_sibling_of(&b));
    }
}
