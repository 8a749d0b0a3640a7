//! Ancestor-chain resolution.
//!
//! A node's [`ParentHierarchy`] is never computed by walking up the tree.
//! It is the nearest discovered ancestor's own record plus one link to that
//! ancestor, so the transitive closure holds by construction.

use formnav_model::{FormError, Kind, Node, ParentHierarchy, Result};
use tracing::warn;

/// Builds the record for a node whose nearest ancestor is `parent`.
///
/// With no parent the record only carries the form root.
pub fn build_from_parent(parent: Option<&Node>, form_id: &str) -> ParentHierarchy {
    match parent {
        None => ParentHierarchy::root(form_id),
        Some(parent) => {
            let base = if parent.parent_hierarchy.form_id().is_empty() {
                ParentHierarchy::root(form_id)
            } else {
                parent.parent_hierarchy.clone()
            };
            base.with_link(parent.kind, parent.id.clone(), parent.index)
        }
    }
}

/// Resolves `node`'s record through a lookup strategy supplied by discovery.
///
/// `lookup` returns the nearest discovered ancestor of the node, if any.
/// Cards have no ancestor; asking for one is reported and returned as
/// [`FormError::HierarchyOnCard`].
pub fn find_parent_hierarchy<'a, F>(node: &Node, form_id: &str, lookup: F) -> Result<ParentHierarchy>
where
    F: FnOnce(&Node) -> Option<&'a Node>,
{
    if node.kind == Kind::Card {
        warn!(card_id = %node.id, "hierarchy resolution called on a card");
        return Err(FormError::HierarchyOnCard {
            id: node.id.clone(),
        });
    }
    Ok(build_from_parent(lookup(node), form_id))
}
