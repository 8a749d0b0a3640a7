//! The owned aggregate holding one controller per kind.
//!
//! Nodes are only ever referenced by kind plus id or index, never by
//! long-lived reference, so dropping the tree tears everything down at once.

use formnav_model::{Direction, FormError, Kind, LevelState, Node, NodePatch, Result, Selector};
use tracing::debug;

use crate::controller::LevelController;

#[derive(Debug, Clone)]
pub struct FormTree {
    form_id: String,
    cards: LevelController,
    sets: LevelController,
    groups: LevelController,
    fields: LevelController,
    inputs: LevelController,
}

impl FormTree {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            cards: LevelController::new(Kind::Card),
            sets: LevelController::new(Kind::Set),
            groups: LevelController::new(Kind::Group),
            fields: LevelController::new(Kind::Field),
            inputs: LevelController::new(Kind::Input),
        }
    }

    #[must_use]
    pub fn with_mark_visited(mut self, enable: bool) -> Self {
        for kind in Kind::ALL {
            let controller = std::mem::replace(self.controller_mut(kind), LevelController::new(kind));
            *self.controller_mut(kind) = controller.with_mark_visited(enable);
        }
        self
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn controller(&self, kind: Kind) -> &LevelController {
        match kind {
            Kind::Card => &self.cards,
            Kind::Set => &self.sets,
            Kind::Group => &self.groups,
            Kind::Field => &self.fields,
            Kind::Input => &self.inputs,
        }
    }

    pub fn controller_mut(&mut self, kind: Kind) -> &mut LevelController {
        match kind {
            Kind::Card => &mut self.cards,
            Kind::Set => &mut self.sets,
            Kind::Group => &mut self.groups,
            Kind::Field => &mut self.fields,
            Kind::Input => &mut self.inputs,
        }
    }

    pub fn controllers(&self) -> [&LevelController; 5] {
        [
            &self.cards,
            &self.sets,
            &self.groups,
            &self.fields,
            &self.inputs,
        ]
    }

    pub fn node(&self, kind: Kind, selector: &Selector) -> Option<&Node> {
        self.controller(kind).get(selector)
    }

    /// Total node count across every kind.
    pub fn len(&self) -> usize {
        self.controllers().iter().map(|c| c.get_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn destroy(&mut self) {
        for kind in Kind::ALL {
            self.controller_mut(kind).destroy();
        }
    }

    // ------------------------------------------------------------------
    // Rollups
    // ------------------------------------------------------------------

    /// Immediate children of a node, across every finer kind.
    pub fn children_of(&self, node: &Node) -> Vec<Node> {
        node.kind
            .finer()
            .flat_map(|kind| self.controller(kind).iter())
            .filter(|child| {
                child
                    .parent_hierarchy
                    .nearest()
                    .is_some_and(|(kind, link)| kind == node.kind && link.id == node.id)
            })
            .cloned()
            .collect()
    }

    /// Merges a patch into a node, recomputing derived fields from its
    /// children first.
    pub fn update_element_data(
        &mut self,
        kind: Kind,
        selector: &Selector,
        patch: &NodePatch,
    ) -> Result<Node> {
        let node = self
            .controller(kind)
            .get(selector)
            .cloned()
            .ok_or_else(|| FormError::NodeNotFound {
                kind,
                selector: selector.to_string(),
            })?;
        let children = self.children_of(&node);
        self.controller_mut(kind)
            .update_element_data(selector, patch, &children)
    }

    /// Recomputes every non-leaf node, finest level first.
    pub fn refresh_rollups(&mut self) -> Result<()> {
        for kind in [Kind::Field, Kind::Group, Kind::Set, Kind::Card] {
            let indices: Vec<usize> = self.controller(kind).iter().map(|n| n.index).collect();
            for index in indices {
                self.update_element_data(kind, &Selector::Index(index), &NodePatch::default())?;
            }
        }
        Ok(())
    }

    /// Recomputes a node's ancestors, nearest first.
    pub fn refresh_ancestors(&mut self, node: &Node) -> Result<()> {
        let ancestors: Vec<(Kind, usize)> = node
            .parent_hierarchy
            .links()
            .map(|(kind, link)| (kind, link.index))
            .collect();
        for (kind, index) in ancestors.into_iter().rev() {
            self.update_element_data(kind, &Selector::Index(index), &NodePatch::default())?;
        }
        Ok(())
    }

    /// Applies caller data to an Input and rolls it up the chain.
    pub fn update_input(&mut self, id: &str, patch: &NodePatch) -> Result<Node> {
        let updated = self
            .inputs
            .update_element_data(&Selector::id(id), patch, &[])?;
        self.refresh_ancestors(&updated)?;
        debug!(input_id = id, completed = updated.completed, "input updated");
        Ok(updated)
    }

    /// Toggles inclusion of one node and refreshes what depends on it.
    pub fn handle_inclusion(&mut self, kind: Kind, id: &str, is_included: bool) -> Result<bool> {
        let changed = self.controller_mut(kind).handle_inclusion(id, is_included)?;
        if changed && let Some(node) = self.controller(kind).get_by_id(id).cloned() {
            self.refresh_ancestors(&node)?;
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Reachability
    // ------------------------------------------------------------------

    /// The coarsest node on the chain from the card down to `node` that is
    /// excluded. Ancestors missing from the store count as excluded.
    pub fn excluded_on_chain(&self, node: &Node) -> Option<(Kind, String)> {
        node.parent_hierarchy
            .links()
            .find(|(kind, link)| {
                self.controller(*kind)
                    .get_by_index(link.index)
                    .is_none_or(|ancestor| !ancestor.is_included)
            })
            .map(|(kind, link)| (kind, link.id.clone()))
            .or_else(|| (!node.is_included).then(|| (node.kind, node.id.clone())))
    }

    /// Whether every ancestor of `node` is included.
    pub fn ancestors_included(&self, node: &Node) -> bool {
        node.parent_hierarchy.links().all(|(kind, link)| {
            self.controller(kind)
                .get_by_index(link.index)
                .is_some_and(|ancestor| ancestor.is_included)
        })
    }

    /// Whether navigation may land on `node`: it and its whole ancestor chain
    /// are included.
    pub fn is_reachable(&self, node: &Node) -> bool {
        node.is_included && self.ancestors_included(node)
    }

    /// Navigation-order positions of the reachable descendants of a parent.
    pub fn reachable_children(
        &self,
        kind: Kind,
        parent_kind: Kind,
        parent_id: &str,
    ) -> Vec<usize> {
        let controller = self.controller(kind);
        controller
            .positions_by_parent(parent_id, parent_kind)
            .into_iter()
            .filter(|&index| {
                controller
                    .get_by_index(index)
                    .is_some_and(|node| self.ancestors_included(node))
            })
            .collect()
    }

    /// The next or previous sibling position at `kind`.
    ///
    /// A current node whose ancestor was excluded has no position, so the
    /// move falls back to a coarser level and leaves the hidden context.
    pub fn position(&self, kind: Kind, direction: Direction) -> Option<usize> {
        let controller = self.controller(kind);
        if !self.ancestors_included(controller.get_current()?) {
            return None;
        }
        controller.position(direction)
    }

    /// A level's state, with positions computed like [`FormTree::position`].
    pub fn calculate_states(&self, kind: Kind) -> LevelState {
        let mut state = self.controller(kind).calculate_states();
        let blocked = self
            .controller(kind)
            .get_current()
            .is_some_and(|node| !self.ancestors_included(node));
        if blocked {
            state.prev_index = None;
            state.next_index = None;
        }
        state
    }

    // ------------------------------------------------------------------
    // Activation pipeline
    // ------------------------------------------------------------------

    /// Checks that a node and every ancestor in its record are stored.
    pub fn verify_chain(&self, node: &Node) -> Result<()> {
        for (kind, link) in node.parent_hierarchy.links() {
            if self.controller(kind).get_by_index(link.index).is_none() {
                return Err(FormError::MissingAncestor {
                    kind: node.kind,
                    id: node.id.clone(),
                    ancestor_kind: kind,
                    ancestor_id: link.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Clears active/current at `kind` and every finer kind.
    pub fn clear_down(&mut self, kind: Kind) {
        for level in std::iter::once(kind).chain(kind.finer()) {
            self.controller_mut(level).clear_active_and_current();
        }
    }

    /// Makes the target node active and current.
    pub fn activate_target(&mut self, kind: Kind, index: usize) -> Result<()> {
        let selector = Selector::Index(index);
        let controller = self.controller_mut(kind);
        controller.set_active(&selector)?;
        controller.set_current(&selector)
    }

    /// Focuses the first child of each freshly focused level below `kind`,
    /// then re-derives the inputs.
    ///
    /// Levels at or above `display_level` show one node at a time, so only
    /// the first child is activated there. Below it the whole subtree of the
    /// displayed node is activated and the first child of the nearest current
    /// ancestor becomes current. Nodes under an excluded ancestor are never
    /// picked.
    pub fn propagate_down(&mut self, kind: Kind, display_level: Kind) -> Result<()> {
        for child in kind.finer().filter(|k| k.is_navigable()) {
            let Some(parent) = child.parent() else {
                continue;
            };
            let Some((anchor_kind, anchor_id)) = self.finest_current(kind, parent) else {
                continue;
            };
            let first = self
                .reachable_children(child, anchor_kind, &anchor_id)
                .first()
                .copied();

            if child > display_level {
                let (root_kind, root_id) = if kind <= display_level {
                    self.finest_current(kind, display_level)
                        .unwrap_or_else(|| (anchor_kind, anchor_id.clone()))
                } else {
                    (anchor_kind, anchor_id)
                };
                let subtree = self.reachable_children(child, root_kind, &root_id);
                self.controller_mut(child).activate_all(&subtree);
            }
            if let Some(first) = first {
                self.activate_target(child, first)?;
            }
        }
        self.sync_inputs()
    }

    /// The finest current node among the kinds `from..=to`.
    fn finest_current(&self, from: Kind, to: Kind) -> Option<(Kind, String)> {
        Kind::ALL
            .into_iter()
            .rev()
            .filter(|k| (from..=to).contains(k))
            .find_map(|k| {
                self.controller(k)
                    .get_current()
                    .map(|node| (k, node.id.clone()))
            })
    }

    /// Makes every ancestor of `node` active and current.
    pub fn propagate_up(&mut self, node: &Node) -> Result<()> {
        let ancestors: Vec<(Kind, usize)> = node
            .parent_hierarchy
            .links()
            .map(|(kind, link)| (kind, link.index))
            .collect();
        for (kind, index) in ancestors {
            self.controller_mut(kind).set_current(&Selector::Index(index))?;
        }
        Ok(())
    }

    /// Inputs follow their fields: inputs of active fields are active and
    /// the first included input of the current field is current.
    pub fn sync_inputs(&mut self) -> Result<()> {
        self.inputs.clear_active_and_current();
        let active_fields: Vec<(String, bool)> = self
            .fields
            .iter()
            .filter(|field| field.active)
            .map(|field| (field.id.clone(), field.current))
            .collect();
        for (field_id, is_current) in active_fields {
            self.inputs
                .set_active_by_parent(&field_id, Kind::Field, is_current)?;
        }
        Ok(())
    }
}
