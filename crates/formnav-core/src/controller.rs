//! Generic level controller.
//!
//! One [`LevelController`] exists per [`Kind`]. It owns the kind's
//! [`ItemStore`], keeps the navigation order (indices of included nodes in
//! ascending order) and enforces the at-most-one-current invariant. Per-kind
//! differences come from the [`LevelCapabilities`] record it is built with.

use std::collections::{BTreeMap, BTreeSet};

use formnav_model::{Direction, FormError, Kind, LevelState, Node, NodePatch, Result, Selector};
use tracing::{debug, warn};

use crate::capabilities::{LevelCapabilities, capabilities_for};
use crate::store::ItemStore;

#[derive(Debug, Clone)]
pub struct LevelController {
    caps: LevelCapabilities,
    store: ItemStore<Node>,
    navigation_order: Vec<usize>,
    mark_visited: bool,
}

impl LevelController {
    pub fn new(kind: Kind) -> Self {
        Self::with_capabilities(capabilities_for(kind))
    }

    pub fn with_capabilities(caps: LevelCapabilities) -> Self {
        Self {
            caps,
            store: ItemStore::new(),
            navigation_order: Vec::new(),
            mark_visited: true,
        }
    }

    /// Whether nodes are marked visited when they become current.
    #[must_use]
    pub fn with_mark_visited(mut self, enable: bool) -> Self {
        self.mark_visited = enable;
        self
    }

    pub fn kind(&self) -> Kind {
        self.caps.kind
    }

    pub fn capabilities(&self) -> &LevelCapabilities {
        &self.caps
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Takes ownership of already-discovered nodes and builds the
    /// navigation order. Any previous content is dropped.
    pub fn init(&mut self, nodes: Vec<Node>) {
        self.store.clear();
        for node in nodes {
            self.store.add(node);
        }
        self.build_navigation_order();
        debug!(
            kind = %self.kind(),
            total = self.store.len(),
            included = self.navigation_order.len(),
            "level initialised"
        );
    }

    pub fn destroy(&mut self) {
        self.store.clear();
        self.navigation_order.clear();
    }

    /// Rebuilds the navigation order from the inclusion flags.
    pub fn build_navigation_order(&mut self) {
        if !self.caps.builds_navigation_order {
            self.navigation_order.clear();
            return;
        }
        self.navigation_order = self.included_indices();
    }

    pub fn navigation_order(&self) -> &[usize] {
        &self.navigation_order
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn get_by_id(&self, id: &str) -> Option<&Node> {
        self.store.get_by_id(id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Node> {
        self.store.get_by_index(index)
    }

    pub fn get(&self, selector: &Selector) -> Option<&Node> {
        match selector {
            Selector::Id(id) => self.store.get_by_id(id),
            Selector::Index(index) => self.store.get_by_index(*index),
        }
    }

    fn require(&self, selector: &Selector) -> Result<&Node> {
        self.get(selector).ok_or_else(|| FormError::NodeNotFound {
            kind: self.kind(),
            selector: selector.to_string(),
        })
    }

    /// Snapshot copy of every node in discovery order.
    pub fn get_all(&self) -> Vec<Node> {
        self.store.get_all()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.store.iter()
    }

    pub fn get_current(&self) -> Option<&Node> {
        self.store.iter().find(|node| node.current)
    }

    pub fn get_total(&self) -> usize {
        self.store.len()
    }

    pub fn get_included_total(&self) -> usize {
        self.store.iter().filter(|node| node.is_included).count()
    }

    /// Nodes whose hierarchy links `parent_kind` to `parent_id`.
    pub fn get_all_by_parent_id(&self, parent_id: &str, parent_kind: Kind) -> Vec<&Node> {
        self.store
            .filter(|node| node.has_ancestor(parent_kind, parent_id))
    }

    fn included_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .store
            .iter()
            .filter(|node| node.is_included)
            .map(|node| node.index)
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Navigation order, or the included indices for kinds without one.
    fn ordered_candidates(&self) -> Vec<usize> {
        if self.caps.builds_navigation_order {
            self.navigation_order.clone()
        } else {
            self.included_indices()
        }
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    pub fn get_next_position(&self) -> Option<usize> {
        self.position(Direction::Next)
    }

    pub fn get_prev_position(&self) -> Option<usize> {
        self.position(Direction::Prev)
    }

    /// Moves one slot from the current node through the navigation order,
    /// restricted to the current node's siblings.
    ///
    /// Indices the store does not know are kept so the orchestrator can
    /// report the divergence instead of skipping over it.
    pub fn position(&self, direction: Direction) -> Option<usize> {
        let current = self.get_current()?;
        let siblings: Vec<usize> = self
            .navigation_order
            .iter()
            .copied()
            .filter(|&index| {
                self.store
                    .get_by_index(index)
                    .is_none_or(|node| node.is_sibling_of(current))
            })
            .collect();

        match siblings.iter().position(|&index| index == current.index) {
            Some(slot) => match direction {
                Direction::Next => siblings.get(slot + 1).copied(),
                Direction::Prev => slot.checked_sub(1).and_then(|prev| siblings.get(prev).copied()),
            },
            // The current node was excluded after it became current.
            None => match direction {
                Direction::Next => siblings.iter().copied().find(|&index| index > current.index),
                Direction::Prev => siblings
                    .iter()
                    .rev()
                    .copied()
                    .find(|&index| index < current.index),
            },
        }
    }

    /// Navigation-order positions of every included descendant of a parent.
    ///
    /// Only this level's inclusion flags are consulted; whether the nodes in
    /// between are included is the tree's concern.
    pub fn positions_by_parent(&self, parent_id: &str, parent_kind: Kind) -> Vec<usize> {
        self.ordered_candidates()
            .into_iter()
            .filter(|&index| {
                self.store
                    .get_by_index(index)
                    .is_some_and(|node| node.has_ancestor(parent_kind, parent_id))
            })
            .collect()
    }

    /// First position of the whole level.
    pub fn first_position(&self) -> Option<usize> {
        self.ordered_candidates().first().copied()
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn set_active(&mut self, selector: &Selector) -> Result<()> {
        let index = self.require(selector)?.index;
        if let Some(node) = self.store.get_by_index_mut(index) {
            node.active = true;
        }
        Ok(())
    }

    /// Makes one node current, clearing every other `current` flag first.
    ///
    /// An inactive target is activated with a warning.
    pub fn set_current(&mut self, selector: &Selector) -> Result<()> {
        let target = self.require(selector)?;
        let index = target.index;
        if !target.active {
            warn!(
                kind = %self.kind(),
                id = %target.id,
                "set_current on inactive node, activating it first"
            );
        }
        for node in self.store.iter_mut() {
            node.current = false;
        }
        let mark_visited = self.mark_visited;
        if let Some(node) = self.store.get_by_index_mut(index) {
            node.active = true;
            node.current = true;
            if mark_visited {
                node.visited = true;
            }
        }
        Ok(())
    }

    pub fn clear_active_and_current(&mut self) {
        for node in self.store.iter_mut() {
            node.active = false;
            node.current = false;
        }
    }

    /// Activates every included child of a parent. With `first_is_current`
    /// the first child in navigation order also becomes current.
    ///
    /// Returns how many nodes were activated.
    pub fn set_active_by_parent(
        &mut self,
        parent_id: &str,
        parent_kind: Kind,
        first_is_current: bool,
    ) -> Result<usize> {
        let children = self.positions_by_parent(parent_id, parent_kind);
        self.activate_all(&children);
        if first_is_current && let Some(&first) = children.first() {
            self.set_current(&Selector::Index(first))?;
        }
        debug!(
            kind = %self.kind(),
            parent_kind = %parent_kind,
            parent_id,
            activated = children.len(),
            "activated children"
        );
        Ok(children.len())
    }

    /// Marks the given indices active. Unknown indices are ignored.
    pub fn activate_all(&mut self, indices: &[usize]) {
        for &index in indices {
            if let Some(node) = self.store.get_by_index_mut(index) {
                node.active = true;
            }
        }
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Merges `patch` into a node through the kind's merge hook.
    ///
    /// `children` are the node's children from the next level down; the hook
    /// recomputes derived fields from them before the patch is applied.
    pub fn update_element_data(
        &mut self,
        selector: &Selector,
        patch: &NodePatch,
        children: &[Node],
    ) -> Result<Node> {
        let node = self.require(selector)?.clone();
        let merged = self.caps.merge(&node, children, patch);
        if merged.current {
            for other in self.store.iter_mut() {
                if other.index != merged.index {
                    other.current = false;
                }
            }
        }
        let inclusion_changed = merged.is_included != node.is_included;
        self.store.update(merged.clone());
        if inclusion_changed {
            self.build_navigation_order();
        }
        Ok(merged)
    }

    /// Toggles a node's inclusion and rebuilds the navigation order.
    ///
    /// Returns false when the flag already had that value.
    pub fn handle_inclusion(&mut self, id: &str, is_included: bool) -> Result<bool> {
        let index = self.require(&Selector::id(id))?.index;
        let Some(node) = self.store.get_by_index_mut(index) else {
            return Ok(false);
        };
        if node.is_included == is_included {
            return Ok(false);
        }
        node.is_included = is_included;
        self.build_navigation_order();
        debug!(kind = %self.kind(), id, is_included, "inclusion changed");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Derives the level's state. Never mutates the store.
    pub fn calculate_states(&self) -> LevelState {
        let current = self.get_current();
        let mut active_indices: Vec<usize> = self
            .store
            .iter()
            .filter(|node| node.active)
            .map(|node| node.index)
            .collect();
        active_indices.sort_unstable();

        let completed_ids: BTreeSet<String> = self
            .store
            .iter()
            .filter(|node| node.completed)
            .map(|node| node.id.clone())
            .collect();
        let visited_ids: BTreeSet<String> = self
            .store
            .iter()
            .filter(|node| node.visited)
            .map(|node| node.id.clone())
            .collect();
        let validity: BTreeMap<String, bool> = self
            .store
            .iter()
            .map(|node| (node.id.clone(), node.is_valid))
            .collect();

        let included: Vec<&Node> = self.store.iter().filter(|node| node.is_included).collect();
        let progress = if included.is_empty() {
            0.0
        } else {
            included.iter().map(|node| node.progress).sum::<f32>() / included.len() as f32
        };

        LevelState {
            kind: self.kind(),
            current_id: current.map(|node| node.id.clone()),
            current_index: current.map(|node| node.index),
            current_title: current.and_then(|node| node.title.clone()),
            active_indices,
            prev_index: self.get_prev_position(),
            next_index: self.get_next_position(),
            completed_ids,
            visited_ids,
            total: self.store.len(),
            total_included: included.len(),
            validity,
            progress,
        }
    }
}
