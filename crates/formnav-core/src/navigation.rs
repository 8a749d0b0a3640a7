//! Navigation orchestration across the five levels.
//!
//! A move is resolved at the behavior's level first. When that level has no
//! position in the requested direction the move falls back to the next
//! coarser level (field, group, set, card). Once a target is found the tree
//! goes through one activation pipeline:
//!
//! 1. validate the target and its ancestor chain
//! 2. clear active/current at the target level and below
//! 3. activate the target
//! 4. focus the first children downward
//! 5. mark the ancestors current upward
//!
//! after which rollups are refreshed, the state is written in a single batch
//! and exactly one `navigation:changed` event is published. Validation
//! happens before any flag is touched, so a failed move leaves the tree as it
//! was.

use formnav_model::{Behavior, Direction, FormError, Kind, Result, Selector};
use tracing::{debug, info_span};

use crate::aggregator::batch_state_updates;
use crate::events::{EventBus, FormEvent, NavigationChange};
use crate::sink::StateSink;
use crate::tree::FormTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationOrchestrator {
    behavior: Behavior,
}

impl NavigationOrchestrator {
    pub fn new(behavior: Behavior) -> Self {
        Self { behavior }
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Finds the level and index a move resolves to, walking coarser on
    /// boundaries. `None` means every level is at its boundary.
    pub fn resolve(&self, tree: &FormTree, direction: Direction) -> Option<(Kind, usize)> {
        let mut level = Some(self.behavior.kind());
        while let Some(kind) = level {
            if let Some(index) = tree.position(kind, direction) {
                return Some((kind, index));
            }
            debug!(level = %kind, %direction, "boundary reached, falling back");
            level = kind.parent();
        }
        None
    }

    /// Moves one step in `direction`.
    ///
    /// Returns `Ok(None)` without writing state or publishing anything when
    /// the form is already at its first or last position.
    pub fn handle_move(
        &self,
        tree: &mut FormTree,
        sink: &mut dyn StateSink,
        bus: &EventBus,
        direction: Direction,
    ) -> Result<Option<NavigationChange>> {
        let span = info_span!("move", behavior = %self.behavior, %direction);
        let _guard = span.enter();

        let Some((level, index)) = self.resolve(tree, direction) else {
            debug!("no position at any level");
            return Ok(None);
        };
        let change = self.focus(tree, level, index, Some(direction))?;
        tree.refresh_rollups()?;
        batch_state_updates(tree, sink);
        bus.publish(&FormEvent::NavigationChanged(change.clone()));
        Ok(Some(change))
    }

    /// Jumps directly to a reachable node of a navigable kind.
    ///
    /// A target that is excluded, or sits under an excluded ancestor, fails
    /// with [`FormError::NodeExcluded`] naming the coarsest excluded node.
    pub fn go_to(
        &self,
        tree: &mut FormTree,
        sink: &mut dyn StateSink,
        bus: &EventBus,
        kind: Kind,
        selector: &Selector,
    ) -> Result<NavigationChange> {
        let span = info_span!("go_to", behavior = %self.behavior, level = %kind, target = %selector);
        let _guard = span.enter();

        if !kind.is_navigable() {
            return Err(FormError::NotNavigable(kind));
        }
        let target = tree
            .node(kind, selector)
            .ok_or_else(|| FormError::NodeNotFound {
                kind,
                selector: selector.to_string(),
            })?;
        tree.verify_chain(target)?;
        if let Some((excluded_kind, id)) = tree.excluded_on_chain(target) {
            return Err(FormError::NodeExcluded {
                kind: excluded_kind,
                id,
            });
        }
        let index = target.index;
        let change = self.focus(tree, kind, index, None)?;
        tree.refresh_rollups()?;
        batch_state_updates(tree, sink);
        bus.publish(&FormEvent::NavigationChanged(change.clone()));
        Ok(change)
    }

    /// Focuses the first included card. Used on initialisation.
    ///
    /// Returns `Ok(None)` when every card is excluded.
    pub fn start(&self, tree: &mut FormTree) -> Result<Option<NavigationChange>> {
        let Some(index) = tree.controller(Kind::Card).first_position() else {
            debug!("no included card to focus");
            return Ok(None);
        };
        self.focus(tree, Kind::Card, index, None).map(Some)
    }

    /// Runs the activation pipeline for one target without publishing.
    pub fn focus(
        &self,
        tree: &mut FormTree,
        level: Kind,
        index: usize,
        direction: Option<Direction>,
    ) -> Result<NavigationChange> {
        let target = tree
            .controller(level)
            .get_by_index(index)
            .cloned()
            .ok_or(FormError::NavigationOutOfSync { kind: level, index })?;
        tree.verify_chain(&target)?;
        let display_level = self.behavior.kind();
        let before = current_indices(tree);

        // A jump into another context focuses the new ancestors first, so
        // levels the target does not link to are reset as well.
        for (kind, link) in target.parent_hierarchy.links() {
            let is_current = tree
                .controller(kind)
                .get_by_index(link.index)
                .is_some_and(|node| node.current);
            if !is_current {
                tree.clear_down(kind);
                tree.activate_target(kind, link.index)?;
                tree.propagate_down(kind, display_level)?;
            }
        }

        tree.clear_down(level);
        tree.activate_target(level, index)?;
        tree.propagate_down(level, display_level)?;
        tree.propagate_up(&target)?;

        let after = current_indices(tree);
        let finest_changed = Kind::ALL
            .into_iter()
            .zip(before.iter().zip(&after))
            .filter(|(kind, (old, new))| kind.is_navigable() && old != new)
            .map(|(kind, _)| kind)
            .last()
            .unwrap_or(level);

        debug!(level = %level, %finest_changed, id = %target.id, index, "focused");
        Ok(NavigationChange {
            level,
            finest_changed,
            behavior: self.behavior,
            direction,
            target_id: target.id,
            target_index: index,
            context_changed: level <= Kind::Set,
        })
    }
}

/// Current node index of every level, coarsest first.
fn current_indices(tree: &FormTree) -> [Option<usize>; 5] {
    Kind::ALL.map(|kind| tree.controller(kind).get_current().map(|node| node.index))
}
