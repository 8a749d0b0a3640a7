//! The form facade tying discovery, navigation, state and events together.

use std::borrow::Cow;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use formnav_model::{
    Direction, FormOptions, FormState, Kind, Node, NodePatch, Result, Selector,
};
use tracing::{info, info_span};

use crate::aggregator::{batch_state_updates, collect_states};
use crate::discovery::{FormBlueprint, build_tree};
use crate::events::{EventBus, FormEvent, NavigationChange, Subscriber};
use crate::navigation::NavigationOrchestrator;
use crate::sink::{MemoryStateSink, StateSink};
use crate::tree::FormTree;

/// A multi-step form.
///
/// Subscribe before calling [`Form::init`] to observe the `Initialized`
/// event. Before `init` the tree is empty and every move is a no-op.
#[derive(Debug)]
pub struct Form<S: StateSink = MemoryStateSink> {
    options: FormOptions,
    navigator: NavigationOrchestrator,
    tree: FormTree,
    sink: S,
    bus: EventBus,
}

impl Form<MemoryStateSink> {
    pub fn new(options: FormOptions) -> Self {
        Self::with_sink(options, MemoryStateSink::new())
    }
}

impl<S: StateSink> Form<S> {
    pub fn with_sink(options: FormOptions, sink: S) -> Self {
        Self {
            navigator: NavigationOrchestrator::new(options.behavior),
            tree: FormTree::new(options.form_id.clone().unwrap_or_default()),
            options,
            sink,
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.bus.subscribe(subscriber);
    }

    /// Subscribes a channel and returns its receiving end.
    pub fn channel(&mut self) -> Receiver<FormEvent> {
        self.bus.channel()
    }

    /// Discovers the form, focuses the first included card and publishes
    /// the initial state.
    pub fn init(&mut self, blueprint: &FormBlueprint) -> Result<()> {
        let blueprint = match &self.options.form_id {
            Some(form_id) if *form_id != blueprint.form_id => {
                let mut owned = blueprint.clone();
                owned.form_id = form_id.clone();
                Cow::Owned(owned)
            }
            _ => Cow::Borrowed(blueprint),
        };
        let span = info_span!("init", form_id = %blueprint.form_id, behavior = %self.options.behavior);
        let _guard = span.enter();

        let mut tree = build_tree(&blueprint)?.with_mark_visited(self.options.mark_visited);
        tree.refresh_rollups()?;
        self.navigator.start(&mut tree)?;
        self.tree = tree;

        if self.options.publish_initial_state {
            batch_state_updates(&self.tree, &mut self.sink);
        }
        self.bus.publish(&FormEvent::Initialized {
            form_id: self.tree.form_id().to_string(),
        });
        info!(nodes = self.tree.len(), "form initialised");
        Ok(())
    }

    /// Moves one step. `Ok(None)` at the first or last position.
    pub fn handle_move(&mut self, direction: Direction) -> Result<Option<NavigationChange>> {
        self.navigator
            .handle_move(&mut self.tree, &mut self.sink, &self.bus, direction)
    }

    pub fn next(&mut self) -> Result<Option<NavigationChange>> {
        self.handle_move(Direction::Next)
    }

    pub fn prev(&mut self) -> Result<Option<NavigationChange>> {
        self.handle_move(Direction::Prev)
    }

    pub fn go_to(&mut self, kind: Kind, selector: impl Into<Selector>) -> Result<NavigationChange> {
        self.navigator.go_to(
            &mut self.tree,
            &mut self.sink,
            &self.bus,
            kind,
            &selector.into(),
        )
    }

    /// Includes or excludes one node.
    ///
    /// Positions shift immediately; the current node stays put even if it
    /// was just excluded. Returns false when nothing changed.
    pub fn handle_inclusion(&mut self, kind: Kind, id: &str, included: bool) -> Result<bool> {
        let changed = self.tree.handle_inclusion(kind, id, included)?;
        if changed {
            batch_state_updates(&self.tree, &mut self.sink);
            self.bus.publish(&FormEvent::InclusionChanged {
                kind,
                id: id.to_string(),
                included,
            });
        }
        Ok(changed)
    }

    /// Applies host data (completion, validity, progress) to an Input.
    pub fn update_input(&mut self, id: &str, patch: &NodePatch) -> Result<Node> {
        let input = self.tree.update_input(id, patch)?;
        batch_state_updates(&self.tree, &mut self.sink);
        self.bus.publish(&FormEvent::InputUpdated {
            id: input.id.clone(),
            completed: input.completed,
            valid: input.is_valid,
        });
        Ok(input)
    }

    /// Freshly computed state of every level.
    pub fn state(&self) -> FormState {
        collect_states(&self.tree)
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Drops every node and subscriber.
    pub fn destroy(&mut self) {
        self.tree.destroy();
        self.bus.clear();
        info!(form_id = self.tree.form_id(), "form destroyed");
    }
}
