//! Batched state publication.
//!
//! Every level's state is computed first and the merged record is written
//! through a single sink call, so no observer sees some levels updated and
//! others not.

use formnav_model::{FormState, Kind};
use tracing::trace;

use crate::sink::StateSink;
use crate::tree::FormTree;

/// Collects the state of all five levels.
pub fn collect_states(tree: &FormTree) -> FormState {
    FormState {
        card: tree.calculate_states(Kind::Card),
        set: tree.calculate_states(Kind::Set),
        group: tree.calculate_states(Kind::Group),
        field: tree.calculate_states(Kind::Field),
        input: tree.calculate_states(Kind::Input),
    }
}

/// Collects every level's state and writes it through `sink` once.
pub fn batch_state_updates(tree: &FormTree, sink: &mut dyn StateSink) -> FormState {
    let state = collect_states(tree);
    let entries = state.to_entries();
    trace!(entries = entries.len(), "writing batched state");
    sink.write_batch(&state, entries);
    state
}
