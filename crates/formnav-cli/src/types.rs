use std::collections::BTreeMap;

use formnav_model::{Behavior, Direction, FormState, Kind};
use serde::Serialize;
use serde_json::Value;

/// One discovered node as listed by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub kind: Kind,
    pub index: usize,
    pub id: String,
    pub title: Option<String>,
    pub included: bool,
    /// Ancestor chain, coarsest first.
    pub hierarchy: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectResult {
    pub form_id: String,
    pub title: Option<String>,
    pub rows: Vec<NodeRow>,
}

impl InspectResult {
    pub fn count(&self, kind: Kind) -> usize {
        self.rows.iter().filter(|row| row.kind == kind).count()
    }
}

/// Outcome of one requested move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub step: usize,
    pub direction: Direction,
    /// Level that resolved the move, `None` at a boundary.
    pub level: Option<Kind>,
    pub card: Option<String>,
    pub set: Option<String>,
    pub group: Option<String>,
    pub field: Option<String>,
}

impl MoveRecord {
    pub fn moved(&self) -> bool {
        self.level.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct WalkResult {
    pub form_id: String,
    pub behavior: Behavior,
    pub moves: Vec<MoveRecord>,
    pub state: FormState,
    /// Flat entries as last written to the state sink.
    pub entries: BTreeMap<String, Value>,
}
