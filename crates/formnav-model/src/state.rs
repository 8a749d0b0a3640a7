//! Derived per-level and whole-form state records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::Kind;

/// Snapshot computed from one level controller's nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub kind: Kind,
    pub current_id: Option<String>,
    pub current_index: Option<usize>,
    pub current_title: Option<String>,
    pub active_indices: Vec<usize>,
    pub prev_index: Option<usize>,
    pub next_index: Option<usize>,
    pub completed_ids: BTreeSet<String>,
    pub visited_ids: BTreeSet<String>,
    pub total: usize,
    pub total_included: usize,
    pub validity: BTreeMap<String, bool>,
    /// Mean progress of included nodes.
    pub progress: f32,
}

impl LevelState {
    /// State of a level with no nodes.
    pub fn empty(kind: Kind) -> Self {
        Self {
            kind,
            current_id: None,
            current_index: None,
            current_title: None,
            active_indices: Vec::new(),
            prev_index: None,
            next_index: None,
            completed_ids: BTreeSet::new(),
            visited_ids: BTreeSet::new(),
            total: 0,
            total_included: 0,
            validity: BTreeMap::new(),
            progress: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity.values().all(|valid| *valid)
    }

    /// Flat `{kind}_{field}` entries for key/value state sinks.
    pub fn to_entries(&self) -> BTreeMap<String, Value> {
        let prefix = self.kind.as_str();
        let mut entries = BTreeMap::new();
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                if key == "kind" {
                    continue;
                }
                entries.insert(format!("{prefix}_{key}"), value);
            }
        }
        entries
    }
}

/// All five level states, gathered for one batched write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub card: LevelState,
    pub set: LevelState,
    pub group: LevelState,
    pub field: LevelState,
    pub input: LevelState,
}

impl FormState {
    pub fn level(&self, kind: Kind) -> &LevelState {
        match kind {
            Kind::Card => &self.card,
            Kind::Set => &self.set,
            Kind::Group => &self.group,
            Kind::Field => &self.field,
            Kind::Input => &self.input,
        }
    }

    pub fn levels(&self) -> [&LevelState; 5] {
        [&self.card, &self.set, &self.group, &self.field, &self.input]
    }

    /// One flat record merging every level's entries.
    pub fn to_entries(&self) -> BTreeMap<String, Value> {
        let mut entries = BTreeMap::new();
        for level in self.levels() {
            entries.extend(level.to_entries());
        }
        entries
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            card: LevelState::empty(Kind::Card),
            set: LevelState::empty(Kind::Set),
            group: LevelState::empty(Kind::Group),
            field: LevelState::empty(Kind::Field),
            input: LevelState::empty(Kind::Input),
        }
    }
}
