//! Key/value state sink the aggregator writes through.

use std::collections::BTreeMap;

use formnav_model::FormState;
use serde_json::Value;

/// Receives one complete state record per change.
pub trait StateSink {
    /// Writes every entry in one operation.
    fn write_batch(&mut self, state: &FormState, entries: BTreeMap<String, Value>);
}

/// In-memory sink keeping the latest record.
#[derive(Debug, Default, Clone)]
pub struct MemoryStateSink {
    entries: BTreeMap<String, Value>,
    last: Option<FormState>,
    writes: usize,
}

impl MemoryStateSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }

    pub fn last_state(&self) -> Option<&FormState> {
        self.last.as_ref()
    }

    /// Number of batches written so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last = None;
    }
}

impl StateSink for MemoryStateSink {
    fn write_batch(&mut self, state: &FormState, entries: BTreeMap<String, Value>) {
        self.entries = entries;
        self.last = Some(state.clone());
        self.writes += 1;
    }
}
