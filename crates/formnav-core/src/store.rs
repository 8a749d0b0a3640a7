//! Ordered, id-indexed storage for the nodes of one kind.
//!
//! The store never removes single entries; nodes live for the whole session
//! and only [`ItemStore::clear`] wipes them.

use std::collections::HashMap;

use formnav_model::{Node, NodePatch};

/// Something an [`ItemStore`] can hold.
pub trait StoreItem: Clone {
    type Patch;

    fn id(&self) -> &str;
    fn index(&self) -> usize;
    /// `{...self, ...patch}`.
    fn patched(&self, patch: &Self::Patch) -> Self;
}

impl StoreItem for Node {
    type Patch = NodePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn index(&self) -> usize {
        self.index
    }

    fn patched(&self, patch: &NodePatch) -> Self {
        Node::patched(self, patch)
    }
}

/// Ordered collection plus id and index lookups.
#[derive(Debug, Clone)]
pub struct ItemStore<T: StoreItem> {
    items: Vec<T>,
    by_id: HashMap<String, usize>,
    by_index: HashMap<usize, usize>,
}

impl<T: StoreItem> Default for ItemStore<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_id: HashMap::new(),
            by_index: HashMap::new(),
        }
    }
}

impl<T: StoreItem> ItemStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item and indexes it by id and index.
    ///
    /// A later item with the same id or index shadows the earlier one in the
    /// lookups; discovery rejects duplicates before they get here.
    pub fn add(&mut self, item: T) {
        let position = self.items.len();
        self.by_id.insert(item.id().to_string(), position);
        self.by_index.insert(item.index(), position);
        self.items.push(item);
    }

    /// Replaces the stored item with the same index. Returns false when no
    /// such item exists.
    pub fn update(&mut self, item: T) -> bool {
        let Some(&position) = self.by_index.get(&item.index()) else {
            return false;
        };
        let old_id = self.items[position].id().to_string();
        if old_id != item.id() {
            self.by_id.remove(&old_id);
            self.by_id.insert(item.id().to_string(), position);
        }
        self.items[position] = item;
        true
    }

    /// `update(item.patched(patch))`, returning the merged item.
    pub fn merge(&mut self, item: &T, patch: &T::Patch) -> Option<T> {
        let merged = item.patched(patch);
        if self.update(merged.clone()) {
            Some(merged)
        } else {
            None
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(|&position| &self.items[position])
    }

    pub fn get_by_index(&self, index: usize) -> Option<&T> {
        self.by_index.get(&index).map(|&position| &self.items[position])
    }

    pub fn get_by_index_mut(&mut self, index: usize) -> Option<&mut T> {
        let position = *self.by_index.get(&index)?;
        self.items.get_mut(position)
    }

    /// Snapshot copy of every item in insertion order.
    pub fn get_all(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.by_id.clear();
        self.by_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use formnav_model::{Kind, ParentHierarchy};

    use super::*;

    fn field(id: &str, index: usize) -> Node {
        Node::new(Kind::Field, id, index, ParentHierarchy::root("form"))
    }

    #[test]
    fn add_indexes_by_id_and_index() {
        let mut store = ItemStore::new();
        store.add(field("name", 0));
        store.add(field("email", 1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_by_id("email").map(|n| n.index), Some(1));
        assert_eq!(store.get_by_index(0).map(|n| n.id.as_str()), Some("name"));
        assert!(store.get_by_id("phone").is_none());
        assert!(store.get_by_index(7).is_none());
    }

    #[test]
    fn update_replaces_in_both_views() {
        let mut store = ItemStore::new();
        store.add(field("name", 0));
        let mut changed = field("name", 0);
        changed.completed = true;
        assert!(store.update(changed));
        assert!(store.get_by_id("name").unwrap().completed);
        assert!(store.get_by_index(0).unwrap().completed);
        assert!(!store.update(field("ghost", 5)));
    }

    #[test]
    fn merge_applies_partial() {
        let mut store = ItemStore::new();
        store.add(field("name", 0));
        let node = store.get_by_id("name").cloned().unwrap();
        let merged = store
            .merge(&node, &NodePatch::new().active(true))
            .expect("merged");
        assert!(merged.active);
        assert!(store.get_by_index(0).unwrap().active);
    }

    #[test]
    fn get_all_is_a_snapshot() {
        let mut store = ItemStore::new();
        store.add(field("name", 0));
        let mut snapshot = store.get_all();
        snapshot[0].active = true;
        assert!(!store.get_by_index(0).unwrap().active);
    }

    #[test]
    fn filter_and_clear() {
        let mut store = ItemStore::new();
        store.add(field("a", 0));
        store.add(field("b", 1).with_included(false));
        assert_eq!(store.filter(|n| n.is_included).len(), 1);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get_by_id("a").is_none());
    }
}
