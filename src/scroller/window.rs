//! The ordered set of mounted items.

use super::types::Item;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Mounted items in scroll order, with an id-to-element index.
///
/// The order always matches the order of the item nodes inside the host's
/// content element. Ids are unique.
#[derive(Debug, Clone)]
pub struct ItemWindow<Id, D, E> {
    items: VecDeque<Item<Id, D, E>>,
    elements: HashMap<Id, E>,
}

impl<Id, D, E> Default for ItemWindow<Id, D, E> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            elements: HashMap::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash, D, E: Clone> ItemWindow<Id, D, E> {
    /// An empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mounted items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with `id` is mounted.
    pub fn contains(&self, id: &Id) -> bool {
        self.elements.contains_key(id)
    }

    /// The node mounted for `id`.
    pub fn element(&self, id: &Id) -> Option<&E> {
        self.elements.get(id)
    }

    /// First item in scroll order.
    pub fn first(&self) -> Option<&Item<Id, D, E>> {
        self.items.front()
    }

    /// Last item in scroll order.
    pub fn last(&self) -> Option<&Item<Id, D, E>> {
        self.items.back()
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&Item<Id, D, E>> {
        self.items.get(index)
    }

    /// Position of `id`, if mounted.
    pub fn index_of(&self, id: &Id) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().position(|item| &item.id == id)
    }

    /// Iterates items in scroll order.
    pub fn iter(&self) -> impl Iterator<Item = &Item<Id, D, E>> {
        self.items.iter()
    }

    /// Ids in scroll order.
    pub fn ids(&self) -> Vec<Id> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Inserts `batch` so that its first item lands at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or if an id in `batch` is already mounted;
    /// callers resolve the index and filter duplicates first.
    pub fn splice(&mut self, index: usize, batch: Vec<Item<Id, D, E>>) {
        assert!(index <= self.items.len(), "splice index out of bounds");
        for (offset, item) in batch.into_iter().enumerate() {
            let previous = self.elements.insert(item.id.clone(), item.element.clone());
            assert!(previous.is_none(), "duplicate item id in window");
            self.items.insert(index + offset, item);
        }
    }

    /// Removes and returns the first item.
    pub fn pop_front(&mut self) -> Option<Item<Id, D, E>> {
        let item = self.items.pop_front()?;
        self.elements.remove(&item.id);
        Some(item)
    }

    /// Removes and returns the last item.
    pub fn pop_back(&mut self) -> Option<Item<Id, D, E>> {
        let item = self.items.pop_back()?;
        self.elements.remove(&item.id);
        Some(item)
    }

    /// Removes every item, in scroll order.
    pub fn drain(&mut self) -> Vec<Item<Id, D, E>> {
        self.elements.clear();
        self.items.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32) -> Item<u32, (), String> {
        Item {
            id,
            element: format!("el-{id}"),
            data: (),
        }
    }

    #[test]
    fn test_splice_keeps_order_and_index() {
        let mut window = ItemWindow::new();
        window.splice(0, vec![item(3), item(4)]);
        window.splice(0, vec![item(1), item(2)]);
        window.splice(4, vec![item(5)]);

        assert_eq!(window.ids(), vec![1, 2, 3, 4, 5]);
        assert_eq!(window.index_of(&4), Some(3));
        assert_eq!(window.element(&2).map(String::as_str), Some("el-2"));
        assert_eq!(window.index_of(&9), None);
    }

    #[test]
    fn test_pops_update_lookup() {
        let mut window = ItemWindow::new();
        window.splice(0, vec![item(1), item(2), item(3)]);

        assert_eq!(window.pop_front().map(|i| i.id), Some(1));
        assert_eq!(window.pop_back().map(|i| i.id), Some(3));
        assert!(!window.contains(&1));
        assert!(!window.contains(&3));
        assert_eq!(window.first().map(|i| i.id), Some(2));
        assert_eq!(window.last().map(|i| i.id), Some(2));
    }

    #[test]
    fn test_drain_empties_both_views() {
        let mut window = ItemWindow::new();
        window.splice(0, vec![item(1), item(2)]);
        let drained: Vec<u32> = window.drain().into_iter().map(|i| i.id).collect();

        assert_eq!(drained, vec![1, 2]);
        assert!(window.is_empty());
        assert!(window.element(&1).is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate item id")]
    fn test_duplicate_ids_are_rejected() {
        let mut window = ItemWindow::new();
        window.splice(0, vec![item(1)]);
        window.splice(1, vec![item(1)]);
    }
}
