//! In-memory item store: the single source of truth for the list.
//!
//! All operations are synchronous and total - mutations addressed at an
//! unknown id are no-ops that return `false`.

use crate::models::{coerce_price, Item, ListStats};

/// Ordered list of shopping items with a defined mutation API.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a store from previously persisted items.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Borrows the full list in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by id.
    pub fn get(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Prepends a new item, returning its id.
    ///
    /// The name is trimmed; a blank name is rejected. The price is coerced
    /// to a non-negative number. Ids derive from the creation timestamp and
    /// are bumped past the current maximum on collision so they are never
    /// reused within a list.
    pub fn add(&mut self, name: &str, unit_price: f64) -> Option<i64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut item = Item::new(name, unit_price);
        let max_id = self.items.iter().map(|i| i.id).max().unwrap_or(0);
        if item.id <= max_id {
            item.id = max_id + 1;
        }

        let id = item.id;
        self.items.insert(0, item);
        Some(id)
    }

    /// Flips the purchased flag of an item.
    pub fn toggle_purchased(&mut self, id: i64) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.purchased = !item.purchased;
                true
            }
            None => false,
        }
    }

    /// Renames an item. A blank replacement name is rejected.
    pub fn rename(&mut self, id: i64, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Updates an item's unit price, coercing invalid input to 0.
    pub fn set_price(&mut self, id: i64, unit_price: f64) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.unit_price = coerce_price(unit_price);
                true
            }
            None => false,
        }
    }

    /// Removes an item by id. Returns true if an item was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != len_before
    }

    /// Wholesale replacement of the list, used when a remote pull succeeds.
    ///
    /// Blank-named entries in the incoming payload are dropped.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items.into_iter().filter(|i| !i.is_blank()).collect();
    }

    /// Display ordering: unpurchased items first, purchased last, original
    /// order otherwise preserved (a stable partition, not a sort).
    pub fn ordered(&self) -> Vec<&Item> {
        let mut ordered: Vec<&Item> = Vec::with_capacity(self.items.len());
        ordered.extend(self.items.iter().filter(|i| !i.is_blank() && !i.purchased));
        ordered.extend(self.items.iter().filter(|i| !i.is_blank() && i.purchased));
        ordered
    }

    /// Clones the list for a sync payload, minus blank-named entries.
    pub fn snapshot_for_sync(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|i| !i.is_blank())
            .cloned()
            .collect()
    }

    /// Recomputes derived statistics for the current list.
    pub fn stats(&self) -> ListStats {
        ListStats::from_items(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, purchased: bool) -> Item {
        Item {
            id,
            name: name.to_string(),
            unit_price: 0.0,
            purchased,
        }
    }

    #[test]
    fn test_add_prepends_and_trims() {
        let mut store = ItemStore::new();
        store.add("Bread", 100.0).unwrap();
        let id = store.add("  Milk  ", 500.0).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].id, id);
        assert_eq!(store.items()[0].name, "Milk");
        assert_eq!(store.items()[1].name, "Bread");
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut store = ItemStore::new();
        assert!(store.add("   ", 100.0).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_never_reuses_ids() {
        let mut store = ItemStore::new();
        let a = store.add("A", 0.0).unwrap();
        let b = store.add("B", 0.0).unwrap();
        // Both adds can land in the same millisecond; ids must still differ.
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_toggle_purchased() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false)]);
        assert!(store.toggle_purchased(1));
        assert!(store.get(1).unwrap().purchased);
        assert!(store.toggle_purchased(1));
        assert!(!store.get(1).unwrap().purchased);
    }

    #[test]
    fn test_mutations_are_total() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false)]);
        assert!(!store.toggle_purchased(99));
        assert!(!store.rename(99, "Eggs"));
        assert!(!store.set_price(99, 10.0));
        assert!(!store.remove(99));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rename_rejects_blank() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false)]);
        assert!(!store.rename(1, "  "));
        assert_eq!(store.get(1).unwrap().name, "Milk");
    }

    #[test]
    fn test_set_price_coerces_negative() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false)]);
        assert!(store.set_price(1, -5.0));
        assert_eq!(store.get(1).unwrap().unit_price, 0.0);
    }

    #[test]
    fn test_remove() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false), item(2, "Eggs", false)]);
        assert!(store.remove(1));
        assert_eq!(store.len(), 1);
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_replace_all_filters_blanks() {
        let mut store = ItemStore::from_items(vec![item(1, "Milk", false)]);
        store.replace_all(vec![
            item(10, "Eggs", false),
            item(11, "   ", false),
            item(12, "Bread", true),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.get(11).is_none());
    }

    #[test]
    fn test_ordered_stable_partition() {
        // [A(false), B(true), C(false)] -> [A, C, B]
        let store = ItemStore::from_items(vec![
            item(1, "A", false),
            item(2, "B", true),
            item(3, "C", false),
        ]);
        let names: Vec<&str> = store.ordered().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_ordered_excludes_blanks() {
        let store = ItemStore::from_items(vec![item(1, "A", false), item(2, " ", false)]);
        assert_eq!(store.ordered().len(), 1);
    }

    #[test]
    fn test_snapshot_for_sync_filters_blanks() {
        let store = ItemStore::from_items(vec![item(1, "A", false), item(2, "", true)]);
        let snapshot = store.snapshot_for_sync();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name, "A");
    }
}
