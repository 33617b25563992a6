//! Derived list statistics.

use serde::Serialize;

use super::Item;

/// Totals and completion derived from the item list.
///
/// Recomputed on every store change, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStats {
    /// Sum of `unit_price * quantity` over all items.
    pub total: f64,
    /// Same sum restricted to purchased items.
    pub purchased_total: f64,
    /// Number of items in the list.
    pub item_count: usize,
    /// Number of purchased items.
    pub purchased_count: usize,
    /// `100 * purchased_count / item_count`, rounded; 0 for an empty list.
    pub completion_percent: u32,
}

impl ListStats {
    pub fn from_items(items: &[Item]) -> Self {
        let total = items.iter().map(Item::line_total).sum();
        let purchased_total = items
            .iter()
            .filter(|i| i.purchased)
            .map(Item::line_total)
            .sum();
        let item_count = items.len();
        let purchased_count = items.iter().filter(|i| i.purchased).count();
        let completion_percent = if item_count == 0 {
            0
        } else {
            ((purchased_count as f64 / item_count as f64) * 100.0).round() as u32
        };

        Self {
            total,
            purchased_total,
            item_count,
            purchased_count,
            completion_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64, purchased: bool) -> Item {
        Item {
            id: name.len() as i64,
            name: name.to_string(),
            unit_price: price,
            purchased,
        }
    }

    #[test]
    fn test_empty_list() {
        let stats = ListStats::from_items(&[]);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.purchased_total, 0.0);
        assert_eq!(stats.completion_percent, 0);
    }

    #[test]
    fn test_totals_use_quantity() {
        let items = vec![item("4 Widgets", 500.0, false), item("Milk", 990.0, true)];
        let stats = ListStats::from_items(&items);
        assert_eq!(stats.total, 4.0 * 500.0 + 990.0);
        assert_eq!(stats.purchased_total, 990.0);
        assert_eq!(stats.item_count, 2);
        assert_eq!(stats.purchased_count, 1);
        assert_eq!(stats.completion_percent, 50);
    }

    #[test]
    fn test_toggle_moves_between_buckets() {
        // Toggling a 500 x 4 item moves 2000 into purchased_total
        // without changing the overall total.
        let mut items = vec![item("4 Widgets", 500.0, false), item("Bread", 100.0, false)];
        let before = ListStats::from_items(&items);

        items[0].purchased = true;
        let after = ListStats::from_items(&items);

        assert_eq!(before.total, after.total);
        assert_eq!(before.purchased_total, 0.0);
        assert_eq!(after.purchased_total, 2000.0);
    }

    #[test]
    fn test_completion_percent_rounds() {
        let items = vec![
            item("A", 0.0, true),
            item("B", 0.0, false),
            item("C", 0.0, false),
        ];
        // 1/3 -> 33%
        assert_eq!(ListStats::from_items(&items).completion_percent, 33);
    }
}
