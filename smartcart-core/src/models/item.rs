//! Shopping list items.
//!
//! An item's name may carry a leading quantity prefix ("4 Widgets"); the
//! quantity is parsed on demand and never stored separately.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single shopping list entry.
///
/// Remote records are consumed permissively: every field except `id`
/// falls back to its default when absent from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identity, derived from the creation timestamp (millis).
    pub id: i64,
    /// Free-text name; may begin with a decimal quantity prefix.
    #[serde(default)]
    pub name: String,
    /// Price per unit; non-negative, 0 when unknown.
    #[serde(default)]
    pub unit_price: f64,
    /// Whether the item has been checked off.
    #[serde(default)]
    pub purchased: bool,
}

impl Item {
    /// Creates a new item with an id derived from the current time.
    ///
    /// The name is trimmed and the price coerced to a non-negative number
    /// (invalid input becomes 0).
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            name: name.into().trim().to_string(),
            unit_price: coerce_price(unit_price),
            purchased: false,
        }
    }

    /// Derived quantity: the leading integer run of the name, or 1 if absent.
    pub fn quantity(&self) -> u32 {
        parse_quantity(&self.name)
    }

    /// Derived line total: `unit_price * quantity`.
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity())
    }

    /// True when the name is empty or whitespace-only.
    ///
    /// Blank items are dropped from sync payloads and ordered views as a
    /// defensive measure against corrupt remote data.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.purchased { "[x]" } else { "[ ]" };
        if self.unit_price > 0.0 {
            write!(f, "{} {:<30} ${:.0}", check, self.name, self.unit_price)
        } else {
            write!(f, "{} {}", check, self.name)
        }
    }
}

/// Parses the leading integer run of a name ("04 Widgets" -> 4).
///
/// Returns 1 when the name has no quantity prefix.
pub fn parse_quantity(name: &str) -> u32 {
    let digits: String = name
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        1
    } else {
        digits.parse().unwrap_or(1)
    }
}

/// Coerces a price to a non-negative finite number; anything else becomes 0.
pub(crate) fn coerce_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// The hardcoded starter list used when no saved data exists.
pub fn default_items() -> Vec<Item> {
    let names = [
        "4 Penne Rigate",
        "4 Bolognese Sauce",
        "4 Cooking Cream",
        "6 Soda 3L",
        "4 Vanilla Milk Pack",
        "Laundry Detergent",
        "Fabric Softener",
        "Toothpaste",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Item {
            id: i as i64 + 1,
            name: (*name).to_string(),
            unit_price: 0.0,
            purchased: false,
        })
        .collect()
}
