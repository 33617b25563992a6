//! Data model for the shopping list.

mod item;
mod stats;

pub(crate) use item::coerce_price;
pub use item::{default_items, parse_quantity, Item};
pub use stats::ListStats;
