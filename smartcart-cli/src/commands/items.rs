//! Shopping list CLI commands.
//!
//! Manage the shopping list: add, toggle, rename, reprice and remove
//! items, plus list and stats views.

use clap::{Args, ValueEnum};

use crate::config::Config;
use smartcart_core::{default_items, ItemStore, JsonFileStore, Persistence};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Opens the persisted list, seeding the default list on first run or
/// when the snapshot is unreadable.
pub(crate) fn open_store(
    config: &Config,
) -> Result<(JsonFileStore, ItemStore), Box<dyn std::error::Error>> {
    let persistence = JsonFileStore::new(config.data_path.value.clone());
    let items = match persistence.load()? {
        Some(items) if !items.is_empty() => items,
        _ => {
            let items = default_items();
            persistence.save(&items)?;
            items
        }
    };
    Ok((persistence, ItemStore::from_items(items)))
}

#[derive(Args)]
pub struct AddCommand {
    /// Item name; a leading number is read as the quantity (e.g. "6 Eggs")
    pub name: String,

    /// Unit price
    #[arg(long, short, default_value_t = 0.0)]
    pub price: f64,
}

impl AddCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (persistence, mut store) = open_store(config)?;

        let id = store
            .add(&self.name, self.price)
            .ok_or("Item name cannot be empty")?;
        persistence.save(store.items())?;

        let item = store.get(id).ok_or("item vanished after insert")?;
        println!("Added '{}' (id {})", item.name, id);
        Ok(())
    }
}

#[derive(Args)]
pub struct ToggleCommand {
    /// Item id (see `cart list`)
    pub id: i64,
}

impl ToggleCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (persistence, mut store) = open_store(config)?;

        if !store.toggle_purchased(self.id) {
            return Err(format!("No item with id {}", self.id).into());
        }
        persistence.save(store.items())?;

        let item = store.get(self.id).ok_or("item vanished after toggle")?;
        if item.purchased {
            println!("Checked '{}' ✓", item.name);
        } else {
            println!("Unchecked '{}'", item.name);
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct RenameCommand {
    /// Item id (see `cart list`)
    pub id: i64,

    /// New item name
    pub name: String,
}

impl RenameCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (persistence, mut store) = open_store(config)?;

        if self.name.trim().is_empty() {
            return Err("Item name cannot be empty".into());
        }
        if !store.rename(self.id, &self.name) {
            return Err(format!("No item with id {}", self.id).into());
        }
        persistence.save(store.items())?;

        println!("Renamed item {} to '{}'", self.id, self.name.trim());
        Ok(())
    }
}

#[derive(Args)]
pub struct PriceCommand {
    /// Item id (see `cart list`)
    pub id: i64,

    /// New unit price; negative values are coerced to 0
    pub price: f64,
}

impl PriceCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (persistence, mut store) = open_store(config)?;

        if !store.set_price(self.id, self.price) {
            return Err(format!("No item with id {}", self.id).into());
        }
        persistence.save(store.items())?;

        let item = store.get(self.id).ok_or("item vanished after update")?;
        println!("Set price of '{}' to {:.2}", item.name, item.unit_price);
        Ok(())
    }
}

#[derive(Args)]
pub struct RemoveCommand {
    /// Item id (see `cart list`)
    pub id: i64,
}

impl RemoveCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (persistence, mut store) = open_store(config)?;

        let name = store.get(self.id).map(|i| i.name.clone());
        if !store.remove(self.id) {
            return Err(format!("No item with id {}", self.id).into());
        }
        persistence.save(store.items())?;

        println!(
            "Removed '{}'",
            name.unwrap_or_else(|| self.id.to_string())
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (_persistence, store) = open_store(config)?;
        let items = store.ordered();
        let stats = store.stats();

        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "items": items.iter()
                        .map(|i| serde_json::json!({
                            "id": i.id,
                            "name": i.name,
                            "quantity": i.quantity(),
                            "unit_price": i.unit_price,
                            "line_total": i.line_total(),
                            "purchased": i.purchased,
                        }))
                        .collect::<Vec<_>>(),
                    "stats": {
                        "total": stats.total,
                        "purchased_total": stats.purchased_total,
                        "item_count": stats.item_count,
                        "purchased_count": stats.purchased_count,
                        "completion_percent": stats.completion_percent,
                    },
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Shopping List");
                println!("{}", "=".repeat(56));

                if items.is_empty() {
                    println!("No items in the list.");
                } else {
                    for item in &items {
                        let check = if item.purchased { "[x]" } else { "[ ]" };
                        println!(
                            "{} {:>13}  {:<25} {:>3} x {:>8.2} = {:>9.2}",
                            check,
                            item.id,
                            item.name,
                            item.quantity(),
                            item.unit_price,
                            item.line_total()
                        );
                    }
                    println!("{}", "-".repeat(56));
                    println!(
                        "{} of {} purchased ({}%)",
                        stats.purchased_count, stats.item_count, stats.completion_percent
                    );
                    println!(
                        "Total: {:.2}   Purchased: {:.2}",
                        stats.total, stats.purchased_total
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct StatsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl StatsCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (_persistence, store) = open_store(config)?;
        let stats = store.stats();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            OutputFormat::Table => {
                println!("List Statistics");
                println!("===============");
                println!();
                println!(
                    "Items:      {} ({} purchased)",
                    stats.item_count, stats.purchased_count
                );
                println!("Total:      {:.2}", stats.total);
                println!("Purchased:  {:.2}", stats.purchased_total);
                println!("Completion: {}%", stats.completion_percent);
            }
        }
        Ok(())
    }
}
