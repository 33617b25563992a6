pub mod cache_cmd;
pub mod config_cmd;
pub mod items;
pub mod sync_cmd;

pub use cache_cmd::CacheCommand;
pub use config_cmd::ConfigCommand;
pub use items::{
    AddCommand, ListCommand, PriceCommand, RemoveCommand, RenameCommand, StatsCommand,
    ToggleCommand,
};
pub use sync_cmd::SyncCommand;
