//! SmartCart Core Library
//!
//! Shared types and logic for SmartCart applications: the shopping list
//! store, JSON snapshot persistence, remote sheet sync, connectivity
//! tracking and the offline asset cache.

pub mod connectivity;
pub mod models;
pub mod offline;
pub mod persistence;
pub mod store;
pub mod sync;

pub use connectivity::{ConnectivityMonitor, Transition};
pub use models::{default_items, parse_quantity, Item, ListStats};
pub use offline::{AssetCache, CacheError, Served, CACHE_NAME};
pub use persistence::{JsonFileStore, Persistence, PersistenceError, STORAGE_FILE_NAME};
pub use store::ItemStore;
pub use sync::{
    RemoteClient, SharedStore, SheetClient, SyncEngine, SyncError, SyncPolicy, SyncStatus,
    DEFAULT_DEBOUNCE,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
