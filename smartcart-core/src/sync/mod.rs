//! Remote sync for the shopping list.
//!
//! The list is synchronized against a single sheet-backed HTTP endpoint:
//!
//! 1. On startup the engine pulls the authoritative list once (when online)
//!    and wholesale-replaces the local store if the payload is a non-empty
//!    array.
//! 2. Every local mutation re-arms a trailing debounce timer; after the
//!    list has been quiescent for the whole window, a single-flight worker
//!    pushes the freshest filtered snapshot.
//!
//! Every remote failure is non-fatal: the last good local snapshot stands
//! and no retry happens until the next mutation re-arms the timer.

mod client;
mod engine;
mod error;

pub use client::{RemoteClient, SheetClient};
pub use engine::{SharedStore, SyncEngine, SyncPolicy, SyncStatus, DEFAULT_DEBOUNCE};
pub use error::SyncError;
