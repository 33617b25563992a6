pub mod auto_sync;

pub use auto_sync::{try_auto_pull, try_auto_push};
