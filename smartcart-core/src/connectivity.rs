//! Connectivity monitor: tracks the online/offline signal that gates
//! remote sync activity.

use std::sync::atomic::{AtomicBool, Ordering};

/// An observed connectivity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentOnline,
    WentOffline,
}

/// Current online state, shared between the sync engine and the
/// presentation layer.
///
/// The monitor only records state; probing (e.g. a reachability check
/// against the sync endpoint) is the caller's concern.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: AtomicBool,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Records a new state, returning the transition if it changed.
    pub fn update(&self, online: bool) -> Option<Transition> {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        match (was_online, online) {
            (false, true) => Some(Transition::WentOnline),
            (true, false) => Some(Transition::WentOffline),
            _ => None,
        }
    }
}

impl Default for ConnectivityMonitor {
    /// Starts online, matching the platform default before any probe ran.
    fn default() -> Self {
        Self::new(true)
    }
}
