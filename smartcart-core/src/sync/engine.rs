//! The sync engine: debounced local/remote reconciliation.
//!
//! Composed via dependency injection from a shared [`ItemStore`], a
//! [`Persistence`] snapshot store, a [`RemoteClient`] and a
//! [`ConnectivityMonitor`]. Mutations go through [`SyncEngine::mutate`],
//! which writes the durable snapshot synchronously and re-arms the
//! trailing debounce timer; a single-flight worker task performs the
//! actual pushes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::connectivity::{ConnectivityMonitor, Transition};
use crate::models::default_items;
use crate::persistence::{Persistence, PersistenceError};
use crate::store::ItemStore;
use crate::sync::RemoteClient;

/// Store handle shared between the presentation layer and the engine.
pub type SharedStore = Arc<Mutex<ItemStore>>;

/// Quiescence window after the last mutation before a push fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Tunable sync behavior.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    /// Trailing debounce window; no leading edge, no max-wait cap.
    pub debounce: Duration,
    /// Whether an offline-to-online transition triggers a catch-up pull.
    /// Off by default: a stale local list should not race a fresher
    /// remote one without the user asking for it.
    pub resync_on_reconnect: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            resync_on_reconnect: false,
        }
    }
}

/// Point-in-time engine state for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    /// A pull or push request is in flight.
    pub syncing: bool,
    /// Local state has diverged from the last known-synced state.
    pub pending_changes: bool,
    /// The startup pull has settled (success or failure); pushes are
    /// gated on this so the pull always happens-before the first push.
    pub loaded: bool,
    /// Current connectivity state.
    pub online: bool,
}

/// Debounced, single-flight sync engine.
///
/// Cheaply clonable; clones share all state.
pub struct SyncEngine<R, P> {
    store: SharedStore,
    persistence: Arc<P>,
    remote: Arc<R>,
    connectivity: Arc<ConnectivityMonitor>,
    policy: SyncPolicy,
    syncing: Arc<AtomicBool>,
    pending_changes: Arc<AtomicBool>,
    loaded: Arc<AtomicBool>,
    change_tx: mpsc::UnboundedSender<()>,
    change_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<()>>>>,
}

impl<R, P> Clone for SyncEngine<R, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            persistence: Arc::clone(&self.persistence),
            remote: Arc::clone(&self.remote),
            connectivity: Arc::clone(&self.connectivity),
            policy: self.policy.clone(),
            syncing: Arc::clone(&self.syncing),
            pending_changes: Arc::clone(&self.pending_changes),
            loaded: Arc::clone(&self.loaded),
            change_tx: self.change_tx.clone(),
            change_rx: Arc::clone(&self.change_rx),
        }
    }
}

impl<R, P> SyncEngine<R, P>
where
    R: RemoteClient + 'static,
    P: Persistence + 'static,
{
    pub fn new(
        store: SharedStore,
        persistence: Arc<P>,
        remote: Arc<R>,
        connectivity: Arc<ConnectivityMonitor>,
        policy: SyncPolicy,
    ) -> Self {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        Self {
            store,
            persistence,
            remote,
            connectivity,
            policy,
            syncing: Arc::new(AtomicBool::new(false)),
            pending_changes: Arc::new(AtomicBool::new(false)),
            loaded: Arc::new(AtomicBool::new(false)),
            change_tx,
            change_rx: Arc::new(Mutex::new(Some(change_rx))),
        }
    }

    /// Returns the shared store handle for read access.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            syncing: self.syncing.load(Ordering::SeqCst),
            pending_changes: self.pending_changes.load(Ordering::SeqCst),
            loaded: self.loaded.load(Ordering::SeqCst),
            online: self.connectivity.is_online(),
        }
    }

    /// Reads the persisted list into the store, seeding the hardcoded
    /// default list (and writing it back) when nothing usable is saved.
    pub fn load_local(&self) -> Result<(), PersistenceError> {
        match self.persistence.load()? {
            Some(items) if !items.is_empty() => {
                let mut store = self.store.lock().unwrap();
                *store = ItemStore::from_items(items);
            }
            _ => {
                let items = default_items();
                self.persistence.save(&items)?;
                let mut store = self.store.lock().unwrap();
                *store = ItemStore::from_items(items);
                debug!("no saved list, seeded defaults");
            }
        }
        Ok(())
    }

    /// Startup pull: fetches the authoritative remote list once.
    ///
    /// A non-empty array wholesale-replaces the store (minus blank-named
    /// entries) and is persisted. Every failure is logged and ignored -
    /// the locally persisted list remains authoritative. `loaded` is set
    /// on every path, which un-gates the push worker.
    pub async fn pull(&self) {
        if !self.connectivity.is_online() {
            debug!("offline, skipping remote load");
            self.loaded.store(true, Ordering::SeqCst);
            return;
        }

        self.syncing.store(true, Ordering::SeqCst);
        match self.remote.pull().await {
            Ok(items) if !items.is_empty() => {
                let snapshot = {
                    let mut store = self.store.lock().unwrap();
                    store.replace_all(items);
                    store.items().to_vec()
                };
                if let Err(e) = self.persistence.save(&snapshot) {
                    warn!("failed to persist pulled list: {}", e);
                }
                info!("replaced local list with {} remote item(s)", snapshot.len());
            }
            Ok(_) => debug!("remote list empty, keeping local data"),
            Err(e) => warn!("remote load failed, local list stands: {}", e),
        }
        self.syncing.store(false, Ordering::SeqCst);
        self.loaded.store(true, Ordering::SeqCst);
    }

    /// Applies a mutation to the store.
    ///
    /// The durable snapshot is written synchronously before this returns,
    /// so persistence is always consistent with the store at the end of a
    /// mutation. The debounce timer is re-armed afterwards.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut ItemStore) -> T) -> Result<T, PersistenceError> {
        let (out, snapshot) = {
            let mut store = self.store.lock().unwrap();
            let out = f(&mut store);
            (out, store.items().to_vec())
        };
        self.persistence.save(&snapshot)?;
        self.pending_changes.store(true, Ordering::SeqCst);
        // Worker gone means no sync; the local snapshot is already safe.
        let _ = self.change_tx.send(());
        Ok(out)
    }

    /// Spawns the single-flight push worker.
    ///
    /// Each change signal (re)opens a trailing debounce window; only after
    /// the list has been quiescent for the whole window does a push fire,
    /// carrying the freshest snapshot. At most one push is in flight -
    /// changes landing mid-push queue the next cycle rather than being
    /// lost or overlapping.
    ///
    /// # Panics
    ///
    /// Panics if called more than once on the same engine.
    pub fn spawn_push_worker(&self) -> JoinHandle<()> {
        let mut rx = self
            .change_rx
            .lock()
            .unwrap()
            .take()
            .expect("push worker already running");
        let engine = self.clone();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Trailing debounce: any further change restarts the window.
                loop {
                    tokio::select! {
                        _ = sleep(engine.policy.debounce) => break,
                        more = rx.recv() => {
                            if more.is_none() {
                                return;
                            }
                        }
                    }
                }
                engine.push_now().await;
            }
        })
    }

    /// Pushes the current filtered snapshot immediately, bypassing the
    /// debounce window. Skipped while offline or before the startup pull
    /// has settled. Failures are logged; `pending_changes` stays set and
    /// no retry happens until the next mutation re-arms the timer.
    pub async fn push_now(&self) {
        if !self.connectivity.is_online() {
            debug!("offline, skipping push");
            return;
        }
        if !self.loaded.load(Ordering::SeqCst) {
            debug!("initial load pending, skipping push");
            return;
        }

        let snapshot = { self.store.lock().unwrap().snapshot_for_sync() };

        self.syncing.store(true, Ordering::SeqCst);
        match self.remote.push(&snapshot).await {
            Ok(()) => {
                self.pending_changes.store(false, Ordering::SeqCst);
                debug!("push complete ({} item(s))", snapshot.len());
            }
            Err(e) => warn!("push failed, keeping local changes: {}", e),
        }
        self.syncing.store(false, Ordering::SeqCst);
    }

    /// Feeds a connectivity observation to the monitor. An
    /// offline-to-online transition triggers a catch-up pull only when the
    /// policy asks for it.
    pub async fn set_online(&self, online: bool) {
        match self.connectivity.update(online) {
            Some(Transition::WentOnline) if self.policy.resync_on_reconnect => {
                info!("back online, pulling remote list");
                self.pull().await;
            }
            Some(Transition::WentOnline) => debug!("back online"),
            Some(Transition::WentOffline) => debug!("went offline"),
            None => {}
        }
    }

    /// Convenience startup sequence: load local data, pull the remote
    /// list, then start the push worker.
    pub async fn start(&self) -> Result<JoinHandle<()>, PersistenceError> {
        self.load_local()?;
        self.pull().await;
        Ok(self.spawn_push_worker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::sync::SyncError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct MockRemote {
        pull_items: Vec<Item>,
        pull_fails: bool,
        push_fails: bool,
        push_delay: Duration,
        pull_calls: AtomicUsize,
        pushes: Mutex<Vec<Vec<Item>>>,
    }

    #[async_trait]
    impl RemoteClient for MockRemote {
        async fn pull(&self) -> Result<Vec<Item>, SyncError> {
            self.pull_calls.fetch_add(1, Ordering::SeqCst);
            if self.pull_fails {
                Err(SyncError::Decode("mock pull failure".to_string()))
            } else {
                Ok(self.pull_items.clone())
            }
        }

        async fn push(&self, items: &[Item]) -> Result<(), SyncError> {
            if !self.push_delay.is_zero() {
                sleep(self.push_delay).await;
            }
            if self.push_fails {
                return Err(SyncError::Decode("mock push failure".to_string()));
            }
            self.pushes.lock().unwrap().push(items.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryPersistence {
        saved: Mutex<Option<Vec<Item>>>,
    }

    impl Persistence for MemoryPersistence {
        fn load(&self) -> Result<Option<Vec<Item>>, PersistenceError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
            *self.saved.lock().unwrap() = Some(items.to_vec());
            Ok(())
        }
    }

    fn item(id: i64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            unit_price: 0.0,
            purchased: false,
        }
    }

    fn engine_with(
        remote: MockRemote,
        online: bool,
        policy: SyncPolicy,
    ) -> SyncEngine<MockRemote, MemoryPersistence> {
        SyncEngine::new(
            Arc::new(Mutex::new(ItemStore::new())),
            Arc::new(MemoryPersistence::default()),
            Arc::new(remote),
            Arc::new(ConnectivityMonitor::new(online)),
            policy,
        )
    }

    fn short_debounce() -> SyncPolicy {
        SyncPolicy {
            debounce: Duration::from_millis(50),
            resync_on_reconnect: false,
        }
    }

    #[tokio::test]
    async fn test_offline_startup_seeds_defaults_without_network() {
        let engine = engine_with(MockRemote::default(), false, short_debounce());

        engine.load_local().unwrap();
        engine.pull().await;

        let status = engine.status();
        assert!(status.loaded);
        assert!(!status.syncing);
        assert!(!engine.store().lock().unwrap().is_empty());
        assert_eq!(engine.remote.pull_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pull_replaces_store_and_filters_blanks() {
        let remote = MockRemote {
            pull_items: vec![item(10, "Eggs"), item(11, "   "), item(12, "Bread")],
            ..Default::default()
        };
        let engine = engine_with(remote, true, short_debounce());
        engine.load_local().unwrap();

        engine.pull().await;

        let store = engine.store();
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get(11).is_none());
        // Persisted snapshot matches the replaced store.
        let saved = engine.persistence.load().unwrap().unwrap();
        assert_eq!(saved, store.items());
    }

    #[tokio::test]
    async fn test_pull_empty_or_failed_keeps_local_list() {
        for remote in [
            MockRemote::default(),
            MockRemote {
                pull_fails: true,
                ..Default::default()
            },
        ] {
            let engine = engine_with(remote, true, short_debounce());
            engine.load_local().unwrap();
            let before = engine.store().lock().unwrap().items().to_vec();

            engine.pull().await;

            assert_eq!(engine.store().lock().unwrap().items(), before);
            assert!(engine.status().loaded);
        }
    }

    #[tokio::test]
    async fn test_debounce_coalesces_mutations_into_one_push() {
        let engine = engine_with(MockRemote::default(), true, short_debounce());
        let worker = engine.start().await.unwrap();

        for name in ["Milk", "Eggs", "Bread"] {
            engine.mutate(|s| s.add(name, 0.0)).unwrap();
            sleep(Duration::from_millis(10)).await;
        }

        sleep(Duration::from_millis(300)).await;

        let pushes = engine.remote.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        let names: Vec<&str> = pushes[0].iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"Milk"));
        assert!(names.contains(&"Eggs"));
        assert!(names.contains(&"Bread"));
        drop(pushes);
        worker.abort();
    }

    #[tokio::test]
    async fn test_push_gated_until_initial_pull_settles() {
        let engine = engine_with(MockRemote::default(), true, short_debounce());
        engine.load_local().unwrap();
        let worker = engine.spawn_push_worker();

        engine.mutate(|s| s.add("Milk", 0.0)).unwrap();
        sleep(Duration::from_millis(150)).await;
        assert!(engine.remote.pushes.lock().unwrap().is_empty());

        engine.pull().await;
        engine.mutate(|s| s.add("Eggs", 0.0)).unwrap();
        sleep(Duration::from_millis(150)).await;
        assert_eq!(engine.remote.pushes.lock().unwrap().len(), 1);
        worker.abort();
    }

    #[tokio::test]
    async fn test_offline_short_circuits_push() {
        let engine = engine_with(MockRemote::default(), false, short_debounce());
        engine.load_local().unwrap();
        engine.pull().await;
        let worker = engine.spawn_push_worker();

        engine.mutate(|s| s.add("Milk", 0.0)).unwrap();
        sleep(Duration::from_millis(150)).await;

        assert!(engine.remote.pushes.lock().unwrap().is_empty());
        assert!(engine.status().pending_changes);
        worker.abort();
    }

    #[tokio::test]
    async fn test_single_flight_next_push_carries_freshest_snapshot() {
        let remote = MockRemote {
            push_delay: Duration::from_millis(100),
            ..Default::default()
        };
        let policy = SyncPolicy {
            debounce: Duration::from_millis(20),
            resync_on_reconnect: false,
        };
        let engine = engine_with(remote, true, policy);
        engine.load_local().unwrap();
        engine.pull().await;
        let worker = engine.spawn_push_worker();

        engine.mutate(|s| s.add("First", 0.0)).unwrap();
        // Land a second mutation while the first push is still in flight.
        sleep(Duration::from_millis(50)).await;
        engine.mutate(|s| s.add("Second", 0.0)).unwrap();
        sleep(Duration::from_millis(400)).await;

        let pushes = engine.remote.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 2);
        let last: Vec<&str> = pushes[1].iter().map(|i| i.name.as_str()).collect();
        assert!(last.contains(&"First"));
        assert!(last.contains(&"Second"));
        drop(pushes);
        worker.abort();
    }

    #[tokio::test]
    async fn test_push_filters_blank_names() {
        let engine = engine_with(MockRemote::default(), true, short_debounce());
        engine.load_local().unwrap();
        engine.pull().await;

        engine
            .mutate(|s| {
                s.replace_all(vec![item(1, "Milk"), item(2, "")]);
            })
            .unwrap();
        engine.push_now().await;

        let pushes = engine.remote.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].len(), 1);
        assert_eq!(pushes[0][0].name, "Milk");
    }

    #[tokio::test]
    async fn test_push_failure_keeps_pending_changes() {
        let remote = MockRemote {
            push_fails: true,
            ..Default::default()
        };
        let engine = engine_with(remote, true, short_debounce());
        engine.load_local().unwrap();
        engine.pull().await;

        engine.mutate(|s| s.add("Milk", 0.0)).unwrap();
        engine.push_now().await;

        assert!(engine.status().pending_changes);
        assert!(!engine.status().syncing);
    }

    #[tokio::test]
    async fn test_reconnect_pull_follows_policy() {
        for (resync, expected_pulls) in [(true, 1), (false, 0)] {
            let policy = SyncPolicy {
                debounce: Duration::from_millis(50),
                resync_on_reconnect: resync,
            };
            let engine = engine_with(MockRemote::default(), false, policy);
            engine.load_local().unwrap();

            engine.set_online(true).await;

            assert_eq!(
                engine.remote.pull_calls.load(Ordering::SeqCst),
                expected_pulls
            );
        }
    }
}
