// Shared state module
//
// Holds the only state shared between the menu thread and the dispatcher:
// the configured path triple, the process-wide shutdown flag and the lock
// that keeps path entry and dispatch-time snapshots apart.

use crate::models::{ConfigSnapshot, Configuration, PathField, Settings};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Thread-safe holder of the three configured input paths
///
/// Every write and every snapshot goes through the same exclusive lock, so a
/// snapshot either entirely precedes or entirely follows any [`set`](Self::set).
///
/// Cloning is cheap and shares the underlying configuration.
#[derive(Clone, Default)]
pub struct ConfigStore {
    config: Arc<Mutex<Configuration>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the initial paths from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let store = Self::new();
        store.seed_from(settings);
        store
    }

    /// Copy any non-empty initial paths from `settings` into the store
    pub fn seed_from(&self, settings: &Settings) {
        let mut config = self.lock();
        for (field, value) in [
            (PathField::Text, &settings.text_path),
            (PathField::Lexicon, &settings.lexicon_path),
            (PathField::Stopwords, &settings.stopword_path),
        ] {
            if !value.is_empty() {
                config.set(field, value.clone());
            }
        }

        tracing::info!(
            "Seeded configuration: text={}, lexicon={}, stopwords={}",
            !config.text_path.is_empty(),
            !config.lexicon_path.is_empty(),
            !config.stopword_path.is_empty()
        );
    }

    /// Replace one path. An empty value marks the field as unset.
    pub fn set(&self, field: PathField, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!("Setting {} to {:?}", field, value);
        self.lock().set(field, value);
    }

    pub fn get(&self, field: PathField) -> String {
        self.lock().get(field).to_string()
    }

    /// Read all three paths together
    pub fn snapshot(&self) -> ConfigSnapshot {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave the triple half-written:
    // every mutation is a single field assignment.
    fn lock(&self) -> MutexGuard<'_, Configuration> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide shutdown flag observed by the menu loop and the dispatcher
///
/// Backed by a `tokio::sync::watch` channel so async code can await the
/// transition while the blocking menu thread simply polls it.
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            tracing::info!("Shutdown requested");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Resolves once shutdown has been requested.
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        // Only fails if the sender is dropped, and `self` holds it
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock held by the menu while the operator types a path
///
/// Under dispatch-time snapshots the dispatcher takes it too, so a snapshot is
/// never taken while a path entry is half-way through. Error reporting never
/// takes this lock.
pub type InputLock = Arc<tokio::sync::Mutex<()>>;

pub fn input_lock() -> InputLock {
    Arc::new(tokio::sync::Mutex::new(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ConfigStore::new();
        let snapshot = store.snapshot();

        assert!(!snapshot.is_complete());
        assert_eq!(snapshot.missing_fields().len(), 3);
    }

    #[test]
    fn test_set_and_snapshot() {
        let store = ConfigStore::new();
        store.set(PathField::Text, "tweets.txt");
        store.set(PathField::Lexicon, "lexicon.txt");
        store.set(PathField::Stopwords, "stop.txt");

        let snapshot = store.snapshot();
        assert!(snapshot.is_complete());
        assert_eq!(snapshot.lexicon_path, "lexicon.txt");
        assert_eq!(store.get(PathField::Stopwords), "stop.txt");
    }

    #[test]
    fn test_clone_shares_configuration() {
        let store1 = ConfigStore::new();
        let store2 = store1.clone();

        store1.set(PathField::Text, "a.txt");
        assert_eq!(store2.get(PathField::Text), "a.txt");
    }

    #[test]
    fn test_seed_from_settings_skips_empty_values() {
        let settings = Settings {
            text_path: "tweets.txt".to_string(),
            ..Settings::default()
        };
        let store = ConfigStore::new();
        store.set(PathField::Lexicon, "kept.txt");
        store.seed_from(&settings);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.text_path, "tweets.txt");
        assert_eq!(snapshot.lexicon_path, "kept.txt");
        assert!(snapshot.stopword_path.is_empty());
    }

    #[test]
    fn test_store_survives_poisoned_lock() {
        let store = ConfigStore::new();
        let poisoner = store.clone();

        let _ = std::thread::spawn(move || {
            let _guard = poisoner.config.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        store.set(PathField::Text, "after.txt");
        assert_eq!(store.get(PathField::Text), "after.txt");
    }

    #[test]
    fn test_shutdown_signal_is_shared() {
        let signal = ShutdownSignal::new();
        let observer = signal.clone();
        assert!(!observer.is_triggered());

        signal.trigger();
        signal.trigger();
        assert!(observer.is_triggered());
    }

    #[tokio::test]
    async fn test_shutdown_wait_resolves() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(std::time::Duration::from_secs(1), signal.wait())
            .await
            .expect("shutdown was never observed");
    }
}
