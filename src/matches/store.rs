use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::task::JoinHandle;

use super::error::{Result, StoreError};
use super::model::MatchViewItem;

// Writes replace the whole value under a key; whichever write finishes last wins.
pub trait MatchStore: Send + Sync + 'static {
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    fn save(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Default)]
pub struct MemoryMatchStore {
    blobs: Mutex<HashMap<String, Value>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryMatchStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let blobs = self.blobs.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        let mut blobs = self.blobs.lock().map_err(|_| StoreError::Poisoned)?;
        blobs.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use self::plugin::{ConfiguredMatchStore, PluginMatchStore};

#[cfg(feature = "desktop")]
mod plugin {
    use std::sync::Arc;

    use serde_json::Value;
    use tauri::{AppHandle, Runtime};
    use tauri_plugin_store::{Store, StoreExt};

    use super::{MatchStore, MemoryMatchStore};
    use crate::matches::error::Result;

    pub struct PluginMatchStore<R: Runtime> {
        store: Arc<Store<R>>,
    }

    impl<R: Runtime> PluginMatchStore<R> {
        pub fn open(app_handle: &AppHandle<R>, file_name: &str) -> Result<Self> {
            let store = app_handle.store(file_name)?;
            Ok(Self { store })
        }
    }

    impl<R: Runtime> MatchStore for PluginMatchStore<R> {
        async fn load(&self, key: &str) -> Result<Option<Value>> {
            Ok(self.store.get(key))
        }

        async fn save(&self, key: &str, value: Value) -> Result<()> {
            self.store.set(key, value);
            self.store.save()?;
            Ok(())
        }
    }

    pub enum ConfiguredMatchStore<R: Runtime> {
        Plugin(PluginMatchStore<R>),
        Memory(MemoryMatchStore),
    }

    impl<R: Runtime> MatchStore for ConfiguredMatchStore<R> {
        async fn load(&self, key: &str) -> Result<Option<Value>> {
            match self {
                Self::Plugin(store) => store.load(key).await,
                Self::Memory(store) => store.load(key).await,
            }
        }

        async fn save(&self, key: &str, value: Value) -> Result<()> {
            match self {
                Self::Plugin(store) => store.save(key, value).await,
                Self::Memory(store) => store.save(key, value).await,
            }
        }
    }
}

/// A missing, null, or undecodable blob yields an empty list.
pub async fn load_matches<S: MatchStore>(store: &S, key: &str) -> Vec<MatchViewItem> {
    let stored = match store.load(key).await {
        Ok(Some(stored)) => stored,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(store_key = key, error = %error, "Failed to read persisted matches");
            return Vec::new();
        }
    };

    if stored.is_null() {
        return Vec::new();
    }

    match serde_json::from_value::<Vec<MatchViewItem>>(stored) {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(store_key = key, error = %error, "Discarding unreadable persisted matches");
            Vec::new()
        }
    }
}

pub struct PersistenceBridge<S> {
    store: Arc<S>,
    key: String,
    in_flight: Vec<JoinHandle<()>>,
}

impl<S: MatchStore> PersistenceBridge<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            key: key.into(),
            in_flight: Vec::new(),
        }
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Vec<MatchViewItem> {
        load_matches(self.store.as_ref(), &self.key).await
    }

    /// Writes the full list in a background task and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn save(&mut self, items: &[MatchViewItem]) {
        self.in_flight.retain(|handle| !handle.is_finished());

        let value = match serde_json::to_value(items) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(error = %error, "Failed to encode match list for persistence");
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let item_count = items.len();
        let handle = tokio::spawn(async move {
            if let Err(error) = store.save(&key, value).await {
                tracing::warn!(
                    store_key = %key,
                    item_count,
                    error = %error,
                    "Failed to persist match list"
                );
            }
        });

        self.in_flight.push(handle);
    }

    pub async fn flush(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(error) = handle.await {
                tracing::warn!(error = %error, "Match list save task did not complete");
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}
