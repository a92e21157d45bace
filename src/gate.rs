//! Feature gate backed by the host settings store.
//!
//! The gate never caches: every key event reads the preference again so a
//! toggle takes effect on the very next press.

use crate::config::SettingsConfig;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the change-notification channel of [`MemorySettings`].
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Host settings collaborator.
pub trait SettingsStore: Send + Sync {
    /// Read a boolean preference, falling back to `default` when never written.
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Persist a boolean preference.
    fn set_bool(&self, key: &str, value: bool);

    /// Whether the host capability the feature relies on (the accessibility
    /// service binding) is currently available.
    fn host_available(&self) -> bool;

    /// Stream of changed keys.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// Key published on the change stream when host availability flips.
pub const HOST_AVAILABILITY_KEY: &str = "host_available";

/// In-process settings store used by the binary and tests.
pub struct MemorySettings {
    values: RwLock<HashMap<String, bool>>,
    host_available: RwLock<bool>,
    changes: broadcast::Sender<String>,
}

impl MemorySettings {
    pub fn new(host_available: bool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(HashMap::new()),
            host_available: RwLock::new(host_available),
            changes,
        }
    }

    pub fn set_host_available(&self, available: bool) {
        *self.host_available.write() = available;
        self.publish(HOST_AVAILABILITY_KEY);
    }

    fn publish(&self, key: &str) {
        // No subscribers is fine.
        let _ = self.changes.send(key.to_string());
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SettingsStore for MemorySettings {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.read().get(key).copied().unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.values.write().insert(key.to_string(), value);
        self.publish(key);
    }

    fn host_available(&self) -> bool {
        *self.host_available.read()
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

/// Decides whether classified actions reach the dispatcher.
#[derive(Clone)]
pub struct FeatureGate {
    store: Arc<dyn SettingsStore>,
    settings: SettingsConfig,
}

impl FeatureGate {
    pub fn new(store: Arc<dyn SettingsStore>, settings: SettingsConfig) -> Self {
        Self { store, settings }
    }

    /// Enabled only when the host capability is present and the preference is on.
    pub fn is_enabled(&self) -> bool {
        self.store.host_available()
            && self
                .store
                .get_bool(&self.settings.enabled_key, self.settings.enabled_default)
    }

    /// Store the user preference. Refused while the host capability is absent.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        if !self.store.host_available() {
            debug!("ignoring page turner toggle: host capability unavailable");
            return false;
        }
        self.store.set_bool(&self.settings.enabled_key, enabled);
        true
    }

    /// Force the preference off when the host capability is gone.
    ///
    /// Returns true when the stored preference was changed.
    pub fn reconcile(&self) -> bool {
        if self.store.host_available() {
            return false;
        }
        let stored = self
            .store
            .get_bool(&self.settings.enabled_key, self.settings.enabled_default);
        if !stored {
            return false;
        }
        info!("host capability unavailable, disabling page turner preference");
        self.store.set_bool(&self.settings.enabled_key, false);
        true
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }
}
