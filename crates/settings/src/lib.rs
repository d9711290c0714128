//! # Settings
//!
//! Editor preferences as the scheme generator sees them: a `get`/`set`/`save`
//! port, a JSONC file backed implementation with a defaults layer under the
//! user layer, and change notification that can be paused.

pub mod layer;
pub mod watcher;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::RwLock;
use serde_json::Value;

pub use layer::{LayerPriority, SettingsLayer, parse_jsonc};
pub use watcher::{PauseGuard, PrefsWatcher};

/// Key of the active color scheme, a `Packages/...` resource path
pub const COLOR_SCHEME: &str = "color_scheme";

/// File name of the user's editor preferences
pub const PREFERENCES_FILE: &str = "Preferences.sublime-settings";

/// Host preferences
pub trait Preferences: Send + Sync {
    /// Get a setting value
    fn get(&self, key: &str) -> Option<Value>;

    /// Set a setting in memory
    fn set(&self, key: &str, value: Value);

    /// Persist settings
    fn save(&self) -> anyhow::Result<()>;

    /// Re-read settings from their backing store.
    ///
    /// An error means the store exists but cannot be used.
    fn reload(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Get a string setting
    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }
}

/// Preferences backed by a `Preferences.sublime-settings` file
pub struct FilePreferences {
    path: PathBuf,
    /// Settings layers (in priority order)
    layers: RwLock<Vec<SettingsLayer>>,
    watcher: Arc<PrefsWatcher>,
}

impl FilePreferences {
    /// Preferences for `path`, nothing loaded yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layers: RwLock::new(vec![
                SettingsLayer::new(LayerPriority::Default),
                SettingsLayer::new(LayerPriority::User),
            ]),
            watcher: Arc::new(PrefsWatcher::new()),
        }
    }

    /// Preferences for `path`, loaded
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let prefs = Self::new(path);
        prefs.reload()?;
        Ok(prefs)
    }

    /// Replace the defaults layer
    pub fn with_defaults(self, mut defaults: SettingsLayer) -> Self {
        defaults.priority = LayerPriority::Default;
        self.replace_layer(defaults);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn watcher(&self) -> &Arc<PrefsWatcher> {
        &self.watcher
    }

    fn replace_layer(&self, layer: SettingsLayer) {
        let mut layers = self.layers.write();
        layers.retain(|l| l.priority != layer.priority);
        layers.push(layer);
        layers.sort_by_key(|l| l.priority);
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<Value> {
        // Search layers in reverse priority order
        self.layers
            .read()
            .iter()
            .rev()
            .find_map(|layer| layer.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) {
        {
            let mut layers = self.layers.write();
            if let Some(user) = layers.iter_mut().find(|l| l.priority == LayerPriority::User) {
                user.set(key, value.clone());
            }
        }
        self.watcher.notify(key, &value);
    }

    fn save(&self) -> anyhow::Result<()> {
        let layers = self.layers.read();
        if let Some(user) = layers.iter().find(|l| l.priority == LayerPriority::User) {
            user.save(&self.path)?;
            tracing::debug!("Saved preferences to {}", self.path.display());
        }
        Ok(())
    }

    fn reload(&self) -> anyhow::Result<()> {
        let layer = if self.path.is_file() {
            SettingsLayer::from_file(&self.path, LayerPriority::User).map_err(|e| {
                anyhow::anyhow!("{} invalid: {}", self.path.display(), e)
            })?
        } else {
            SettingsLayer::new(LayerPriority::User)
        };
        self.replace_layer(layer);
        Ok(())
    }
}
