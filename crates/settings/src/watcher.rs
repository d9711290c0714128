//! Preference change notification

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use serde_json::Value;

type Listener = Box<dyn Fn(&str, &Value) + Send + Sync>;

/// Dispatches preference changes to registered listeners.
///
/// Dispatch can be paused. While any [`PauseGuard`] is alive, changes are
/// dropped instead of delivered; dropping the last guard re-arms dispatch.
#[derive(Default)]
pub struct PrefsWatcher {
    listeners: RwLock<Vec<Listener>>,
    paused: Arc<AtomicUsize>,
}

impl PrefsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add change listener
    pub fn on_change(&self, listener: impl Fn(&str, &Value) + Send + Sync + 'static) {
        self.listeners.write().push(Box::new(listener));
    }

    /// Deliver a change. Returns false when dropped because dispatch is paused.
    pub fn notify(&self, key: &str, value: &Value) -> bool {
        if self.is_paused() {
            tracing::debug!("Preference change to {} ignored while paused", key);
            return false;
        }

        for listener in self.listeners.read().iter() {
            listener(key, value);
        }
        true
    }

    /// Stop delivering changes until the returned guard is dropped
    pub fn pause(&self) -> PauseGuard {
        self.paused.fetch_add(1, Ordering::SeqCst);
        PauseGuard {
            paused: Arc::clone(&self.paused),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst) > 0
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

/// Keeps a [`PrefsWatcher`] paused. `Send`, so it can move into a task.
#[must_use = "dispatch resumes as soon as the guard is dropped"]
pub struct PauseGuard {
    paused: Arc<AtomicUsize>,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.paused.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_drops_changes() {
        let watcher = PrefsWatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        watcher.on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(watcher.notify("color_scheme", &Value::from("a")));

        let guard = watcher.pause();
        assert!(!watcher.notify("color_scheme", &Value::from("b")));
        drop(guard);

        assert!(watcher.notify("color_scheme", &Value::from("c")));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nested_pauses() {
        let watcher = PrefsWatcher::new();
        let outer = watcher.pause();
        let inner = watcher.pause();
        drop(outer);
        assert!(watcher.is_paused());
        drop(inner);
        assert!(!watcher.is_paused());
    }
}
