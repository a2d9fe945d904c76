/// UI layout preferences
///
/// Mirrors the session store's lifecycle for the handful of layout choices
/// the client keeps across reloads: the collapsed navigation sidebar and the
/// color theme.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::backend::StorageBackend;

/// Storage namespace for UI preferences
const NAMESPACE: &str = "ui-storage";

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme
    Light,

    /// Dark theme
    Dark,

    /// Follow the platform preference
    System,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::System
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiPrefs {
    sidebar_collapsed: bool,

    #[serde(default)]
    theme: Theme,
}

/// Persisted UI preferences store
pub struct UiPrefsStore {
    prefs: RwLock<UiPrefs>,
    backend: Arc<dyn StorageBackend>,
}

impl UiPrefsStore {
    /// Restores preferences from durable storage (pure deserialize)
    pub fn restore(backend: Arc<dyn StorageBackend>) -> Self {
        let prefs = match backend.load(NAMESPACE) {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding corrupt UI preferences");
                UiPrefs::default()
            }),
            Ok(None) => UiPrefs::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read UI preferences");
                UiPrefs::default()
            }
        };

        Self { prefs: RwLock::new(prefs), backend }
    }

    /// Whether the navigation sidebar is collapsed
    pub fn sidebar_collapsed(&self) -> bool {
        self.prefs.read().unwrap().sidebar_collapsed
    }

    /// Flips the sidebar state and returns the new value
    pub fn toggle_sidebar(&self) -> bool {
        let collapsed = {
            let mut prefs = self.prefs.write().unwrap();
            prefs.sidebar_collapsed = !prefs.sidebar_collapsed;
            prefs.sidebar_collapsed
        };
        self.persist();
        collapsed
    }

    /// Sets the sidebar state
    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.prefs.write().unwrap().sidebar_collapsed = collapsed;
        self.persist();
    }

    /// Current theme preference
    pub fn theme(&self) -> Theme {
        self.prefs.read().unwrap().theme
    }

    /// Sets the theme preference
    pub fn set_theme(&self, theme: Theme) {
        self.prefs.write().unwrap().theme = theme;
        self.persist();
    }

    fn persist(&self) {
        let prefs = self.prefs.read().unwrap().clone();
        match serde_json::to_string(&prefs) {
            Ok(payload) => {
                if let Err(err) = self.backend.save(NAMESPACE, &payload) {
                    tracing::warn!(error = %err, "failed to persist UI preferences");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize UI preferences"),
        }
    }
}
