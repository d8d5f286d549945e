//! Tunables for the file workspace, persisted as JSON through the host preference store.

use leptos::logging;
use serde::{Deserialize, Serialize};
use workspace_host::{load_pref_with, save_pref_with, PrefsStore};

/// Preference key holding the serialized [`WorkspaceConfig`].
pub const WORKSPACE_CONFIG_KEY: &str = "project-dashboard.file-workspace.config.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry limits for the hover preview popup, in pixels.
pub struct PopupConfig {
    /// Narrowest popup.
    pub min_width: f64,
    /// Widest popup.
    pub max_width: f64,
    /// Preferred popup height.
    pub height: f64,
    /// Gap kept between the popup and both the anchor and the viewport edges.
    pub margin: f64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            min_width: 300.0,
            max_width: 400.0,
            height: 320.0,
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Timing and sizing knobs for one workspace instance.
pub struct WorkspaceConfig {
    /// Quiet period after the last search keystroke before filtering.
    pub search_debounce_ms: u64,
    /// Hover time required before a preview is loaded.
    pub preview_debounce_ms: u64,
    /// Preview line cap.
    pub preview_max_lines: usize,
    /// Maximum cached previews; `None` keeps every preview for the workspace lifetime.
    pub preview_cache_capacity: Option<usize>,
    /// Interval between simulated progress ticks.
    pub progress_tick_ms: u64,
    /// Ceiling for simulated progress while a transfer is in flight.
    pub progress_cap_percent: u8,
    /// How long a completed upload stays visible before it is retired.
    pub completion_display_ms: u64,
    /// Maximum transfers in flight per batch; `None` starts every file at once.
    pub max_concurrent_uploads: Option<usize>,
    /// Popup geometry.
    pub popup: PopupConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            preview_debounce_ms: 300,
            preview_max_lines: 30,
            preview_cache_capacity: None,
            progress_tick_ms: 300,
            progress_cap_percent: 90,
            completion_display_ms: 1_000,
            max_concurrent_uploads: None,
            popup: PopupConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Returns a copy with out-of-range values pulled back into range.
    pub fn sanitized(mut self) -> Self {
        self.progress_cap_percent = self.progress_cap_percent.min(99);
        self.preview_max_lines = self.preview_max_lines.max(1);
        self.progress_tick_ms = self.progress_tick_ms.max(1);
        self.preview_cache_capacity = self.preview_cache_capacity.map(|cap| cap.max(1));
        self.max_concurrent_uploads = self.max_concurrent_uploads.map(|cap| cap.max(1));
        if self.popup.min_width > self.popup.max_width {
            std::mem::swap(&mut self.popup.min_width, &mut self.popup.max_width);
        }
        self
    }
}

/// Loads the persisted config, falling back to defaults when it is missing or unreadable.
pub async fn load_workspace_config<S: PrefsStore + ?Sized>(store: &S) -> WorkspaceConfig {
    match load_pref_with::<_, WorkspaceConfig>(store, WORKSPACE_CONFIG_KEY).await {
        Ok(Some(config)) => config.sanitized(),
        Ok(None) => WorkspaceConfig::default(),
        Err(err) => {
            logging::warn!("file workspace config load failed, using defaults: {err}");
            WorkspaceConfig::default()
        }
    }
}

/// Persists `config`.
///
/// # Errors
///
/// Returns the store's error message when the save fails.
pub async fn save_workspace_config<S: PrefsStore + ?Sized>(
    store: &S,
    config: &WorkspaceConfig,
) -> Result<(), String> {
    save_pref_with(store, WORKSPACE_CONFIG_KEY, config).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use workspace_host::MemoryPrefsStore;

    use super::*;

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(
            WORKSPACE_CONFIG_KEY,
            r#"{"preview_max_lines": 10, "popup": {"margin": 8}}"#,
        );

        let config = block_on(load_workspace_config(&store));
        assert_eq!(config.preview_max_lines, 10);
        assert_eq!(config.popup.margin, 8.0);
        assert_eq!(config.popup.min_width, 300.0);
        assert_eq!(config.search_debounce_ms, 500);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let store = MemoryPrefsStore::default();
        store.insert_raw(WORKSPACE_CONFIG_KEY, "[1, 2");
        assert_eq!(block_on(load_workspace_config(&store)), WorkspaceConfig::default());
    }

    #[test]
    fn saved_config_round_trips_and_is_sanitized_on_load() {
        let store = MemoryPrefsStore::default();
        let config = WorkspaceConfig {
            progress_cap_percent: 150,
            max_concurrent_uploads: Some(0),
            ..WorkspaceConfig::default()
        };
        block_on(save_workspace_config(&store, &config)).expect("save");

        let loaded = block_on(load_workspace_config(&store));
        assert_eq!(loaded.progress_cap_percent, 99);
        assert_eq!(loaded.max_concurrent_uploads, Some(1));
    }
}
