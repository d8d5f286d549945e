//! Host service bundle injected into the file workspace runtime.

use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::{
    AnchorLocator, ContentService, NoopAnchorLocator, NoopContentService,
    NoopProjectStorageService, NoopPrefsStore, PrefsStore, ProjectStorageService, TimerService,
};

/// Runtime-selected collaborators for one file workspace.
///
/// Everything environment-specific is chosen before this bundle reaches the runtime, so the
/// runtime never branches on which backend, timer or executor is active.
#[derive(Clone)]
pub struct HostServices {
    /// Remote project storage.
    pub storage: Rc<dyn ProjectStorageService>,
    /// File-content reads for previews.
    pub content: Rc<dyn ContentService>,
    /// Row geometry lookups for popup placement.
    pub anchors: Rc<dyn AnchorLocator>,
    /// Clock and sleep primitive for debounces and progress ticks.
    pub timer: Rc<dyn TimerService>,
    /// Persisted workspace preferences.
    pub prefs: Rc<dyn PrefsStore>,
    /// Single-threaded executor that background work is spawned onto.
    pub spawner: Rc<dyn LocalSpawn>,
}

impl HostServices {
    /// Bundle with no backend: listings are empty, mutations and previews fail.
    pub fn noop(timer: Rc<dyn TimerService>, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self {
            storage: Rc::new(NoopProjectStorageService),
            content: Rc::new(NoopContentService),
            anchors: Rc::new(NoopAnchorLocator),
            timer,
            prefs: Rc::new(NoopPrefsStore),
            spawner,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::{block_on, LocalPool};

    use super::*;
    use crate::{ListFilters, ManualTimer};

    #[test]
    fn noop_bundle_lists_nothing_and_has_no_anchors() {
        let pool = LocalPool::new();
        let host = HostServices::noop(Rc::new(ManualTimer::default()), Rc::new(pool.spawner()));

        let rows = block_on(host.storage.list("/", &ListFilters::default())).expect("list");
        assert!(rows.is_empty());
        assert!(host.anchors.rect_for("f-1").is_none());
        assert!(block_on(host.content.fetch_content("f-1")).is_err());
        assert_eq!(host.timer.now_ms(), 0);
    }
}
