//! The file workspace runtime handle.
//!
//! A [`FileWorkspace`] owns one [`WorkspaceState`] and mutates it only through
//! [`reduce_workspace`]. Timers, transfers and fetches run as tasks on the host spawner and feed
//! their results back as actions, so every change is applied to the state current at that moment.

use std::{cell::RefCell, collections::BTreeMap, future::Future, rc::Rc};

use futures::{
    future::{join_all, select, Either},
    stream::{self, StreamExt},
    task::LocalSpawnExt,
};
use leptos::logging;
use serde::{Deserialize, Serialize};
use workspace_host::{FileKind, HostServices, ListFilters, ProjectStats, UploadBlob};

use crate::{
    config::{load_workspace_config, save_workspace_config, WorkspaceConfig},
    effect_executor,
    error::WorkspaceError,
    model::{
        FileEntry, PopupPlacement, PreviewPhase, PreviewView, SortField, SortOrder, SortSpec,
        UploadPhase, WorkspaceEvent, WorkspaceState,
    },
    progress::{ProgressEstimator, SimulatedProgress},
    reducer::{reduce_workspace, WorkspaceAction},
    registry::{assign_upload_keys, visible_entries},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One rejected file of an upload batch.
pub struct UploadFailure {
    /// Progress-map key of the file.
    pub key: String,
    /// Backend message.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of [`FileWorkspace::upload_batch`]. Every file lands in exactly one list.
pub struct UploadBatchReport {
    /// Keys of files the backend accepted, in submission order.
    pub succeeded: Vec<String>,
    /// Rejected files, in submission order.
    pub failed: Vec<UploadFailure>,
}

impl UploadBatchReport {
    /// Number of files in the batch.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

#[derive(Clone)]
/// Shared handle to one workspace instance. Clones observe and mutate the same state.
pub struct FileWorkspace {
    state: Rc<RefCell<WorkspaceState>>,
    host: HostServices,
    progress: Rc<dyn ProgressEstimator>,
}

impl FileWorkspace {
    /// Builds a workspace with `config` and pseudo-random progress estimation.
    pub fn new(host: HostServices, config: WorkspaceConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(WorkspaceState::new(config.sanitized()))),
            host,
            progress: Rc::new(SimulatedProgress::default()),
        }
    }

    /// Builds a workspace with the config persisted in the host preference store.
    pub async fn boot(host: HostServices) -> Self {
        let config = load_workspace_config(host.prefs.as_ref()).await;
        Self::new(host, config)
    }

    /// Replaces the progress estimator used by later uploads.
    pub fn with_progress_estimator(mut self, progress: Rc<dyn ProgressEstimator>) -> Self {
        self.progress = progress;
        self
    }

    pub(crate) fn host(&self) -> &HostServices {
        &self.host
    }

    pub(crate) fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.host.spawner.spawn_local(task) {
            logging::warn!("file workspace task spawn failed: {err:?}");
        }
    }

    /// Applies `action` and runs the effects it produced.
    ///
    /// Reducer errors are logged and the action is dropped.
    pub fn dispatch(&self, action: WorkspaceAction) {
        let now_ms = self.host.timer.now_ms();
        let result = {
            let mut state = self.state.borrow_mut();
            reduce_workspace(&mut state, action, now_ms)
        };
        match result {
            Ok(effects) => effect_executor::run_effects(self, effects),
            Err(err) => logging::warn!("file workspace reducer error: {err}"),
        }
    }

    /// Copy of the full state.
    pub fn snapshot(&self) -> WorkspaceState {
        self.state.borrow().clone()
    }

    /// Active configuration.
    pub fn config(&self) -> WorkspaceConfig {
        self.state.borrow().config.clone()
    }

    /// Persists the active configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Config`] when the preference store rejects the write.
    pub async fn save_config(&self) -> Result<(), WorkspaceError> {
        let config = self.config();
        save_workspace_config(self.host.prefs.as_ref(), &config)
            .await
            .map_err(|err| {
                logging::warn!("file workspace config save failed: {err}");
                WorkspaceError::Config(err)
            })
    }

    /// Current folder.
    pub fn folder(&self) -> String {
        self.state.borrow().registry.folder.clone()
    }

    /// Entries to render, filtered by kind and the applied search term, then sorted.
    pub fn visible_entries(&self) -> Vec<FileEntry> {
        visible_entries(&self.state.borrow().registry)
    }

    /// Progress per active upload key.
    pub fn progress_map(&self) -> BTreeMap<String, u8> {
        self.state.borrow().progress_map()
    }

    /// Phase of an active upload.
    pub fn upload_phase(&self, key: &str) -> Option<UploadPhase> {
        self.state.borrow().uploads.tasks.get(key).map(|task| task.phase)
    }

    pub fn preview_phase(&self) -> PreviewPhase {
        self.state.borrow().preview_phase()
    }

    pub fn preview_view(&self) -> Option<PreviewView> {
        self.state.borrow().preview_view()
    }

    pub fn popup(&self) -> Option<PopupPlacement> {
        self.state.borrow().preview.popup
    }

    /// Drains queued notifications.
    pub fn take_events(&self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.state.borrow_mut().events)
    }

    pub fn set_search_input(&self, text: impl Into<String>) {
        self.dispatch(WorkspaceAction::SearchInput { text: text.into() });
    }

    /// Changes the kind filter; a change re-lists the current folder.
    pub fn set_kind_filter(&self, kind: Option<FileKind>) {
        self.dispatch(WorkspaceAction::SetKindFilter { kind });
    }

    pub fn sort(&self, field: SortField, order: SortOrder) {
        self.dispatch(WorkspaceAction::SetSort {
            sort: SortSpec { field, order },
        });
    }

    /// Switches folders. The listing stays empty until [`Self::refresh`].
    pub fn navigate(&self, folder: impl Into<String>) {
        self.dispatch(WorkspaceAction::NavigateFolder {
            folder: folder.into(),
        });
    }

    pub fn hover_enter(&self, file_id: impl Into<String>) {
        self.dispatch(WorkspaceAction::HoverEnter {
            file_id: file_id.into(),
        });
    }

    pub fn hover_leave(&self) {
        self.dispatch(WorkspaceAction::HoverLeave);
    }

    pub fn invalidate_preview(&self, file_id: impl Into<String>) {
        self.dispatch(WorkspaceAction::InvalidatePreview {
            file_id: file_id.into(),
        });
    }

    pub fn clear_previews(&self) {
        self.dispatch(WorkspaceAction::ClearPreviews);
    }

    fn storage_error(op: &'static str, message: String) -> WorkspaceError {
        logging::warn!("file workspace {op} failed: {message}");
        WorkspaceError::Storage { op, message }
    }

    /// Re-lists the current folder with the current kind filter.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the listing fails. The previous entries stay in
    /// place and a [`WorkspaceEvent::ListingFailed`] is queued.
    pub async fn refresh(&self) -> Result<(), WorkspaceError> {
        let (folder, kind) = {
            let state = self.state.borrow();
            (state.registry.folder.clone(), state.registry.kind_filter)
        };
        self.dispatch(WorkspaceAction::ListingRequested {
            folder: folder.clone(),
            kind,
        });
        match self.host.storage.list(&folder, &ListFilters { kind }).await {
            Ok(records) => {
                self.dispatch(WorkspaceAction::ListingLoaded {
                    folder,
                    kind,
                    records,
                });
                Ok(())
            }
            Err(message) => {
                self.dispatch(WorkspaceAction::ListingFailed {
                    folder,
                    message: message.clone(),
                });
                Err(Self::storage_error("list", message))
            }
        }
    }

    /// Lists `folder` with `filters` and returns the visible entries.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the listing fails.
    pub async fn list(
        &self,
        folder: &str,
        filters: &ListFilters,
    ) -> Result<Vec<FileEntry>, WorkspaceError> {
        self.dispatch(WorkspaceAction::ListingRequested {
            folder: folder.to_string(),
            kind: filters.kind,
        });
        self.refresh().await?;
        Ok(self.visible_entries())
    }

    /// Creates a folder inside the current folder. Call [`Self::refresh`] to see it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the backend rejects the folder.
    pub async fn create_folder(&self, name: &str) -> Result<(), WorkspaceError> {
        let parent = self.folder();
        self.host
            .storage
            .create_folder(name, &parent)
            .await
            .map_err(|message| Self::storage_error("create folder", message))
    }

    /// Deletes a file or folder row. Call [`Self::refresh`] to see the change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the backend rejects the delete.
    pub async fn delete(&self, file_id: &str) -> Result<(), WorkspaceError> {
        self.host
            .storage
            .delete(file_id)
            .await
            .map_err(|message| Self::storage_error("delete", message))
    }

    /// Downloads a file's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the download fails.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, WorkspaceError> {
        self.host
            .storage
            .download(file_id)
            .await
            .map_err(|message| Self::storage_error("download", message))
    }

    /// Aggregate storage statistics for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Storage`] when the backend cannot report statistics.
    pub async fn stats(&self, project_id: &str) -> Result<ProjectStats, WorkspaceError> {
        self.host
            .storage
            .stats(project_id)
            .await
            .map_err(|message| Self::storage_error("stats", message))
    }

    /// Uploads `files` into the current folder, each file independently.
    ///
    /// Resolves once every file succeeded or failed. A failure never affects its siblings. When the
    /// batch settles the listing is refreshed and the input-reset event is queued.
    pub async fn upload_batch(&self, files: Vec<UploadBlob>) -> UploadBatchReport {
        if files.is_empty() {
            return UploadBatchReport::default();
        }

        let keys = {
            let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
            assign_upload_keys(&self.state.borrow().uploads, &names)
        };
        self.dispatch(WorkspaceAction::QueueUploads {
            uploads: keys
                .iter()
                .cloned()
                .zip(files.iter().map(|file| file.name.clone()))
                .collect(),
        });

        let folder = self.folder();
        let limit = self.config().max_concurrent_uploads;
        let transfers = keys
            .into_iter()
            .zip(files)
            .enumerate()
            .map(|(index, (key, blob))| {
                let upload = self.run_upload(folder.clone(), key, blob);
                async move { (index, upload.await) }
            });
        // A slot frees as soon as any transfer settles, so outcomes arrive out of order.
        let mut outcomes: Vec<(usize, (String, Result<(), String>))> = match limit {
            Some(limit) => stream::iter(transfers).buffer_unordered(limit).collect().await,
            None => join_all(transfers).await,
        };
        outcomes.sort_by_key(|(index, _)| *index);

        let mut report = UploadBatchReport::default();
        for (_, (key, outcome)) in outcomes {
            match outcome {
                Ok(()) => report.succeeded.push(key),
                Err(message) => report.failed.push(UploadFailure { key, message }),
            }
        }
        logging::log!(
            "upload batch settled: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        self.dispatch(WorkspaceAction::UploadBatchSettled {
            succeeded: report.succeeded.len(),
            failed: report.failed.len(),
        });
        report
    }

    async fn run_upload(
        &self,
        folder: String,
        key: String,
        blob: UploadBlob,
    ) -> (String, Result<(), String>) {
        self.dispatch(WorkspaceAction::TransferStarted { key: key.clone() });

        let transfer = self.host.storage.upload(&folder, &blob);
        let progress = Box::pin(self.simulate_progress(&key));
        let outcome = match select(transfer, progress).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right(((), transfer)) => transfer.await,
        };

        match &outcome {
            Ok(()) => self.dispatch(WorkspaceAction::TransferSucceeded { key: key.clone() }),
            Err(message) => {
                logging::warn!("upload `{key}` failed: {message}");
                self.dispatch(WorkspaceAction::TransferFailed {
                    key: key.clone(),
                    message: message.clone(),
                });
            }
        }
        (key, outcome)
    }

    // Ticks until the task leaves `uploading` or reaches the cap; dropped when the transfer settles.
    async fn simulate_progress(&self, key: &str) {
        if !self.progress.is_enabled() {
            return;
        }
        let config = self.config();
        loop {
            self.host.timer.sleep(config.progress_tick_ms).await;
            let current = match self.state.borrow().uploads.tasks.get(key) {
                Some(task) if task.phase == UploadPhase::Uploading => task.progress_percent,
                _ => return,
            };
            if current >= config.progress_cap_percent {
                return;
            }
            let increment = self.progress.next_increment(current);
            self.dispatch(WorkspaceAction::ProgressTick {
                key: key.to_string(),
                increment,
            });
        }
    }
}
