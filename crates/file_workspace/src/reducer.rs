//! Reducer actions, side-effect intents, and transition logic for the file workspace.

mod preview;
mod registry;
mod uploads;

use thiserror::Error;
use workspace_host::{FileKind, FileRecord};

use crate::model::{PopupPlacement, SortSpec, UploadPhase, WorkspaceState};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_workspace`] to mutate [`WorkspaceState`].
pub enum WorkspaceAction {
    /// Change the current folder. The listing is cleared until the next refresh.
    NavigateFolder {
        /// Target folder; normalized before use.
        folder: String,
    },
    /// A listing request for `folder` filtered by `kind` is about to be sent.
    ListingRequested {
        /// Folder being listed.
        folder: String,
        /// Kind filter sent with the request.
        kind: Option<FileKind>,
    },
    /// The backend answered a listing request.
    ListingLoaded {
        /// Folder the request was sent for.
        folder: String,
        /// Kind filter the request was sent with.
        kind: Option<FileKind>,
        /// Raw rows.
        records: Vec<FileRecord>,
    },
    /// A listing request failed.
    ListingFailed {
        /// Folder the request was sent for.
        folder: String,
        /// Backend message.
        message: String,
    },
    /// Restrict the list to one detected kind, or clear the restriction.
    SetKindFilter {
        /// Kind to keep.
        kind: Option<FileKind>,
    },
    /// Search text changed. Filtering waits for the debounce.
    SearchInput {
        /// Text as typed.
        text: String,
    },
    /// A search debounce timer fired.
    SearchDebounceElapsed {
        /// Token the timer was scheduled with.
        token: u64,
    },
    /// Change the sort field and order.
    SetSort {
        /// New sort.
        sort: SortSpec,
    },
    /// Register a batch of uploads as queued.
    QueueUploads {
        /// `(key, file name)` pairs, keys already disambiguated.
        uploads: Vec<(String, String)>,
    },
    /// The transfer for `key` has been handed to storage.
    TransferStarted {
        /// Upload key.
        key: String,
    },
    /// Simulated progress step.
    ProgressTick {
        /// Upload key.
        key: String,
        /// Percentage points to add.
        increment: u8,
    },
    /// Storage accepted the upload.
    TransferSucceeded {
        /// Upload key.
        key: String,
    },
    /// Storage rejected the upload.
    TransferFailed {
        /// Upload key.
        key: String,
        /// Backend message.
        message: String,
    },
    /// The completion display delay for `key` elapsed.
    RetireUpload {
        /// Upload key.
        key: String,
    },
    /// Every task in a batch reached a terminal phase.
    UploadBatchSettled {
        /// Successful transfers.
        succeeded: usize,
        /// Failed transfers.
        failed: usize,
    },
    /// Pointer entered a file row.
    HoverEnter {
        /// Hovered file.
        file_id: String,
    },
    /// Pointer left the hovered row.
    HoverLeave,
    /// A hover debounce timer fired.
    HoverDebounceElapsed {
        /// Token the timer was scheduled with.
        token: u64,
    },
    /// A content fetch finished.
    PreviewLoaded {
        /// Fetched file.
        file_id: String,
        /// Raw text or the failure message.
        result: Result<String, String>,
    },
    /// Popup geometry resolved for an opened preview. `None` when the row has no anchor.
    PopupPlaced {
        /// File the popup belongs to.
        file_id: String,
        /// Computed placement.
        placement: Option<PopupPlacement>,
    },
    /// Drop one cached preview.
    InvalidatePreview {
        /// File whose preview is dropped.
        file_id: String,
    },
    /// Drop every cached preview.
    ClearPreviews,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_workspace`] for the effect executor to run.
pub enum WorkspaceEffect {
    /// Dispatch [`WorkspaceAction::SearchDebounceElapsed`] after `delay_ms`.
    ScheduleSearchDebounce {
        /// Token to echo back.
        token: u64,
        /// Delay before firing.
        delay_ms: u64,
    },
    /// Dispatch [`WorkspaceAction::HoverDebounceElapsed`] after `delay_ms`.
    ScheduleHoverDebounce {
        /// Token to echo back.
        token: u64,
        /// Delay before firing.
        delay_ms: u64,
    },
    /// Fetch preview content for a file.
    FetchPreview {
        /// File to fetch.
        file_id: String,
    },
    /// Compute popup geometry for the opened preview.
    PlacePopup {
        /// File whose row anchors the popup.
        file_id: String,
    },
    /// Dispatch [`WorkspaceAction::RetireUpload`] after `delay_ms`.
    ScheduleUploadRetire {
        /// Upload key.
        key: String,
        /// Delay before retiring.
        delay_ms: u64,
    },
    /// Re-list the current folder.
    RefreshListing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Reducer failures for actions that do not fit the current state.
pub enum ReducerError {
    /// The action names an upload key with no active task.
    #[error("upload `{0}` not found")]
    UnknownUpload(String),
    /// A queued upload reused a key that is still active.
    #[error("upload `{0}` is already active")]
    DuplicateUpload(String),
    /// The upload state machine does not allow this move.
    #[error("upload `{key}` cannot move from {from} to {to}")]
    InvalidUploadTransition {
        /// Upload key.
        key: String,
        /// Current phase.
        from: UploadPhase,
        /// Requested phase.
        to: UploadPhase,
    },
}

/// Applies a [`WorkspaceAction`] to the workspace state and collects resulting side effects.
///
/// `now_ms` is the host clock reading used for timestamps recorded by this transition.
///
/// # Errors
///
/// Returns a [`ReducerError`] when an upload action references a missing task, reuses an active
/// key, or would move a task backwards through its phases. The state is left untouched in that
/// case.
pub fn reduce_workspace(
    state: &mut WorkspaceState,
    action: WorkspaceAction,
    now_ms: u64,
) -> Result<Vec<WorkspaceEffect>, ReducerError> {
    let mut effects = Vec::new();
    let handled = registry::reduce_registry_action(state, &action, &mut effects)?
        || uploads::reduce_upload_action(state, &action, now_ms, &mut effects)?
        || preview::reduce_preview_action(state, &action, now_ms, &mut effects)?;
    debug_assert!(handled, "unrouted workspace action: {action:?}");
    Ok(effects)
}
