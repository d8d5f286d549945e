//! Runs reducer-emitted side effects against the host services.

use leptos::logging;

use crate::{
    popup::place_with,
    reducer::{WorkspaceAction, WorkspaceEffect},
    workspace::FileWorkspace,
};

/// Runs `effects` in order. Timers and fetches are spawned; popup placement is synchronous.
pub(crate) fn run_effects(workspace: &FileWorkspace, effects: Vec<WorkspaceEffect>) {
    for effect in effects {
        run_effect(workspace, effect);
    }
}

fn run_effect(workspace: &FileWorkspace, effect: WorkspaceEffect) {
    match effect {
        WorkspaceEffect::ScheduleSearchDebounce { token, delay_ms } => {
            dispatch_after(
                workspace,
                delay_ms,
                WorkspaceAction::SearchDebounceElapsed { token },
            );
        }
        WorkspaceEffect::ScheduleHoverDebounce { token, delay_ms } => {
            dispatch_after(
                workspace,
                delay_ms,
                WorkspaceAction::HoverDebounceElapsed { token },
            );
        }
        WorkspaceEffect::ScheduleUploadRetire { key, delay_ms } => {
            dispatch_after(workspace, delay_ms, WorkspaceAction::RetireUpload { key });
        }
        WorkspaceEffect::FetchPreview { file_id } => {
            let runtime = workspace.clone();
            workspace.spawn(async move {
                let result = runtime.host().content.fetch_content(&file_id).await;
                if let Err(err) = &result {
                    logging::warn!("preview fetch for `{file_id}` failed: {err}");
                }
                runtime.dispatch(WorkspaceAction::PreviewLoaded { file_id, result });
            });
        }
        WorkspaceEffect::PlacePopup { file_id } => {
            let popup = workspace.config().popup;
            let anchors = &workspace.host().anchors;
            let placement = anchors
                .rect_for(&file_id)
                .map(|rect| place_with(&popup, rect, anchors.viewport_size()));
            if placement.is_none() {
                logging::warn!("no anchor rendered for `{file_id}`; preview opens without a popup");
            }
            workspace.dispatch(WorkspaceAction::PopupPlaced { file_id, placement });
        }
        WorkspaceEffect::RefreshListing => {
            let runtime = workspace.clone();
            workspace.spawn(async move {
                // Failures are logged and queued as events by `refresh`.
                let _ = runtime.refresh().await;
            });
        }
    }
}

// The sleep is created before spawning so the deadline counts from the dispatch that scheduled it.
fn dispatch_after(workspace: &FileWorkspace, delay_ms: u64, action: WorkspaceAction) {
    let sleep = workspace.host().timer.sleep(delay_ms);
    let runtime = workspace.clone();
    workspace.spawn(async move {
        sleep.await;
        runtime.dispatch(action);
    });
}
