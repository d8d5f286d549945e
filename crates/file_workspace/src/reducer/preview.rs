//! Reducer helpers for the hover preview state machine and its cache.

use crate::{
    language::language_for_file_name,
    model::{HoverState, PreviewEntry, PreviewStatus, WorkspaceState},
    reducer::{ReducerError, WorkspaceAction, WorkspaceEffect},
    snippet::truncate_lines,
};

fn close_popup(state: &mut WorkspaceState) {
    state.preview.hover = HoverState::Idle;
    state.preview.popup = None;
}

fn close_if_open_on(state: &mut WorkspaceState, file_id: &str) {
    if matches!(&state.preview.hover, HoverState::Open { file_id: open } if open == file_id) {
        close_popup(state);
    }
}

// Loading entries are never evicted so their fetch completion still has a target.
fn evict_over_capacity(state: &mut WorkspaceState, keep: &str) {
    let Some(capacity) = state.config.preview_cache_capacity else {
        return;
    };
    while state.preview.entries.len() > capacity {
        let victim = state
            .preview
            .entries
            .values()
            .filter(|entry| entry.file_id != keep && entry.status != PreviewStatus::Loading)
            .min_by_key(|entry| entry.last_accessed_ms)
            .map(|entry| entry.file_id.clone());
        match victim {
            Some(file_id) => {
                state.preview.entries.remove(&file_id);
            }
            None => break,
        }
    }
}

fn open_preview(
    state: &mut WorkspaceState,
    file_id: String,
    now_ms: u64,
    effects: &mut Vec<WorkspaceEffect>,
) {
    if let Some(entry) = state.preview.entries.get_mut(&file_id) {
        entry.last_accessed_ms = now_ms;
    } else {
        let file_name = state
            .entry(&file_id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| file_id.clone());
        let language = language_for_file_name(&file_name).to_string();
        state.preview.entries.insert(
            file_id.clone(),
            PreviewEntry {
                file_id: file_id.clone(),
                file_name,
                content: String::new(),
                language,
                truncated: false,
                status: PreviewStatus::Loading,
                error: None,
                last_accessed_ms: now_ms,
            },
        );
        evict_over_capacity(state, &file_id);
        effects.push(WorkspaceEffect::FetchPreview {
            file_id: file_id.clone(),
        });
    }
    effects.push(WorkspaceEffect::PlacePopup {
        file_id: file_id.clone(),
    });
    state.preview.hover = HoverState::Open { file_id };
}

pub(super) fn reduce_preview_action(
    state: &mut WorkspaceState,
    action: &WorkspaceAction,
    now_ms: u64,
    effects: &mut Vec<WorkspaceEffect>,
) -> Result<bool, ReducerError> {
    match action {
        WorkspaceAction::HoverEnter { file_id } => {
            state.preview.hover_token += 1;
            state.preview.hover = HoverState::Pending {
                file_id: file_id.clone(),
                token: state.preview.hover_token,
            };
            state.preview.popup = None;
            effects.push(WorkspaceEffect::ScheduleHoverDebounce {
                token: state.preview.hover_token,
                delay_ms: state.config.preview_debounce_ms,
            });
        }
        WorkspaceAction::HoverLeave => close_popup(state),
        WorkspaceAction::HoverDebounceElapsed { token } => {
            let file_id = match &state.preview.hover {
                HoverState::Pending {
                    file_id,
                    token: pending,
                } if pending == token => file_id.clone(),
                _ => return Ok(true),
            };
            open_preview(state, file_id, now_ms, effects);
        }
        WorkspaceAction::PreviewLoaded { file_id, result } => {
            let max_lines = state.config.preview_max_lines;
            let Some(entry) = state
                .preview
                .entries
                .get_mut(file_id)
                .filter(|entry| entry.status == PreviewStatus::Loading)
            else {
                return Ok(true);
            };
            match result {
                Ok(text) => {
                    let snippet = truncate_lines(text, max_lines);
                    entry.content = snippet.content;
                    entry.truncated = snippet.truncated;
                    entry.status = PreviewStatus::Ready;
                }
                Err(message) => {
                    entry.status = PreviewStatus::Error;
                    entry.error = Some(message.clone());
                }
            }
        }
        WorkspaceAction::PopupPlaced { file_id, placement } => {
            if matches!(&state.preview.hover, HoverState::Open { file_id: open } if open == file_id)
            {
                state.preview.popup = *placement;
            }
        }
        WorkspaceAction::InvalidatePreview { file_id } => {
            state.preview.entries.remove(file_id);
            close_if_open_on(state, file_id);
        }
        WorkspaceAction::ClearPreviews => {
            state.preview.entries.clear();
            if matches!(state.preview.hover, HoverState::Open { .. }) {
                close_popup(state);
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}
