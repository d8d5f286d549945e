//! Reducer helpers for the per-file upload state machine.
//!
//! Phases only move forward: `queued -> uploading -> {complete | failed}`. Failed tasks leave the
//! map in the same transition; complete tasks leave it when their retire timer fires.

use std::collections::HashSet;

use crate::{
    model::{UploadPhase, UploadTask, WorkspaceEvent, WorkspaceState},
    reducer::{ReducerError, WorkspaceAction, WorkspaceEffect},
};

fn task_mut<'a>(
    state: &'a mut WorkspaceState,
    key: &str,
) -> Result<&'a mut UploadTask, ReducerError> {
    state
        .uploads
        .tasks
        .get_mut(key)
        .ok_or_else(|| ReducerError::UnknownUpload(key.to_string()))
}

fn expect_phase(
    task: &UploadTask,
    allowed: &[UploadPhase],
    to: UploadPhase,
) -> Result<(), ReducerError> {
    if allowed.contains(&task.phase) {
        Ok(())
    } else {
        Err(ReducerError::InvalidUploadTransition {
            key: task.key.clone(),
            from: task.phase,
            to,
        })
    }
}

pub(super) fn reduce_upload_action(
    state: &mut WorkspaceState,
    action: &WorkspaceAction,
    now_ms: u64,
    effects: &mut Vec<WorkspaceEffect>,
) -> Result<bool, ReducerError> {
    match action {
        WorkspaceAction::QueueUploads { uploads } => {
            let mut batch_keys = HashSet::new();
            for (key, _) in uploads {
                if state.uploads.tasks.contains_key(key) || !batch_keys.insert(key.as_str()) {
                    return Err(ReducerError::DuplicateUpload(key.clone()));
                }
            }
            for (key, file_name) in uploads {
                state.uploads.tasks.insert(
                    key.clone(),
                    UploadTask {
                        key: key.clone(),
                        file_name: file_name.clone(),
                        progress_percent: 0,
                        phase: UploadPhase::Queued,
                        started_at_ms: now_ms,
                    },
                );
            }
        }
        WorkspaceAction::TransferStarted { key } => {
            let task = task_mut(state, key)?;
            expect_phase(task, &[UploadPhase::Queued], UploadPhase::Uploading)?;
            task.phase = UploadPhase::Uploading;
        }
        WorkspaceAction::ProgressTick { key, increment } => {
            let cap = state.config.progress_cap_percent;
            let task = task_mut(state, key)?;
            if task.phase == UploadPhase::Uploading {
                task.progress_percent = task
                    .progress_percent
                    .saturating_add(*increment)
                    .min(cap)
                    .max(task.progress_percent);
            }
        }
        WorkspaceAction::TransferSucceeded { key } => {
            let delay_ms = state.config.completion_display_ms;
            let task = task_mut(state, key)?;
            expect_phase(task, &[UploadPhase::Uploading], UploadPhase::Complete)?;
            task.progress_percent = 100;
            task.phase = UploadPhase::Complete;
            effects.push(WorkspaceEffect::ScheduleUploadRetire {
                key: key.clone(),
                delay_ms,
            });
        }
        WorkspaceAction::TransferFailed { key, message } => {
            let task = task_mut(state, key)?;
            expect_phase(
                task,
                &[UploadPhase::Queued, UploadPhase::Uploading],
                UploadPhase::Failed,
            )?;
            let progress_percent = task.progress_percent;
            state.uploads.tasks.remove(key);
            state.events.push(WorkspaceEvent::UploadFailed {
                key: key.clone(),
                progress_percent,
                message: message.clone(),
            });
        }
        WorkspaceAction::RetireUpload { key } => {
            let complete = state
                .uploads
                .tasks
                .get(key)
                .is_some_and(|task| task.phase == UploadPhase::Complete);
            if complete {
                state.uploads.tasks.remove(key);
            }
        }
        WorkspaceAction::UploadBatchSettled { succeeded, failed } => {
            state.events.push(WorkspaceEvent::UploadBatchSettled {
                succeeded: *succeeded,
                failed: *failed,
            });
            state.events.push(WorkspaceEvent::UploadInputReset);
            effects.push(WorkspaceEffect::RefreshListing);
        }
        _ => return Ok(false),
    }
    Ok(true)
}
