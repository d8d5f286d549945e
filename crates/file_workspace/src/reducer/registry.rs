//! Reducer helpers for folder listings, search and sort.

use std::collections::HashSet;

use workspace_host::{normalize_folder_path, FileRecord};

use crate::{
    model::{FileEntry, WorkspaceEvent, WorkspaceState},
    reducer::{ReducerError, WorkspaceAction, WorkspaceEffect},
};

fn entries_from_records(records: &[FileRecord]) -> Vec<FileEntry> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.id.clone()))
        .map(|record| FileEntry::from_record(record.clone()))
        .collect()
}

pub(super) fn reduce_registry_action(
    state: &mut WorkspaceState,
    action: &WorkspaceAction,
    effects: &mut Vec<WorkspaceEffect>,
) -> Result<bool, ReducerError> {
    let registry = &mut state.registry;
    match action {
        WorkspaceAction::NavigateFolder { folder } => {
            let folder = normalize_folder_path(folder);
            if folder != registry.folder {
                registry.folder = folder;
                registry.entries.clear();
                registry.loading = false;
            }
        }
        WorkspaceAction::ListingRequested { folder, kind } => {
            let folder = normalize_folder_path(folder);
            if folder != registry.folder {
                registry.folder = folder;
                registry.entries.clear();
            }
            registry.kind_filter = *kind;
            registry.loading = true;
        }
        WorkspaceAction::ListingLoaded {
            folder,
            kind,
            records,
        } => {
            if normalize_folder_path(folder) != registry.folder || *kind != registry.kind_filter {
                return Ok(true);
            }
            registry.entries = entries_from_records(records);
            registry.loading = false;
        }
        WorkspaceAction::ListingFailed { folder, message } => {
            let folder = normalize_folder_path(folder);
            if folder == registry.folder {
                registry.loading = false;
            }
            state.events.push(WorkspaceEvent::ListingFailed {
                folder,
                message: message.clone(),
            });
        }
        WorkspaceAction::SetKindFilter { kind } => {
            if *kind != registry.kind_filter {
                registry.kind_filter = *kind;
                effects.push(WorkspaceEffect::RefreshListing);
            }
        }
        WorkspaceAction::SearchInput { text } => {
            registry.search_input = text.clone();
            registry.search_token += 1;
            effects.push(WorkspaceEffect::ScheduleSearchDebounce {
                token: registry.search_token,
                delay_ms: state.config.search_debounce_ms,
            });
        }
        WorkspaceAction::SearchDebounceElapsed { token } => {
            if *token == registry.search_token {
                registry.applied_search = registry.search_input.trim().to_string();
            }
        }
        WorkspaceAction::SetSort { sort } => {
            registry.sort = *sort;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
