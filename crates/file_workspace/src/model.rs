use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use serde::{Deserialize, Serialize};
use workspace_host::{
    detect_file_kind, normalize_folder_path, EntryKind, FileKind, FileRecord, UNTITLED_FILE_NAME,
};

use crate::config::WorkspaceConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub folder_path: String,
    pub size: u64,
    pub detected_kind: FileKind,
    pub storage_kind: Option<String>,
    pub entry_kind: EntryKind,
    pub version: u32,
    pub created_at_unix_ms: u64,
    pub updated_at_unix_ms: u64,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl FileEntry {
    /// Builds an entry from a backend row. Missing names display as `Untitled` and resolve to
    /// [`FileKind::File`].
    pub fn from_record(record: FileRecord) -> Self {
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let detected_kind = match record.entry_kind {
            EntryKind::Folder => FileKind::File,
            EntryKind::File => detect_file_kind(name.as_deref(), record.storage_kind.as_deref()),
        };
        Self {
            id: record.id,
            name: name.unwrap_or_else(|| UNTITLED_FILE_NAME.to_string()),
            folder_path: normalize_folder_path(&record.folder_path),
            size: record.size,
            detected_kind,
            storage_kind: record.storage_kind,
            entry_kind: record.entry_kind,
            version: record.version,
            created_at_unix_ms: record.created_at_unix_ms,
            updated_at_unix_ms: record.updated_at_unix_ms,
            tags: record.tags,
            description: record.description,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.entry_kind == EntryKind::Folder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    #[default]
    Name,
    Size,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Listing snapshot plus the filter, search and sort inputs applied to it.
pub struct RegistryState {
    /// Current folder, normalized.
    pub folder: String,
    /// Entries in the order the backend listed them.
    pub entries: Vec<FileEntry>,
    pub kind_filter: Option<FileKind>,
    /// Text as typed, updated on every keystroke.
    pub search_input: String,
    /// Term actually filtering the list, updated once the debounce settles.
    pub applied_search: String,
    pub search_token: u64,
    pub sort: SortSpec,
    pub loading: bool,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            folder: "/".to_string(),
            entries: Vec::new(),
            kind_filter: None,
            search_input: String::new(),
            applied_search: String::new(),
            search_token: 0,
            sort: SortSpec::default(),
            loading: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadPhase {
    Queued,
    Uploading,
    Complete,
    /// Transition target only: a failed task leaves the map in the same step.
    Failed,
}

impl UploadPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Uploading => "uploading",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTask {
    /// Progress-map key, unique among active tasks.
    pub key: String,
    pub file_name: String,
    pub progress_percent: u8,
    pub phase: UploadPhase,
    pub started_at_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub tasks: BTreeMap<String, UploadTask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewStatus {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEntry {
    pub file_id: String,
    pub file_name: String,
    pub content: String,
    pub language: String,
    pub truncated: bool,
    pub status: PreviewStatus,
    /// Human-readable failure, set only when `status` is [`PreviewStatus::Error`].
    pub error: Option<String>,
    pub last_accessed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Where the pointer is in the hover cycle.
pub enum HoverState {
    #[default]
    Idle,
    /// Debounce running; only the timer carrying `token` may open the preview.
    Pending { file_id: String, token: u64 },
    /// Debounce fired; the popup shows the cache entry for `file_id`.
    Open { file_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Observable preview state machine.
pub enum PreviewPhase {
    Idle,
    Pending,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewState {
    pub hover: HoverState,
    pub hover_token: u64,
    pub entries: HashMap<String, PreviewEntry>,
    pub popup: Option<PopupPlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Rendering snapshot of the open preview.
pub struct PreviewView {
    pub file_id: String,
    /// Popup title.
    pub file_name: String,
    pub status: PreviewStatus,
    pub language: String,
    pub content: String,
    pub truncated: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Per-item notifications for toasts and input controls, drained by the view layer.
pub enum WorkspaceEvent {
    UploadFailed {
        key: String,
        progress_percent: u8,
        message: String,
    },
    UploadBatchSettled {
        succeeded: usize,
        failed: usize,
    },
    /// The file-input control should be cleared so the same files can be picked again.
    UploadInputReset,
    ListingFailed {
        folder: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkspaceState {
    pub config: WorkspaceConfig,
    pub registry: RegistryState,
    pub uploads: UploadState,
    pub preview: PreviewState,
    pub events: Vec<WorkspaceEvent>,
}

impl WorkspaceState {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current progress per upload key, for the progress display.
    pub fn progress_map(&self) -> BTreeMap<String, u8> {
        self.uploads
            .tasks
            .iter()
            .map(|(key, task)| (key.clone(), task.progress_percent))
            .collect()
    }

    pub fn preview_phase(&self) -> PreviewPhase {
        match &self.preview.hover {
            HoverState::Idle => PreviewPhase::Idle,
            HoverState::Pending { .. } => PreviewPhase::Pending,
            HoverState::Open { file_id } => match self.preview.entries.get(file_id) {
                Some(entry) => match entry.status {
                    PreviewStatus::Loading => PreviewPhase::Loading,
                    PreviewStatus::Ready => PreviewPhase::Ready,
                    PreviewStatus::Error => PreviewPhase::Error,
                },
                None => PreviewPhase::Idle,
            },
        }
    }

    pub fn preview_view(&self) -> Option<PreviewView> {
        let HoverState::Open { file_id } = &self.preview.hover else {
            return None;
        };
        let entry = self.preview.entries.get(file_id)?;
        Some(PreviewView {
            file_id: entry.file_id.clone(),
            file_name: entry.file_name.clone(),
            status: entry.status,
            language: entry.language.clone(),
            content: entry.content.clone(),
            truncated: entry.truncated,
            error: entry.error.clone(),
        })
    }

    pub fn entry(&self, file_id: &str) -> Option<&FileEntry> {
        self.registry.entries.iter().find(|entry| entry.id == file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_degrades_to_untitled_file() {
        let entry = FileEntry::from_record(FileRecord {
            id: "f-1".to_string(),
            name: Some("   ".to_string()),
            folder_path: "designs/".to_string(),
            ..FileRecord::default()
        });
        assert_eq!(entry.name, UNTITLED_FILE_NAME);
        assert_eq!(entry.detected_kind, FileKind::File);
        assert_eq!(entry.folder_path, "/designs");
    }

    #[test]
    fn folders_never_take_a_content_kind() {
        let entry = FileEntry::from_record(FileRecord {
            id: "d-1".to_string(),
            name: Some("photos.png".to_string()),
            entry_kind: EntryKind::Folder,
            ..FileRecord::default()
        });
        assert!(entry.is_folder());
        assert_eq!(entry.detected_kind, FileKind::File);
    }

    #[test]
    fn preview_view_requires_open_hover_and_entry() {
        let mut state = WorkspaceState::default();
        assert_eq!(state.preview_phase(), PreviewPhase::Idle);
        assert!(state.preview_view().is_none());

        state.preview.hover = HoverState::Open {
            file_id: "f-1".to_string(),
        };
        state.preview.entries.insert(
            "f-1".to_string(),
            PreviewEntry {
                file_id: "f-1".to_string(),
                file_name: "main.rs".to_string(),
                content: String::new(),
                language: "rust".to_string(),
                truncated: false,
                status: PreviewStatus::Loading,
                error: None,
                last_accessed_ms: 0,
            },
        );
        assert_eq!(state.preview_phase(), PreviewPhase::Loading);
        let view = state.preview_view().expect("open preview");
        assert_eq!(view.file_name, "main.rs");
        assert_eq!(view.language, "rust");
    }
}
