//! Project storage service contracts and adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use super::{
    kind::detect_file_kind,
    path::{join_folder_path, normalize_folder_path},
    types::{EntryKind, FileRecord, ListFilters, ProjectStats, UploadBlob},
};
use crate::time::next_monotonic_timestamp_ms;

/// Object-safe boxed future used by [`ProjectStorageService`] async methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Number of rows reported in [`ProjectStats::recent_uploads`].
pub const RECENT_UPLOADS_LIMIT: usize = 5;

/// Remote project storage consumed by the file workspace.
///
/// Uploads report only eventual success or failure; no progress signal is available.
pub trait ProjectStorageService {
    /// Lists the rows of one folder.
    fn list<'a>(
        &'a self,
        folder: &'a str,
        filters: &'a ListFilters,
    ) -> StorageFuture<'a, Result<Vec<FileRecord>, String>>;

    /// Uploads one blob into `folder`.
    fn upload<'a>(
        &'a self,
        folder: &'a str,
        blob: &'a UploadBlob,
    ) -> StorageFuture<'a, Result<(), String>>;

    /// Downloads a file's bytes.
    fn download<'a>(&'a self, file_id: &'a str) -> StorageFuture<'a, Result<Vec<u8>, String>>;

    /// Deletes a file or folder row.
    fn delete<'a>(&'a self, file_id: &'a str) -> StorageFuture<'a, Result<(), String>>;

    /// Creates a folder named `name` under `parent`.
    fn create_folder<'a>(
        &'a self,
        name: &'a str,
        parent: &'a str,
    ) -> StorageFuture<'a, Result<(), String>>;

    /// Returns aggregate statistics for a project.
    fn stats<'a>(&'a self, project_id: &'a str) -> StorageFuture<'a, Result<ProjectStats, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Storage adapter for hosts without a backend. Every mutation fails.
pub struct NoopProjectStorageService;

impl NoopProjectStorageService {
    fn unsupported_error(op: &str) -> String {
        format!("project storage unavailable: {op}")
    }
}

impl ProjectStorageService for NoopProjectStorageService {
    fn list<'a>(
        &'a self,
        _folder: &'a str,
        _filters: &'a ListFilters,
    ) -> StorageFuture<'a, Result<Vec<FileRecord>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn upload<'a>(
        &'a self,
        _folder: &'a str,
        _blob: &'a UploadBlob,
    ) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("upload")) })
    }

    fn download<'a>(&'a self, _file_id: &'a str) -> StorageFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async { Err(Self::unsupported_error("download")) })
    }

    fn delete<'a>(&'a self, _file_id: &'a str) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("delete")) })
    }

    fn create_folder<'a>(
        &'a self,
        _name: &'a str,
        _parent: &'a str,
    ) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("create_folder")) })
    }

    fn stats<'a>(
        &'a self,
        _project_id: &'a str,
    ) -> StorageFuture<'a, Result<ProjectStats, String>> {
        Box::pin(async { Ok(ProjectStats::default()) })
    }
}

#[derive(Debug, Default)]
struct MemoryStorageState {
    records: Vec<FileRecord>,
    blobs: HashMap<String, Vec<u8>>,
    next_id: u64,
}

impl MemoryStorageState {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("file-{}", self.next_id)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory single-project storage. Uploads and folder creation resolve immediately.
pub struct MemoryProjectStorageService {
    inner: Rc<RefCell<MemoryStorageState>>,
}

impl MemoryProjectStorageService {
    /// Builds a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().records.extend(records);
        store
    }

    /// Returns a snapshot of every stored row.
    pub fn records(&self) -> Vec<FileRecord> {
        self.inner.borrow().records.clone()
    }
}

impl ProjectStorageService for MemoryProjectStorageService {
    fn list<'a>(
        &'a self,
        folder: &'a str,
        filters: &'a ListFilters,
    ) -> StorageFuture<'a, Result<Vec<FileRecord>, String>> {
        Box::pin(async move {
            let folder = normalize_folder_path(folder);
            Ok(self
                .inner
                .borrow()
                .records
                .iter()
                .filter(|record| normalize_folder_path(&record.folder_path) == folder)
                .filter(|record| match filters.kind {
                    Some(kind) => {
                        record.entry_kind == EntryKind::File
                            && detect_file_kind(
                                record.name.as_deref(),
                                record.storage_kind.as_deref(),
                            ) == kind
                    }
                    None => true,
                })
                .cloned()
                .collect())
        })
    }

    fn upload<'a>(
        &'a self,
        folder: &'a str,
        blob: &'a UploadBlob,
    ) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let now = next_monotonic_timestamp_ms();
            let mut state = self.inner.borrow_mut();
            let id = state.allocate_id();
            state.blobs.insert(id.clone(), blob.bytes.clone());
            state.records.push(FileRecord {
                id,
                name: Some(blob.name.clone()),
                folder_path: normalize_folder_path(folder),
                size: blob.bytes.len() as u64,
                storage_kind: blob.mime_type.clone(),
                entry_kind: EntryKind::File,
                version: 1,
                created_at_unix_ms: now,
                updated_at_unix_ms: now,
                tags: Vec::new(),
                description: None,
            });
            Ok(())
        })
    }

    fn download<'a>(&'a self, file_id: &'a str) -> StorageFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move {
            self.inner
                .borrow()
                .blobs
                .get(file_id)
                .cloned()
                .ok_or_else(|| format!("file not found: {file_id}"))
        })
    }

    fn delete<'a>(&'a self, file_id: &'a str) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            let before = state.records.len();
            state.records.retain(|record| record.id != file_id);
            if state.records.len() == before {
                return Err(format!("file not found: {file_id}"));
            }
            state.blobs.remove(file_id);
            Ok(())
        })
    }

    fn create_folder<'a>(
        &'a self,
        name: &'a str,
        parent: &'a str,
    ) -> StorageFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let name = name.trim();
            if name.is_empty() || name.contains('/') {
                return Err(format!("invalid folder name: {name:?}"));
            }
            let parent = normalize_folder_path(parent);
            let now = next_monotonic_timestamp_ms();
            let mut state = self.inner.borrow_mut();
            let exists = state.records.iter().any(|record| {
                record.entry_kind == EntryKind::Folder
                    && record.folder_path == parent
                    && record.name.as_deref() == Some(name)
            });
            if exists {
                return Err(format!(
                    "folder already exists: {}",
                    join_folder_path(&parent, name)
                ));
            }
            let id = state.allocate_id();
            state.records.push(FileRecord {
                id,
                name: Some(name.to_string()),
                folder_path: parent,
                entry_kind: EntryKind::Folder,
                version: 1,
                created_at_unix_ms: now,
                updated_at_unix_ms: now,
                ..FileRecord::default()
            });
            Ok(())
        })
    }

    fn stats<'a>(
        &'a self,
        _project_id: &'a str,
    ) -> StorageFuture<'a, Result<ProjectStats, String>> {
        Box::pin(async move {
            let state = self.inner.borrow();
            let mut stats = ProjectStats::default();
            let mut files: Vec<&FileRecord> = state
                .records
                .iter()
                .filter(|record| record.entry_kind == EntryKind::File)
                .collect();
            for record in &files {
                stats.total_files += 1;
                stats.total_size += record.size;
                let kind = detect_file_kind(record.name.as_deref(), record.storage_kind.as_deref());
                *stats
                    .file_type_counts
                    .entry(kind.as_str().to_string())
                    .or_default() += 1;
            }
            files.sort_by(|a, b| b.created_at_unix_ms.cmp(&a.created_at_unix_ms));
            stats.recent_uploads = files
                .into_iter()
                .take(RECENT_UPLOADS_LIMIT)
                .cloned()
                .collect();
            Ok(stats)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::files::types::FileKind;

    #[test]
    fn noop_storage_lists_empty_and_rejects_mutations() {
        let storage = NoopProjectStorageService;
        let storage_obj: &dyn ProjectStorageService = &storage;

        let rows = block_on(storage_obj.list("/", &ListFilters::default())).expect("list");
        assert!(rows.is_empty());
        let err = block_on(storage_obj.upload("/", &UploadBlob::new("a.txt", "a")))
            .expect_err("upload should fail");
        assert!(err.contains("upload"));
    }

    #[test]
    fn memory_storage_upload_list_download_delete() {
        let storage = MemoryProjectStorageService::default();
        let storage_obj: &dyn ProjectStorageService = &storage;

        block_on(storage_obj.upload("designs", &UploadBlob::new("logo.png", vec![1, 2, 3])))
            .expect("upload");
        block_on(storage_obj.upload("/", &UploadBlob::new("notes.md", "hi"))).expect("upload");

        let rows =
            block_on(storage_obj.list("/designs", &ListFilters::default())).expect("list designs");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("logo.png"));
        assert_eq!(rows[0].size, 3);

        let id = rows[0].id.clone();
        assert_eq!(block_on(storage_obj.download(&id)).expect("download"), vec![1, 2, 3]);
        block_on(storage_obj.delete(&id)).expect("delete");
        assert!(block_on(storage_obj.delete(&id)).is_err());
        assert!(block_on(storage_obj.list("/designs", &ListFilters::default()))
            .expect("list")
            .is_empty());
    }

    #[test]
    fn memory_storage_filters_by_detected_kind() {
        let storage = MemoryProjectStorageService::default();
        let storage_obj: &dyn ProjectStorageService = &storage;
        block_on(storage_obj.upload("/", &UploadBlob::new("a.png", "x"))).expect("upload");
        block_on(storage_obj.upload("/", &UploadBlob::new("b.rs", "x"))).expect("upload");
        block_on(storage_obj.create_folder("assets", "/")).expect("folder");

        let filters = ListFilters {
            kind: Some(FileKind::Code),
        };
        let rows = block_on(storage_obj.list("/", &filters)).expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("b.rs"));
    }

    #[test]
    fn memory_storage_rejects_duplicate_folders() {
        let storage = MemoryProjectStorageService::default();
        let storage_obj: &dyn ProjectStorageService = &storage;
        block_on(storage_obj.create_folder("assets", "/")).expect("first");
        let err = block_on(storage_obj.create_folder("assets", "/")).expect_err("duplicate");
        assert!(err.contains("/assets"));
        assert!(block_on(storage_obj.create_folder("  ", "/")).is_err());
    }

    #[test]
    fn memory_storage_stats_count_files_by_kind() {
        let storage = MemoryProjectStorageService::default();
        let storage_obj: &dyn ProjectStorageService = &storage;
        block_on(storage_obj.upload("/", &UploadBlob::new("a.png", vec![0; 10]))).expect("up");
        block_on(storage_obj.upload("/", &UploadBlob::new("b.png", vec![0; 5]))).expect("up");
        block_on(storage_obj.upload("/docs", &UploadBlob::new("c.pdf", vec![0; 1]))).expect("up");
        block_on(storage_obj.create_folder("docs", "/")).expect("folder");

        let stats = block_on(storage_obj.stats("project-1")).expect("stats");
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 16);
        assert_eq!(stats.file_type_counts.get("image"), Some(&2));
        assert_eq!(stats.file_type_counts.get("document"), Some(&1));
        assert_eq!(stats.recent_uploads[0].name.as_deref(), Some("c.pdf"));
    }
}
