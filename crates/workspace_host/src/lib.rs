//! Typed host contracts and shared models for the project file workspace.
//!
//! This crate is the boundary between the workspace runtime and its environment: remote storage,
//! content reads, row geometry, timers and preference persistence are all consumed through the
//! traits defined here. `Noop*` adapters serve unsupported hosts and `Memory*` adapters serve
//! headless composition and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod anchor;
pub mod content;
pub mod files;
pub mod host;
pub mod storage;
pub mod time;
pub mod timer;
pub mod web;

pub use anchor::{AnchorLocator, AnchorRect, MemoryAnchorLocator, NoopAnchorLocator, ViewportSize};
pub use content::{ContentFuture, ContentService, MemoryContentService, NoopContentService};
pub use files::kind::{detect_file_kind, file_suffix};
pub use files::path::{join_folder_path, normalize_folder_path};
pub use files::service::{
    MemoryProjectStorageService, NoopProjectStorageService, ProjectStorageService, StorageFuture,
    RECENT_UPLOADS_LIMIT,
};
pub use files::types::{
    EntryKind, FileKind, FileRecord, ListFilters, ProjectStats, UploadBlob, UNTITLED_FILE_NAME,
};
pub use host::HostServices;
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsFuture, PrefsStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
pub use timer::{ManualTimer, TimerFuture, TimerService};
pub use web::timeout_delay_ms;
#[cfg(target_arch = "wasm32")]
pub use web::{BrowserSpawner, BrowserTimer};
