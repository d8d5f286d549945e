//! Project-file data types shared across host contracts and implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display name used for backend rows that arrive without a name.
pub const UNTITLED_FILE_NAME: &str = "Untitled";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
/// File category inferred from the filename suffix.
pub enum FileKind {
    /// Raster or vector image.
    Image,
    /// Office document, PDF or plain prose.
    Document,
    /// Source code or structured config.
    Code,
    /// Compressed archive.
    Archive,
    /// Video container.
    Video,
    /// Audio container.
    Audio,
    /// Anything not recognized.
    #[default]
    File,
}

impl FileKind {
    /// Every kind, in display order.
    pub const ALL: [FileKind; 7] = [
        Self::Image,
        Self::Document,
        Self::Code,
        Self::Archive,
        Self::Video,
        Self::Audio,
        Self::File,
    ];

    /// Returns a stable lowercase token for filters and diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Code => "code",
            Self::Archive => "archive",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// Listing row kind.
pub enum EntryKind {
    /// File row.
    #[default]
    File,
    /// Folder row.
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Raw listing row as reported by the storage backend.
///
/// Backends are not trusted to fill every column, so the fields that drive kind detection are
/// optional and the workspace degrades when they are missing.
pub struct FileRecord {
    /// Backend identifier.
    pub id: String,
    /// File name including suffix.
    pub name: Option<String>,
    /// Normalized folder path containing the file.
    pub folder_path: String,
    /// Size in bytes.
    pub size: u64,
    /// Backend-reported MIME/type.
    pub storage_kind: Option<String>,
    /// File or folder row.
    pub entry_kind: EntryKind,
    /// Backend revision counter.
    pub version: u32,
    /// Creation time in unix milliseconds.
    pub created_at_unix_ms: u64,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Ordered user tags.
    pub tags: Vec<String>,
    /// Optional free-form description.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Listing filters forwarded to the storage backend.
pub struct ListFilters {
    /// Restrict the listing to one detected kind.
    #[serde(rename = "type")]
    pub kind: Option<FileKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Local file blob selected for upload.
pub struct UploadBlob {
    /// Original file name.
    pub name: String,
    /// Raw content bytes.
    pub bytes: Vec<u8>,
    /// Browser-reported MIME type, when known.
    pub mime_type: Option<String>,
}

impl UploadBlob {
    /// Builds a blob with an unknown MIME type.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Aggregate project storage statistics.
pub struct ProjectStats {
    /// Number of files (folders excluded).
    pub total_files: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// File count per detected kind token.
    pub file_type_counts: BTreeMap<String, u64>,
    /// Most recently created files, newest first.
    pub recent_uploads: Vec<FileRecord>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn file_kind_serde_values_match_filter_tokens() {
        for kind in FileKind::ALL {
            assert_eq!(
                serde_json::to_value(kind).expect("serialize"),
                json!(kind.as_str())
            );
        }
    }

    #[test]
    fn malformed_record_deserializes_with_defaults() {
        let record: FileRecord =
            serde_json::from_value(json!({ "id": "f-1", "size": 12 })).expect("deserialize");
        assert_eq!(record.id, "f-1");
        assert_eq!(record.name, None);
        assert_eq!(record.storage_kind, None);
        assert_eq!(record.entry_kind, EntryKind::File);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn list_filters_use_type_key() {
        let filters = ListFilters {
            kind: Some(FileKind::Code),
        };
        assert_eq!(
            serde_json::to_value(&filters).expect("serialize"),
            json!({ "type": "code" })
        );
    }
}
