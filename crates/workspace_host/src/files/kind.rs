//! Filename-suffix classification shared by listings, statistics and previews.

use super::types::FileKind;

/// Returns the lowercase suffix of `name`, or `None` when the name carries no usable suffix.
///
/// Dot-files (`.env`), names without a dot and names ending in a dot have no suffix.
pub fn file_suffix(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let (stem, suffix) = base.rsplit_once('.')?;
    if stem.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(suffix.to_ascii_lowercase())
}

/// Maps a known suffix to its kind. Unknown suffixes return `None`.
pub fn kind_for_suffix(suffix: &str) -> Option<FileKind> {
    let kind = match suffix {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "svg" | "ico" | "tif" | "tiff"
        | "heic" | "avif" => FileKind::Image,
        "pdf" | "doc" | "docx" | "odt" | "rtf" | "txt" | "md" | "markdown" | "xls" | "xlsx"
        | "ods" | "csv" | "ppt" | "pptx" | "odp" | "pages" | "key" | "numbers" => {
            FileKind::Document
        }
        "rs" | "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" | "py" | "rb" | "go" | "java"
        | "kt" | "swift" | "c" | "h" | "cpp" | "cc" | "hpp" | "cs" | "php" | "lua" | "sh"
        | "bash" | "zsh" | "sql" | "html" | "htm" | "css" | "scss" | "less" | "vue"
        | "svelte" | "json" | "yaml" | "yml" | "toml" | "xml" | "ini" => FileKind::Code,
        "zip" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "7z" | "rar" | "zst" => FileKind::Archive,
        "mp4" | "mov" | "avi" | "mkv" | "webm" | "m4v" | "wmv" => FileKind::Video,
        "mp3" | "wav" | "flac" | "ogg" | "aac" | "m4a" | "opus" => FileKind::Audio,
        _ => return None,
    };
    Some(kind)
}

/// Maps a backend MIME/type to a kind. Only used when the suffix is unrecognized.
pub fn kind_for_storage_kind(storage_kind: &str) -> Option<FileKind> {
    let mime = storage_kind.trim().to_ascii_lowercase();
    let (top, sub) = mime.split_once('/').unwrap_or((mime.as_str(), ""));
    let kind = match top {
        "image" => FileKind::Image,
        "video" => FileKind::Video,
        "audio" => FileKind::Audio,
        "text" if sub == "plain" || sub == "markdown" || sub == "csv" => FileKind::Document,
        "text" => FileKind::Code,
        "application" => match sub {
            "pdf" | "msword" | "rtf" => FileKind::Document,
            "zip" | "gzip" | "x-tar" | "x-7z-compressed" | "x-rar-compressed" => {
                FileKind::Archive
            }
            "json" | "javascript" | "xml" | "toml" | "x-sh" => FileKind::Code,
            _ if sub.starts_with("vnd.openxmlformats") || sub.starts_with("vnd.oasis") => {
                FileKind::Document
            }
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

/// Resolves the detected kind for a listing row.
///
/// The suffix table wins; the backend type is consulted only for unknown suffixes; anything else is
/// [`FileKind::File`]. Never fails, including for missing names.
pub fn detect_file_kind(name: Option<&str>, storage_kind: Option<&str>) -> FileKind {
    name.and_then(file_suffix)
        .and_then(|suffix| kind_for_suffix(&suffix))
        .or_else(|| storage_kind.and_then(kind_for_storage_kind))
        .unwrap_or(FileKind::File)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_extraction_skips_dotfiles_and_bare_names() {
        let cases = [
            ("logo.PNG", Some("png")),
            ("archive.tar.gz", Some("gz")),
            ("Makefile", None),
            (".env", None),
            ("trailing.", None),
            ("/nested/dir/script.ts", Some("ts")),
        ];
        for (input, expected) in cases {
            assert_eq!(file_suffix(input).as_deref(), expected, "input={input:?}");
        }
    }

    #[test]
    fn suffix_table_wins_over_storage_kind() {
        assert_eq!(
            detect_file_kind(Some("A.png"), Some("application/pdf")),
            FileKind::Image
        );
        assert_eq!(detect_file_kind(Some("B.pdf"), None), FileKind::Document);
        assert_eq!(detect_file_kind(Some("C.zip"), None), FileKind::Archive);
        assert_eq!(detect_file_kind(Some("script.ts"), None), FileKind::Code);
    }

    #[test]
    fn storage_kind_is_only_a_fallback() {
        assert_eq!(
            detect_file_kind(Some("scan.unknownext"), Some("image/jpeg")),
            FileKind::Image
        );
        assert_eq!(
            detect_file_kind(Some("notes"), Some("text/plain")),
            FileKind::Document
        );
        assert_eq!(
            detect_file_kind(Some("blob.bin"), Some("application/octet-stream")),
            FileKind::File
        );
    }

    #[test]
    fn detection_is_total_for_malformed_rows() {
        assert_eq!(detect_file_kind(None, None), FileKind::File);
        assert_eq!(detect_file_kind(Some(""), Some("")), FileKind::File);
        assert_eq!(detect_file_kind(Some("."), None), FileKind::File);
    }
}
