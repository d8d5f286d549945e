//! Read-side helpers for the file registry: visible-list derivation, sorting and upload key
//! assignment.

use std::{cmp::Ordering, collections::BTreeSet};

use crate::{
    collate::compare_names,
    model::{FileEntry, RegistryState, SortField, SortOrder, SortSpec, UploadState},
};

fn compare_by_field(a: &FileEntry, b: &FileEntry, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_names(&a.name, &b.name),
        SortField::Size => a.size.cmp(&b.size),
        SortField::CreatedAt => a.created_at_unix_ms.cmp(&b.created_at_unix_ms),
    }
}

/// Sorts `entries` in place. Entries with equal keys keep their relative order in both directions.
pub fn sort_entries(entries: &mut [FileEntry], sort: SortSpec) {
    entries.sort_by(|a, b| {
        let ord = compare_by_field(a, b, sort.field);
        match sort.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}

/// Case-insensitive substring match; a blank term matches everything.
pub fn matches_search(entry: &FileEntry, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    needle.is_empty() || entry.name.to_lowercase().contains(&needle)
}

/// Entries to render: kind filter, then the applied search term, then the sort.
///
/// A kind filter hides folders, since folders never carry a content kind.
pub fn visible_entries(registry: &RegistryState) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = registry
        .entries
        .iter()
        .filter(|entry| match registry.kind_filter {
            Some(kind) => !entry.is_folder() && entry.detected_kind == kind,
            None => true,
        })
        .filter(|entry| matches_search(entry, &registry.applied_search))
        .cloned()
        .collect();
    sort_entries(&mut entries, registry.sort);
    entries
}

fn with_counter(name: &str, counter: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({counter}){}", &name[..dot], &name[dot..]),
        _ => format!("{name} ({counter})"),
    }
}

/// Picks one progress-map key per file name.
///
/// Names already in use by an active task, or by an earlier file of the same batch, get a
/// ` (n)` counter before the extension.
pub fn assign_upload_keys<S: AsRef<str>>(uploads: &UploadState, names: &[S]) -> Vec<String> {
    let mut taken: BTreeSet<String> = uploads.tasks.keys().cloned().collect();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let mut key = name.to_string();
            let mut counter = 1;
            while taken.contains(&key) {
                counter += 1;
                key = with_counter(name, counter);
            }
            taken.insert(key.clone());
            key
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use workspace_host::{EntryKind, FileKind, FileRecord};

    use super::*;
    use crate::model::{UploadPhase, UploadTask};

    fn entry(id: &str, name: &str, size: u64, created: u64) -> FileEntry {
        FileEntry::from_record(FileRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            folder_path: "/".to_string(),
            size,
            created_at_unix_ms: created,
            ..FileRecord::default()
        })
    }

    fn ids(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn size_sort_is_stable_in_both_directions() {
        let mut entries = vec![
            entry("a", "a.txt", 10, 3),
            entry("b", "b.txt", 5, 2),
            entry("c", "c.txt", 10, 1),
            entry("d", "d.txt", 5, 4),
        ];
        sort_entries(
            &mut entries,
            SortSpec {
                field: SortField::Size,
                order: SortOrder::Ascending,
            },
        );
        assert_eq!(ids(&entries), vec!["b", "d", "a", "c"]);

        sort_entries(
            &mut entries,
            SortSpec {
                field: SortField::Size,
                order: SortOrder::Descending,
            },
        );
        assert_eq!(ids(&entries), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn resorting_a_sorted_list_is_a_no_op() {
        let mut entries = vec![
            entry("1", "file10.png", 1, 0),
            entry("2", "File2.png", 1, 0),
            entry("3", "alpha.md", 1, 0),
            entry("4", "file2.png", 1, 0),
        ];
        let spec = SortSpec::default();
        sort_entries(&mut entries, spec);
        let first = entries.clone();
        sort_entries(&mut entries, spec);
        assert_eq!(entries, first);
        assert_eq!(ids(&entries), vec!["3", "4", "2", "1"]);
    }

    #[test]
    fn created_at_sort_orders_by_time() {
        let mut entries = vec![entry("late", "x", 0, 20), entry("early", "y", 0, 10)];
        sort_entries(
            &mut entries,
            SortSpec {
                field: SortField::CreatedAt,
                order: SortOrder::Ascending,
            },
        );
        assert_eq!(ids(&entries), vec!["early", "late"]);
    }

    #[test]
    fn visible_entries_apply_kind_filter_and_search() {
        let mut folder = entry("dir", "logos", 0, 0);
        folder.entry_kind = EntryKind::Folder;
        let registry = RegistryState {
            entries: vec![
                entry("1", "Logo.PNG", 1, 0),
                entry("2", "logo-notes.md", 1, 0),
                entry("3", "banner.png", 1, 0),
                folder,
            ],
            kind_filter: Some(FileKind::Image),
            applied_search: "  LOGO ".to_string(),
            ..RegistryState::default()
        };
        assert_eq!(ids(&visible_entries(&registry)), vec!["1"]);

        let unfiltered = RegistryState {
            kind_filter: None,
            applied_search: "   ".to_string(),
            ..registry
        };
        assert_eq!(visible_entries(&unfiltered).len(), 4);
    }

    #[test]
    fn colliding_upload_names_get_counters() {
        let mut uploads = UploadState::default();
        uploads.tasks.insert(
            "A.png".to_string(),
            UploadTask {
                key: "A.png".to_string(),
                file_name: "A.png".to_string(),
                progress_percent: 40,
                phase: UploadPhase::Uploading,
                started_at_ms: 0,
            },
        );
        let keys = assign_upload_keys(&uploads, &["A.png", "B.pdf", "B.pdf", "README", ".env"]);
        assert_eq!(
            keys,
            vec!["A (2).png", "B.pdf", "B (2).pdf", "README", ".env"]
        );
        let again = assign_upload_keys(&uploads, &["README", "README"]);
        assert_eq!(again, vec!["README", "README (2)"]);
    }
}
