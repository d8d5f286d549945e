//! Folder-path helpers for the project file tree.

/// Normalizes a project folder path.
///
/// Trims whitespace, converts backslashes, drops empty and `.` segments, resolves `..` against the
/// preceding segment and always yields a leading `/`. Empty input is the root folder.
pub fn normalize_folder_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let unified = path.trim().replace('\\', "/");
    for segment in unified.split('/') {
        match segment.trim() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Joins a child folder name onto a parent folder and normalizes the result.
pub fn join_folder_path(parent: &str, name: &str) -> String {
    normalize_folder_path(&format!("{}/{}", normalize_folder_path(parent), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folder_path_cases() {
        let cases = [
            ("", "/"),
            ("  ", "/"),
            ("designs/logos", "/designs/logos"),
            ("/designs//logos/", "/designs/logos"),
            ("./designs/../specs", "/specs"),
            ("\\designs\\logos", "/designs/logos"),
            ("/../..", "/"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_folder_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn join_folder_path_normalizes_both_sides() {
        assert_eq!(join_folder_path("/", "assets"), "/assets");
        assert_eq!(join_folder_path("docs/", "/drafts/"), "/docs/drafts");
        assert_eq!(join_folder_path("/docs", ".."), "/");
    }
}
