//! Syntax-language tags for preview snippets.

use workspace_host::file_suffix;

/// Tag used when neither the file name nor its suffix is recognized.
pub const DEFAULT_LANGUAGE: &str = "text";

fn language_for_exact_name(name: &str) -> Option<&'static str> {
    let tag = match name.to_ascii_lowercase().as_str() {
        "dockerfile" | "containerfile" => "dockerfile",
        "makefile" | "gnumakefile" => "makefile",
        "cmakelists.txt" => "cmake",
        "cargo.lock" | "pipfile" => "toml",
        "gemfile" | "rakefile" => "ruby",
        ".gitignore" | ".dockerignore" => "gitignore",
        ".env" => "dotenv",
        ".bashrc" | ".zshrc" | ".profile" => "bash",
        "license" | "readme" => "text",
        _ => return None,
    };
    Some(tag)
}

fn language_for_suffix(suffix: &str) -> Option<&'static str> {
    let tag = match suffix {
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "py" | "pyw" | "pyi" => "python",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "rb" | "erb" | "rake" => "ruby",
        "php" => "php",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "cs" => "csharp",
        "lua" => "lua",
        "sh" | "bash" | "zsh" => "bash",
        "ps1" | "psm1" => "powershell",
        "sql" => "sql",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "less" => "less",
        "vue" => "vue",
        "svelte" => "svelte",
        "json" | "jsonc" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" | "conf" => "ini",
        "xml" | "svg" | "xsl" => "xml",
        "md" | "markdown" => "markdown",
        "csv" => "csv",
        "diff" | "patch" => "diff",
        "txt" | "log" => "text",
        _ => return None,
    };
    Some(tag)
}

/// Resolves the syntax tag for `file_name`: exact name first, then suffix, else
/// [`DEFAULT_LANGUAGE`].
pub fn language_for_file_name(file_name: &str) -> &'static str {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    language_for_exact_name(base)
        .or_else(|| file_suffix(base).and_then(|suffix| language_for_suffix(&suffix)))
        .unwrap_or(DEFAULT_LANGUAGE)
}
