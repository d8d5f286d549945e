//! Line-capped preview snippets.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub content: String,
    pub truncated: bool,
}

/// Marker line appended after the kept lines when a snippet is cut.
pub fn truncation_marker(hidden_lines: usize) -> String {
    let noun = if hidden_lines == 1 { "line" } else { "lines" };
    format!("… ({hidden_lines} more {noun})")
}

/// Keeps at most `max_lines` lines of `text`.
///
/// Lines split on `\n` with a trailing `\r` dropped; a final newline does not start an extra line.
/// When lines are cut, a [`truncation_marker`] line follows the kept ones.
pub fn truncate_lines(text: &str, max_lines: usize) -> Snippet {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if body.is_empty() {
        return Snippet {
            content: String::new(),
            truncated: false,
        };
    }

    let lines: Vec<&str> = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() <= max_lines {
        return Snippet {
            content: lines.join("\n"),
            truncated: false,
        };
    }

    let hidden = lines.len() - max_lines;
    let mut content = lines[..max_lines].join("\n");
    if max_lines > 0 {
        content.push('\n');
    }
    content.push_str(&truncation_marker(hidden));
    Snippet {
        content,
        truncated: true,
    }
}
