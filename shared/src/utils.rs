use std::path::Path;

/// Knowledge-base documents the loader knows how to read.
pub fn is_supported_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    matches!(ext.as_str(), "txt" | "md" | "pdf" | "docx")
}

/// Lowercase slug used in default brief filenames; spaces become underscores.
pub fn slugify(input: &str) -> String {
    let slug: String = input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if slug.is_empty() {
        "general".to_string()
    } else {
        slug
    }
}

/// Cut `input` to at most `max` characters, appending an ellipsis when cut.
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &input[..idx]),
        None => input.to_string(),
    }
}

/// Width for horizontal rules; falls back to 80 columns off a terminal.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
        .clamp(20, 120)
}
