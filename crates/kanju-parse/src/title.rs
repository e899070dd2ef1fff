use regex::Regex;
use std::sync::LazyLock;

/// Longest title kept before truncation, in characters.
pub const MAX_TITLE_CHARS: usize = 50;

/// Appended to a truncated title.
pub const ELLIPSIS: &str = "...";

/// Shortest title worth showing; anything shorter falls back to the default.
const MIN_TITLE_CHARS: usize = 2;

static RE_NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]?[0-9]+集?$").unwrap());

/// Guess a title from the last non-empty segment of a (percent-decoded) path.
///
/// A trailing episode number (`-12`, `_12集`, `12`) is stripped and the
/// remaining `-`/`_` separators become spaces. Returns `None` when nothing
/// usable is left, so the caller can pick its default.
pub fn from_path(path: &str) -> Option<String> {
    let segment = last_segment(path)?;
    let stripped = RE_NUMBER_SUFFIX.replace(segment, "");
    let title = truncate(&stripped.replace(['-', '_'], " "));

    if title.chars().count() < MIN_TITLE_CHARS {
        None
    } else {
        Some(title)
    }
}

fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}

fn truncate(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let mut cut: String = title.chars().take(MAX_TITLE_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        title.to_string()
    }
}
