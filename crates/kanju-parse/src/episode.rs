//! Episode label detection from URL parts.
//!
//! Two independent strategies, applied by [`crate::extract`] in this order:
//!
//! 1. [`from_path`] — a `第12集` / `12集` counter anywhere in the decoded path.
//! 2. [`from_query`] — an `ep=`, `episode=` or `num=` query parameter.
//!
//! A query match overwrites a path match.

use regex::Regex;
use std::sync::LazyLock;

// ── Regex patterns (compiled once) ──────────────────────────────

static RE_PATH_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(第)?([0-9]+)集").unwrap());

static RE_QUERY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|&)(?:ep|episode|num)=([0-9]+)").unwrap());

/// Format an episode number the way history records display it.
pub fn label(digits: &str) -> String {
    format!("第{digits}集")
}

/// Find a `(第)N集` counter in a (percent-decoded) URL path.
pub fn from_path(path: &str) -> Option<String> {
    let caps = RE_PATH_COUNTER.captures(path)?;
    Some(label(caps.get(2)?.as_str()))
}

/// Find an `ep` / `episode` / `num` parameter in a raw query string
/// (without the leading `?`). Parameter names are case-insensitive.
pub fn from_query(query: &str) -> Option<String> {
    let caps = RE_QUERY_PARAM.captures(query)?;
    Some(label(caps.get(1)?.as_str()))
}

/// Apply both strategies with query precedence.
pub fn detect(path: &str, query: Option<&str>) -> Option<String> {
    let mut episode = from_path(path);
    if let Some(overriding) = query.and_then(from_query) {
        episode = Some(overriding);
    }
    episode
}
