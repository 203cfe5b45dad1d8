//! Counted nouns for log lines.

/// Format `count` with `noun`, pluralized unless the count is one.
///
/// - `plural_count(1, "page")` -> `"1 page"`
/// - `plural_count(3, "page")` -> `"3 pages"`
/// - `plural_count(0, "entry")` -> `"0 entries"`
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        return format!("{count} {noun}");
    }
    match noun.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'o', 'u']) => format!("{count} {stem}ies"),
        _ => format!("{count} {noun}s"),
    }
}
