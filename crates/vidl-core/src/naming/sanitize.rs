//! Title → file-stem sanitization.

/// Stem used when a title sanitizes to nothing.
const FALLBACK_STEM: &str = "video";

/// Leaves room for a counter prefix and `.mp4` under the 255-byte NAME_MAX.
const MAX_STEM_BYTES: usize = 200;

/// Makes an upstream title safe to use as a file stem.
///
/// - Replaces NUL, `/`, `\`, control characters and `<>:"|?*` with `_`
/// - Trims leading/trailing whitespace and dots
/// - Limits length to 200 bytes on a char boundary
///
/// Spaces and other punctuation are kept, so ordinary titles pass through unchanged.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');

    let mut take = trimmed.len().min(MAX_STEM_BYTES);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    let stem = trimmed[..take].trim_end();

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}
