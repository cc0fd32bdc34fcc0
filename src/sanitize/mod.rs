//! Text normalization for question matching.
//!
//! Canned-answer lookup compares normalized forms, so every string that goes
//! into or out of the question-text maps passes through [`sanitize_string`].

/// Normalizes a question for exact/paraphrase comparison.
///
/// Lowercases, replaces non-breaking spaces with plain spaces, drops every
/// character outside ASCII letters/digits/whitespace, and trims. Trimming
/// happens last so the function is idempotent:
/// `sanitize_string(sanitize_string(s)) == sanitize_string(s)`.
pub fn sanitize_string(input: &str) -> String {
    let lowered = input.to_lowercase();
    let filtered: String = lowered
        .chars()
        .map(|ch| if ch == '\u{00a0}' { ' ' } else { ch })
        .filter(|ch| ch.is_ascii_alphanumeric() || ch.is_ascii_whitespace())
        .collect();
    filtered.trim().to_string()
}

/// Normalizes each string in a slice with [`sanitize_string`].
pub fn normalize_strings(strings: &[String]) -> Vec<String> {
    strings.iter().map(|s| sanitize_string(s)).collect()
}
