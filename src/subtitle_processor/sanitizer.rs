/*!
 * Removal of presentational markup from dialogue text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Override tag block, non-greedy and non-nested
static OVERRIDE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[^}]*\}").unwrap()
});

// @const: Whitespace run
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// Escape sequence for a hard line break inside dialogue text
pub const HARD_LINE_BREAK: &str = "\\N";

/// Strip override tags and line-break escapes from a raw `Text` field.
///
/// Only balanced `{...}` spans are removed: a `{` without a closing `}` stays in
/// the output together with everything after it.
pub fn clean_text(text: &str) -> String {
    let without_tags = OVERRIDE_TAG_REGEX.replace_all(text, "");
    let without_breaks = without_tags.replace(HARD_LINE_BREAK, " ");
    WHITESPACE_REGEX
        .replace_all(&without_breaks, " ")
        .trim()
        .to_string()
}
