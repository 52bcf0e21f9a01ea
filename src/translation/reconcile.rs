/*!
 * Reconciliation of a numbered reply with the chunk it answers.
 *
 * A well-behaved reply has one `N. translation` line per submitted text. A line
 * counts as numbered only when the marker starts the line; indented markers do
 * not count. When the count does not match, every non-empty trimmed line is
 * taken as a translation as it stands, marker included, and missing trailing
 * entries are filled from the end of the chunk. The repair can misalign text;
 * the chunk still yields one text per input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Leading `N.` marker and the whitespace after it
static NUMBER_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s*").unwrap()
});

/// How a reply was turned into translations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// One numbered line per submitted text
    Exact,
    /// The numbered line count differed and the fallback was applied
    Repaired {
        /// Numbered lines found in the reply
        numbered: usize,
        /// Entries filled from the source chunk
        padded: usize,
    },
}

/// Translations for one chunk, exactly one per submitted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub translations: Vec<String>,
    pub status: ReplyStatus,
}

/// Strip a leading `N.` marker if there is one
pub fn strip_number_marker(line: &str) -> &str {
    match NUMBER_MARKER_REGEX.find(line) {
        Some(marker) => &line[marker.end()..],
        None => line,
    }
}

/// Extract the text of every numbered line of a reply, in reply order
pub fn parse_numbered_reply(reply: &str) -> Vec<String> {
    reply
        .trim()
        .lines()
        .filter(|line| NUMBER_MARKER_REGEX.is_match(line))
        .map(|line| strip_number_marker(line).trim().to_string())
        .collect()
}

/// Turn a reply into exactly `chunk.len()` translations
pub fn reconcile<S: AsRef<str>>(reply: &str, chunk: &[S]) -> Reconciled {
    let expected = chunk.len();
    let numbered = parse_numbered_reply(reply);

    if numbered.len() == expected {
        return Reconciled {
            translations: numbered,
            status: ReplyStatus::Exact,
        };
    }

    let mut translations: Vec<String> = reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(expected)
        .collect();

    let padded = expected - translations.len();
    translations.extend(
        chunk[expected - padded..]
            .iter()
            .map(|text| text.as_ref().to_string()),
    );

    Reconciled {
        translations,
        status: ReplyStatus::Repaired {
            numbered: numbered.len(),
            padded,
        },
    }
}
