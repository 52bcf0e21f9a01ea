/*!
 * Column schema of the `[Events]` section.
 *
 * An ASS file declares the layout of its event lines once per section with a
 * `Format:` line. Every `Dialogue:` line that follows is split according to the
 * most recent declaration. The schema stops being valid as soon as another
 * section header starts.
 */

use std::sync::Arc;

/// Section header that opens the events block
pub const EVENTS_HEADER: &str = "[Events]";

/// Prefix of a schema declaration line
pub const FORMAT_PREFIX: &str = "Format:";

/// Prefix of a dialogue event line
pub const DIALOGUE_PREFIX: &str = "Dialogue:";

/// Ordered column names declared by a `Format:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSchema {
    columns: Vec<String>,
}

impl FormatSchema {
    /// Build a schema from explicit column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a `Format:` line. Returns `None` when the line is not a format declaration.
    pub fn from_format_line(line: &str) -> Option<Self> {
        let declaration = line.trim().strip_prefix(FORMAT_PREFIX)?;
        Some(Self::new(declaration.trim().split(',').map(str::trim)))
    }

    /// Column names in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema declares no column at all
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether a column with the given name is declared
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// A `Dialogue:` line found inside an `[Events]` section
#[derive(Debug, Clone)]
pub struct DialogueCandidate<'a> {
    /// Zero-based index of the line in the document
    pub line_index: usize,

    /// The raw line as it appears in the document
    pub line: &'a str,

    /// Schema in scope for this line, if a `Format:` line preceded it
    pub schema: Option<Arc<FormatSchema>>,
}

/// Walk the raw lines of a document and collect every dialogue line of the
/// `[Events]` sections together with the schema governing it.
///
/// Lines are compared after trimming, so CRLF documents behave like LF ones.
pub fn scan_events<S: AsRef<str>>(lines: &[S]) -> Vec<DialogueCandidate<'_>> {
    let mut candidates = Vec::new();
    let mut in_events = false;
    let mut schema: Option<Arc<FormatSchema>> = None;

    for (line_index, raw) in lines.iter().enumerate() {
        let raw = raw.as_ref();
        let line = raw.trim();

        if line == EVENTS_HEADER {
            in_events = true;
            continue;
        }

        if line.starts_with('[') {
            in_events = false;
            schema = None;
            continue;
        }

        if !in_events {
            continue;
        }

        if let Some(parsed) = FormatSchema::from_format_line(line) {
            schema = Some(Arc::new(parsed));
            continue;
        }

        if line.starts_with(DIALOGUE_PREFIX) {
            candidates.push(DialogueCandidate {
                line_index,
                line: raw,
                schema: schema.clone(),
            });
        }
    }

    candidates
}
