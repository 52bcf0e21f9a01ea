/*!
 * Dialogue records and the parser that builds them from raw event lines.
 */

use log::debug;

use crate::errors::SubtitleError;
use super::sanitizer::clean_text;
use super::schema::{DialogueCandidate, FormatSchema, DIALOGUE_PREFIX};

/// Name of the column holding the displayed text
pub const TEXT_COLUMN: &str = "Text";

/// Field values of one dialogue line keyed by column name, in schema order.
///
/// Inserting a column name that is already present overwrites its value but
/// keeps the position of the first occurrence, so a schema that declares the
/// same column twice yields fewer fields than columns (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueFields {
    entries: Vec<(String, String)>,
}

impl DialogueFields {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a column, appending it if it is not yet present
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Value of a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the column is present
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, value)| value.as_str())
    }

    /// Number of distinct columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column is present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join the values with `,` in insertion order
    pub fn join_values(&self) -> String {
        self.values().collect::<Vec<_>>().join(",")
    }
}

// @struct: One subtitle event
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueRecord {
    // @field: Zero-based index of the source line in the document
    pub line_index: usize,

    // @field: Source line snapshot
    pub raw_line: String,

    // @field: Column values in schema order
    pub fields: DialogueFields,

    // @field: Text column without markup
    pub cleaned_text: String,
}

impl DialogueRecord {
    /// Serialize the record with its text column replaced
    pub fn to_line_with_text(&self, text: &str) -> String {
        let mut fields = self.fields.clone();
        fields.insert(TEXT_COLUMN, text);
        format!("{} {}", DIALOGUE_PREFIX, fields.join_values())
    }
}

/// Split the value portion of a dialogue line according to a schema.
///
/// At most `schema.len()` pieces are produced so the last column keeps any
/// commas of its own. Fails when fewer values than columns are found.
pub fn split_fields(
    value_portion: &str,
    schema: &FormatSchema,
    line_number: usize,
) -> Result<DialogueFields, SubtitleError> {
    let columns = schema.columns();
    let values: Vec<&str> = value_portion.splitn(columns.len().max(1), ',').collect();

    if values.len() < columns.len() {
        return Err(SubtitleError::MalformedDialogue {
            line: line_number,
            expected: columns.len(),
            found: values.len(),
        });
    }

    let mut fields = DialogueFields::new();
    for (column, value) in columns.iter().zip(values) {
        fields.insert(column.as_str(), value);
    }
    Ok(fields)
}

/// Build a record from a dialogue line found by the schema reader.
///
/// Returns `Ok(None)` for lines that are well-formed but carry nothing to
/// translate: no `Text` column, or a text that is empty once cleaned.
pub fn parse_dialogue(candidate: &DialogueCandidate<'_>) -> Result<Option<DialogueRecord>, SubtitleError> {
    let line_number = candidate.line_index + 1;
    let schema = candidate
        .schema
        .as_deref()
        .ok_or(SubtitleError::MissingSchema { line: line_number })?;

    let trimmed = candidate.line.trim();
    let value_portion = trimmed
        .strip_prefix(DIALOGUE_PREFIX)
        .unwrap_or(trimmed)
        .trim();

    let fields = split_fields(value_portion, schema, line_number)?;

    let Some(text) = fields.get(TEXT_COLUMN) else {
        debug!("Line {}: schema has no {} column", line_number, TEXT_COLUMN);
        return Ok(None);
    };

    let cleaned_text = clean_text(text);
    if cleaned_text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(DialogueRecord {
        line_index: candidate.line_index,
        raw_line: candidate.line.to_string(),
        fields,
        cleaned_text,
    }))
}
