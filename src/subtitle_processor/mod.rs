/*!
 * Advanced SubStation Alpha document handling.
 *
 * - `schema`: `[Events]` section scanning and `Format:` line parsing
 * - `dialogue`: dialogue records with schema-ordered fields
 * - `sanitizer`: markup removal from dialogue text
 * - `rewriter`: reconstruction of the document with translated text
 */

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::errors::SubtitleError;
use crate::file_utils::{DecodedFile, FileManager, SourceEncoding};

pub mod dialogue;
pub mod rewriter;
pub mod sanitizer;
pub mod schema;

pub use self::dialogue::{DialogueFields, DialogueRecord, TEXT_COLUMN};
pub use self::sanitizer::clean_text;
pub use self::schema::FormatSchema;

/// A parsed subtitle document: the raw lines plus the dialogue records found in them
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// Source filename
    pub source_file: PathBuf,

    /// Encoding the source was decoded with
    pub encoding: SourceEncoding,

    /// Raw lines, split on `\n` (a trailing `\r` stays on its line)
    lines: Vec<String>,

    /// Dialogue records in document order
    pub records: Vec<DialogueRecord>,

    /// Dialogue lines that could not be parsed
    pub skipped: Vec<SubtitleError>,
}

impl SubtitleDocument {
    /// Read and parse a subtitle file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let decoded = FileManager::read_subtitle_file(path)
            .with_context(|| format!("Failed to load subtitle file: {}", path.display()))?;
        Ok(Self::from_decoded(path.to_path_buf(), decoded))
    }

    /// Parse an already decoded file
    pub fn from_decoded(source_file: PathBuf, decoded: DecodedFile) -> Self {
        let mut document = Self::parse_str(source_file, &decoded.content);
        document.encoding = decoded.encoding;
        document
    }

    /// Parse document content held in memory
    pub fn parse_str(source_file: PathBuf, content: &str) -> Self {
        let lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for candidate in schema::scan_events(&lines) {
            match dialogue::parse_dialogue(&candidate) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    debug!("Skipping unparsed dialogue: {}", e);
                    skipped.push(e);
                }
            }
        }

        if !skipped.is_empty() {
            warn!("{} dialogue line(s) could not be parsed and are left unchanged", skipped.len());
        }

        Self {
            source_file,
            encoding: SourceEncoding::Utf8,
            lines,
            records,
            skipped,
        }
    }

    /// Raw lines of the document
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of raw lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Cleaned dialogue texts in record order
    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.cleaned_text.clone()).collect()
    }

    /// Render the document with one translated text per record
    pub fn render_translated(&self, translations: &[String]) -> String {
        rewriter::rewrite_lines(&self.lines, &self.records, translations).join("\n")
    }

    /// Render the translated document and write it to `path`.
    ///
    /// The output is UTF-8; a byte-order mark is written when the source had one.
    pub fn write_translated<P: AsRef<Path>>(&self, path: P, translations: &[String]) -> Result<()> {
        let content = self.render_translated(translations);
        FileManager::write_subtitle_file(path, &content, self.encoding.has_bom())
    }
}
