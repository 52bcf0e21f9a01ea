use anyhow::{Result, Context, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::fs::OpenOptions;
use std::io::Write;
use chrono::Local;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::warn;

use crate::errors::SubtitleError;

// @module: File and directory utilities

/// Extensions recognised as SubStation Alpha subtitles
pub const SUBTITLE_EXTENSIONS: [&str; 2] = ["ass", "ssa"];

/// UTF-8 byte-order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a subtitle file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8 without byte-order mark
    Utf8,
    /// UTF-8 with byte-order mark
    Utf8Bom,
    /// Single-byte Western fallback
    Windows1252,
}

impl SourceEncoding {
    /// Whether the source started with a byte-order mark
    pub fn has_bom(&self) -> bool {
        matches!(self, Self::Utf8Bom)
    }
}

/// Content of a decoded subtitle file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    /// Decoded text, without byte-order mark
    pub content: String,
    /// Encoding that succeeded
    pub encoding: SourceEncoding,
}

/// Decode raw subtitle bytes: UTF-8 (BOM optional) first, Windows-1252 otherwise
pub fn decode_subtitle_bytes(bytes: &[u8]) -> Result<DecodedFile, SubtitleError> {
    let (body, has_bom) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) if encoding == UTF_8 => (&bytes[bom_length..], true),
        _ => (bytes, false),
    };

    if let Some(content) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        let encoding = if has_bom { SourceEncoding::Utf8Bom } else { SourceEncoding::Utf8 };
        return Ok(DecodedFile { content: content.into_owned(), encoding });
    }

    warn!("File is not valid UTF-8, falling back to Windows-1252");
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|content| DecodedFile {
            content: content.into_owned(),
            encoding: SourceEncoding::Windows1252,
        })
        .ok_or_else(|| SubtitleError::Encoding("neither UTF-8 nor Windows-1252".to_string()))
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for a translated subtitle, `<stem>_<language><.ext>` next to the input
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        let mut output_filename = format!("{}_{}", stem, target_language.to_lowercase());
        if let Some(extension) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&extension.to_string_lossy());
        }

        input_file.with_file_name(output_filename)
    }

    /// Whether the path has a SubStation Alpha extension
    pub fn is_subtitle_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Find subtitle files in a directory, recursively, in a stable order
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_subtitle_file(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a subtitle file, decoding it as UTF-8 or Windows-1252
    pub fn read_subtitle_file<P: AsRef<Path>>(path: P) -> Result<DecodedFile> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(decode_subtitle_bytes(&bytes)?)
    }

    /// Write subtitle content as UTF-8, optionally prefixed with a byte-order mark
    pub fn write_subtitle_file<P: AsRef<Path>>(path: P, content: &str, with_bom: bool) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let mut bytes = Vec::with_capacity(content.len() + UTF8_BOM.len());
        if with_bom {
            bytes.extend_from_slice(UTF8_BOM);
        }
        bytes.extend_from_slice(content.as_bytes());

        fs::write(path, bytes)
            .with_context(|| format!("Failed to write to file: {:?}", path))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Fail early with a readable message when an input path is missing
    pub fn require_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }
        Ok(())
    }
}
