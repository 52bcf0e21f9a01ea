/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;

use assai::file_utils::{decode_subtitle_bytes, FileManager, SourceEncoding};
use crate::common;

/// Test output path generation
#[test]
fn test_generate_output_path_withAssFile_shouldAppendLanguage() {
    let input = PathBuf::from("/videos/episode01.ass");
    let output = FileManager::generate_output_path(&input, "FR");

    assert_eq!(output, PathBuf::from("/videos/episode01_fr.ass"));
}

/// Test subtitle extension detection
#[test]
fn test_is_subtitle_file_withVariousExtensions_shouldMatchAssAndSsa() {
    assert!(FileManager::is_subtitle_file("a.ass"));
    assert!(FileManager::is_subtitle_file("b.SSA"));
    assert!(!FileManager::is_subtitle_file("c.srt"));
    assert!(!FileManager::is_subtitle_file("d"));
}

/// Test recursive subtitle discovery
#[test]
fn test_find_subtitle_files_withNestedDirs_shouldReturnSortedSubtitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.ass", "")?;
    common::create_test_file(temp_dir.path(), "a.ssa", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "c.ass", "")?;

    let files = FileManager::find_subtitle_files(temp_dir.path())?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.ssa", "b.ass", "c.ass"]);
    Ok(())
}

/// Test decoding of UTF-8 content with a byte-order mark
#[test]
fn test_decode_subtitle_bytes_withBom_shouldStripItAndRemember() {
    let decoded = decode_subtitle_bytes(b"\xEF\xBB\xBF[Events]").unwrap();

    assert_eq!(decoded.content, "[Events]");
    assert_eq!(decoded.encoding, SourceEncoding::Utf8Bom);
    assert!(decoded.encoding.has_bom());
}

/// Test the Windows-1252 fallback
#[test]
fn test_decode_subtitle_bytes_withLatin1Bytes_shouldFallBackToWindows1252() {
    let decoded = decode_subtitle_bytes(b"Caf\xE9 cr\xE8me").unwrap();

    assert_eq!(decoded.content, "Café crème");
    assert_eq!(decoded.encoding, SourceEncoding::Windows1252);
}

/// Test writing with and without a byte-order mark
#[test]
fn test_write_subtitle_file_withBomFlag_shouldPrefixBom() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let with_bom = temp_dir.path().join("out/with.ass");
    let without_bom = temp_dir.path().join("without.ass");

    FileManager::write_subtitle_file(&with_bom, "Hi", true)?;
    FileManager::write_subtitle_file(&without_bom, "Hi", false)?;

    assert_eq!(fs::read(&with_bom)?, b"\xEF\xBB\xBFHi".to_vec());
    assert_eq!(fs::read(&without_bom)?, b"Hi".to_vec());
    Ok(())
}

/// Test appending to a log file
#[test]
fn test_append_to_log_file_withTwoEntries_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("run.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = FileManager::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

/// Test the missing input check
#[test]
fn test_require_exists_withMissingPath_shouldFail() {
    assert!(FileManager::require_exists("/definitely/not/here.ass").is_err());
}
