/*!
 * Common test utilities for the assai test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use assai::app_config::Config;

/// Script info and styles preceding the events of every sample document
pub const SAMPLE_HEADER: &str = "[Script Info]
Title: Sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize
Style: Default,Arial,20
";

/// Route library logs through env_logger in test mode
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build a document with a standard events format and one dialogue line per text
pub fn ass_document(texts: &[&str]) -> String {
    let mut content = String::from(SAMPLE_HEADER);
    content.push_str("\n[Events]\n");
    content.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for (i, text) in texts.iter().enumerate() {
        content.push_str(&format!(
            "Dialogue: 0,0:00:{:02}.00,0:00:{:02}.50,Default,,0,0,0,,{}\n",
            i, i, text
        ));
    }
    content
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str, texts: &[&str]) -> Result<PathBuf> {
    create_test_file(dir, filename, &ass_document(texts))
}

/// Default configuration with an API key and without pacing delays
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "test-key".to_string();
    config.translation.common.pacing_delay_ms = Some(0);
    config
}
