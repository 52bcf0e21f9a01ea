/*!
 * Integration tests for the subtitle translation workflow
 */

use std::fs;
use std::sync::Arc;
use anyhow::Result;
use indicatif::MultiProgress;
use parking_lot::Mutex;

use assai::app_controller::{Controller, FileOutcome};
use assai::file_utils::{FileManager, SourceEncoding};
use assai::providers::mock::MockProvider;
use assai::subtitle_processor::SubtitleDocument;
use assai::translation::{BatchSettings, BatchTranslator, TranslationRequest};
use crate::common;

fn bonjour_reply(_request: &TranslationRequest) -> String {
    "1. Bonjour monde".to_string()
}

/// Load, translate and write a document with a scripted reply
#[tokio::test]
async fn test_subtitle_workflow_withSingleLine_shouldWriteTranslatedText() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let content = "[Events]\nFormat: Layer, Start, End, Style, Text\n\
Dialogue: 0,0:00:01.00,0:00:02.00,Default,{\\i1}Hello world{\\i0}\n";
    let input = common::create_test_file(temp_dir.path(), "hello.ass", content)?;

    let document = SubtitleDocument::load(&input)?;
    assert_eq!(document.texts(), vec!["Hello world"]);

    let provider = MockProvider::working().with_custom_response(bonjour_reply);
    let translator = BatchTranslator::new(&provider, BatchSettings::new("English", "French"));
    let run = translator
        .translate_texts(&document.texts(), Arc::new(Mutex::new(Vec::new())), |_, _| {})
        .await;
    assert_eq!(run.translations, vec!["Bonjour monde"]);

    let output = FileManager::generate_output_path(&input, "fr");
    document.write_translated(&output, &run.translations)?;

    let written = FileManager::read_to_string(&output)?;
    assert_eq!(
        written,
        "[Events]\nFormat: Layer, Start, End, Style, Text\n\
Dialogue: 0,0:00:01.00,0:00:02.00,Default,Bonjour monde\n"
    );
    Ok(())
}

/// An echoing provider reproduces the input byte for byte, BOM included
#[tokio::test]
async fn test_subtitle_workflow_withIdentityProvider_shouldRoundTripBytes() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let body = common::ass_document(&[
        r"{\an8}Top line",
        r"First\Nsecond",
        "Ok",
        "Well, this has commas, right?",
        r"{\b1}Bold{\b0}",
    ]);
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(body.as_bytes());
    let input = temp_dir.path().join("episode.ass");
    fs::write(&input, &bytes)?;

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::identity();
    let outcome = controller
        .translate_file(&input, &provider, &MultiProgress::new(), false)
        .await?;

    let FileOutcome::Translated { output_path, run } = outcome else {
        panic!("expected a translated outcome");
    };
    assert!(!run.has_issues());
    assert_eq!(output_path, temp_dir.path().join("episode_fr.ass"));
    assert_eq!(fs::read(&output_path)?, bytes);
    Ok(())
}

/// Columns in an unusual order are rewritten in place
#[tokio::test]
async fn test_subtitle_workflow_withTextFirstFormat_shouldRewriteTextColumn() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let content = "[Events]\nFormat: Text, Start, End\nDialogue: Good morning,0:00:01.00,0:00:02.00";
    let input = common::create_test_file(temp_dir.path(), "order.ass", content)?;

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working();
    controller.translate_file(&input, &provider, &MultiProgress::new(), false).await?;

    let written = FileManager::read_to_string(temp_dir.path().join("order_fr.ass"))?;
    assert_eq!(
        written,
        "[Events]\nFormat: Text, Start, End\nDialogue: [French] Good morning,0:00:01.00,0:00:02.00"
    );
    Ok(())
}

/// Windows line endings and a Windows-1252 source
#[tokio::test]
async fn test_subtitle_workflow_withWindows1252Crlf_shouldWriteUtf8AndKeepCrlf() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("legacy.ssa");
    fs::write(
        &input,
        b"[Events]\r\nFormat: Start, End, Text\r\nDialogue: 1,2,Caf\xE9 au lait\r\nDialogue: 3,4,Ok\r\n",
    )?;

    let document = SubtitleDocument::load(&input)?;
    assert_eq!(document.encoding, SourceEncoding::Windows1252);

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working();
    controller.translate_file(&input, &provider, &MultiProgress::new(), false).await?;

    let written = fs::read(temp_dir.path().join("legacy_fr.ssa"))?;
    let written = String::from_utf8(written)?;
    assert_eq!(
        written,
        "[Events]\r\nFormat: Start, End, Text\r\nDialogue: 1,2,[French] Café au lait\r\nDialogue: 3,4,Ok\r\n"
    );
    Ok(())
}

/// A failed chunk leaves its lines untouched and is logged next to the source
#[tokio::test]
async fn test_subtitle_workflow_withFailingChunk_shouldKeepSourceLinesAndLogIssue() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let texts: Vec<String> = (1..=7).map(|i| format!("Line number {}", i)).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let input = common::create_test_subtitle(temp_dir.path(), "seven.ass", &text_refs)?;

    let mut config = common::test_config();
    config.translation.common.batch_size = 3;
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::intermittent(2);

    let outcome = controller.translate_file(&input, &provider, &MultiProgress::new(), false).await?;
    let FileOutcome::Translated { output_path, run } = outcome else {
        panic!("expected a translated outcome");
    };
    assert_eq!(run.failed_chunks(), 1);

    let document = SubtitleDocument::load(&output_path)?;
    let expected: Vec<String> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| if (3..6).contains(&i) { t.clone() } else { format!("[French] {}", t) })
        .collect();
    assert_eq!(document.texts(), expected);

    let issues = FileManager::read_to_string(temp_dir.path().join("assai.issues.log"))?;
    assert!(issues.contains("Chunk 2 failed"));
    Ok(())
}

/// Documents without dialogue are rejected
#[tokio::test]
async fn test_subtitle_workflow_withNoDialogue_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "empty.ass", &[])?;

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working();
    let result = controller.translate_file(&input, &provider, &MultiProgress::new(), false).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 0);
    assert!(!temp_dir.path().join("empty_fr.ass").exists());
    Ok(())
}
