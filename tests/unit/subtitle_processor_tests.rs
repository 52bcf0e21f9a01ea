/*!
 * Tests for subtitle document parsing and rewriting
 */

use std::path::PathBuf;

use assai::errors::SubtitleError;
use assai::subtitle_processor::{clean_text, SubtitleDocument};
use crate::common;

fn parse(content: &str) -> SubtitleDocument {
    SubtitleDocument::parse_str(PathBuf::from("test.ass"), content)
}

/// Test that only dialogue inside the events section is extracted
#[test]
fn test_parse_str_withFullDocument_shouldExtractDialogueInOrder() {
    let content = common::ass_document(&[r"{\i1}Hello there{\i0}", r"Second\Nline", "Third, with comma"]);
    let document = parse(&content);

    assert_eq!(document.records.len(), 3);
    assert_eq!(document.texts(), vec!["Hello there", "Second line", "Third, with comma"]);
    assert!(document.skipped.is_empty());

    // Lines are strictly increasing
    let indices: Vec<usize> = document.records.iter().map(|r| r.line_index).collect();
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

/// Test that a dialogue line before the events section is ignored
#[test]
fn test_parse_str_withDialogueOutsideEvents_shouldIgnoreIt() {
    let content = "[Script Info]\nDialogue: 0,0:00:00.00,0:00:01.00,Stray\n\
[Events]\nFormat: Start, End, Text\nDialogue: 0:00:00.00,0:00:01.00,Inside";
    let document = parse(content);

    assert_eq!(document.texts(), vec!["Inside"]);
}

/// Test that leaving the events section resets the schema
#[test]
fn test_parse_str_withSecondEventsWithoutFormat_shouldRecordMissingSchema() {
    let content = "[Events]\nFormat: Start, End, Text\nDialogue: 1,2,First\n\
[Fonts]\n[Events]\nDialogue: 1,2,Orphan";
    let document = parse(content);

    assert_eq!(document.texts(), vec!["First"]);
    assert_eq!(document.skipped, vec![SubtitleError::MissingSchema { line: 6 }]);
}

/// Test the field-order invariance of the text column
#[test]
fn test_parse_str_withTextNotLast_shouldUseTextColumn() {
    let content = "[Events]\nFormat: Text, Start, End\nDialogue: Hi there,0:00:01.00,0:00:02.00";
    let document = parse(content);

    assert_eq!(document.texts(), vec!["Hi there"]);
    assert_eq!(document.records[0].fields.get("Start"), Some("0:00:01.00"));
}

/// Test that malformed dialogue is skipped and kept unchanged
#[test]
fn test_parse_str_withTooFewFields_shouldSkipAndPreserveLine() {
    let content = "[Events]\nFormat: Layer, Start, End, Text\nDialogue: 0,0:00:01.00\nDialogue: 0,1,2,Fine";
    let document = parse(content);

    assert_eq!(document.texts(), vec!["Fine"]);
    assert!(matches!(
        document.skipped[0],
        SubtitleError::MalformedDialogue { line: 3, expected: 4, found: 2 }
    ));

    let rendered = document.render_translated(&["Bien".to_string()]);
    assert_eq!(rendered, "[Events]\nFormat: Layer, Start, End, Text\nDialogue: 0,0:00:01.00\nDialogue: 0,1,2,Bien");
}

/// Test that text made only of tags yields no record
#[test]
fn test_parse_str_withTagOnlyText_shouldYieldNoRecord() {
    let content = "[Events]\nFormat: Start, End, Text\nDialogue: 1,2,{\\fad(100,100)}\nDialogue: 1,2,Words";
    let document = parse(content);

    assert_eq!(document.records.len(), 1);
    assert_eq!(document.records[0].line_index, 3);
}

/// Test a rewrite with the Bonjour monde example
#[test]
fn test_render_translated_withOneRecord_shouldReplaceOnlyText() {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Text\nDialogue: 0,0:00:01.00,0:00:02.00,Default,{\\i1}Hello world{\\i0}";
    let document = parse(content);
    assert_eq!(document.texts(), vec!["Hello world"]);

    let rendered = document.render_translated(&["Bonjour monde".to_string()]);
    let last = rendered.lines().last().unwrap();
    assert_eq!(last, "Dialogue: 0,0:00:01.00,0:00:02.00,Default,Bonjour monde");
}

/// Test that identical translations keep the raw line and its markup
#[test]
fn test_render_translated_withSourceTexts_shouldBeByteIdentical() {
    let content = common::ass_document(&[r"{\b1}Bold{\b0} move", "Plain text", "Ok"]);
    let document = parse(&content);

    assert_eq!(document.render_translated(&document.texts()), content);
}

/// Test that CRLF line endings survive a rewrite
#[test]
fn test_render_translated_withCrlf_shouldKeepCarriageReturns() {
    let content = "[Events]\r\nFormat: Start, End, Text\r\nDialogue: 1,2,Hello\r\nDialogue: 3,4,World\r\n";
    let document = parse(content);
    assert_eq!(document.texts(), vec!["Hello", "World"]);

    let rendered = document.render_translated(&["Salut".to_string(), "World".to_string()]);
    assert_eq!(
        rendered,
        "[Events]\r\nFormat: Start, End, Text\r\nDialogue: 1,2,Salut\r\nDialogue: 3,4,World\r\n"
    );
}

/// Test that fewer translations leave the remaining lines unchanged
#[test]
fn test_render_translated_withMissingTranslations_shouldKeepRemainingLines() {
    let content = "[Events]\nFormat: Start, End, Text\nDialogue: 1,2,One\nDialogue: 3,4,Two";
    let document = parse(content);

    let rendered = document.render_translated(&["Un".to_string()]);
    assert_eq!(rendered, "[Events]\nFormat: Start, End, Text\nDialogue: 1,2,Un\nDialogue: 3,4,Two");
}

/// Test that cleaning is idempotent
#[test]
fn test_clean_text_appliedTwice_shouldBeStable() {
    let samples = [r"{\i1}Hi{\i0}\N  there", "  spaced   out ", r"{unclosed tag", r"a\Nb\Nc"];
    for sample in samples {
        let once = clean_text(sample);
        assert_eq!(clean_text(&once), once, "cleaning {:?} twice changed it", sample);
    }
}

/// Test that the document keeps every raw line
#[test]
fn test_lines_withTrailingNewline_shouldKeepEmptyLastLine() {
    let document = parse("[Events]\nFormat: Start, End, Text\n");

    assert_eq!(document.line_count(), 3);
    assert_eq!(document.lines()[2], "");
    assert!(document.records.is_empty());
}
