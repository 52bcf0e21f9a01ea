/*!
 * Reconstruction of a subtitle document with translated dialogue text.
 */

use log::warn;

use super::dialogue::DialogueRecord;

/// Rewrite the raw lines of a document, substituting translated text into the
/// dialogue lines the records were parsed from.
///
/// The cursor moves over `records` in order; a line is rewritten only when it is
/// the source line of the record under the cursor. Every other line, including
/// dialogue lines that produced no record, is copied unchanged. When a
/// translation equals the record's cleaned text the line is copied unchanged too,
/// so untranslated dialogue keeps its markup.
pub fn rewrite_lines<S: AsRef<str>>(
    lines: &[S],
    records: &[DialogueRecord],
    translations: &[String],
) -> Vec<String> {
    if translations.len() != records.len() {
        warn!(
            "Got {} translations for {} dialogue lines, extra lines are left unchanged",
            translations.len(),
            records.len()
        );
    }

    let mut output = Vec::with_capacity(lines.len());
    let mut cursor = 0;

    for (line_index, line) in lines.iter().enumerate() {
        let line = line.as_ref();

        let current = records
            .get(cursor)
            .filter(|record| record.line_index == line_index);

        let Some(record) = current else {
            output.push(line.to_string());
            continue;
        };
        cursor += 1;

        match translations.get(cursor - 1) {
            Some(translated) if *translated != record.cleaned_text => {
                let mut rewritten = record.to_line_with_text(translated);
                if line.ends_with('\r') {
                    rewritten.push('\r');
                }
                output.push(rewritten);
            }
            _ => output.push(line.to_string()),
        }
    }

    output
}
