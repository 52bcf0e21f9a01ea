/*!
 * Dry-run analysis of a subtitle document.
 *
 * Reports what a translation run would do without contacting any provider:
 * a numbered preview of the dialogue, the number of chunks and a rough
 * token and cost estimate.
 */

use std::fmt;
use std::path::PathBuf;

use crate::subtitle_processor::SubtitleDocument;
use crate::translation::pacing::ModelTier;
use crate::translation::planner::BatchPlan;

/// Preview texts longer than this many characters are cut
pub const PREVIEW_MAX_CHARS: usize = 120;

/// Rough number of characters per token used for estimates
pub const CHARS_PER_TOKEN: usize = 3;

/// Summary of a document as seen by the translator
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Analysed file
    pub source_file: PathBuf,

    /// One `[NNN] text` line per dialogue record
    pub preview: Vec<String>,

    /// Number of dialogue records
    pub dialogue_lines: usize,

    /// Records long enough to be submitted
    pub translatable_lines: usize,

    /// Dialogue lines that could not be parsed
    pub unparsed_lines: usize,

    /// Characters of cleaned dialogue text
    pub total_chars: usize,

    /// `total_chars / CHARS_PER_TOKEN`
    pub estimated_tokens: usize,

    /// Estimated price in US dollars
    pub estimated_cost: f64,

    /// Requests the run would send
    pub chunk_count: usize,

    /// Model the estimate is for
    pub model: String,

    /// Price class of the model
    pub tier: ModelTier,
}

/// Format one preview line, cutting long texts
pub fn preview_line(index: usize, text: &str) -> String {
    if text.chars().count() > PREVIEW_MAX_CHARS {
        let cut: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("[{:03}] {}...", index + 1, cut)
    } else {
        format!("[{:03}] {}", index + 1, text)
    }
}

/// Analyse a parsed document for a model and batch size
pub fn analyze(document: &SubtitleDocument, model: &str, tier: ModelTier, batch_size: usize) -> AnalysisReport {
    let texts = document.texts();
    let plan = BatchPlan::new(&texts, batch_size);

    let total_chars: usize = texts.iter().map(|t| t.chars().count()).sum();
    let estimated_tokens = total_chars / CHARS_PER_TOKEN;

    AnalysisReport {
        source_file: document.source_file.clone(),
        preview: texts.iter().enumerate().map(|(i, t)| preview_line(i, t)).collect(),
        dialogue_lines: texts.len(),
        translatable_lines: plan.filtered().len(),
        unparsed_lines: document.skipped.len(),
        total_chars,
        estimated_tokens,
        estimated_cost: estimated_tokens as f64 * tier.cost_per_token(),
        chunk_count: plan.chunk_count(),
        model: model.to_string(),
        tier,
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.preview {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Total: {} dialogue line(s), {} to translate in {} request(s) ({} estimated tokens)",
            self.dialogue_lines, self.translatable_lines, self.chunk_count, self.estimated_tokens
        )?;
        if self.unparsed_lines > 0 {
            writeln!(f, "Unparsed dialogue line(s) left unchanged: {}", self.unparsed_lines)?;
        }
        write!(f, "Estimated cost: ${:.4} with {} ({})", self.estimated_cost, self.model, self.tier)
    }
}
