/*!
 * Batch translation processing.
 *
 * The batch translator plans the chunks of a run, submits them one at a time
 * in document order, reconciles every reply with its chunk and merges the
 * results back into the original index space. A failed chunk never aborts the
 * run: its texts are carried through untranslated.
 */

use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::TranslationError;

use super::core::{LogEntry, TokenUsageStats, TranslationBackend, TranslationRequest};
use super::pacing::Pacer;
use super::planner::BatchPlan;
use super::prompts::{max_tokens_for, number_texts, PromptTemplate};
use super::reconcile::{reconcile, ReplyStatus};

/// Settings of one batch run
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Source language name used in the prompt
    pub source_language: String,

    /// Target language name used in the prompt
    pub target_language: String,

    /// System prompt template
    pub prompt: PromptTemplate,

    /// Maximum number of texts per chunk
    pub batch_size: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound of the completion budget
    pub max_completion_tokens: u32,

    /// Delay between consecutive chunks
    pub pacer: Pacer,
}

impl BatchSettings {
    /// Settings with the defaults of a run between two languages
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            prompt: PromptTemplate::default(),
            batch_size: 10,
            temperature: 0.1,
            max_completion_tokens: 1500,
            pacer: Pacer::none(),
        }
    }
}

/// Result of one chunk
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The backend answered; one translation per submitted text
    Translated {
        translations: Vec<String>,
        status: ReplyStatus,
    },
    /// The backend failed; the chunk keeps its source texts
    Failed { error: TranslationError },
}

impl ChunkOutcome {
    /// Texts to merge for this chunk
    pub fn texts(&self, chunk: &[String]) -> Vec<String> {
        match self {
            Self::Translated { translations, .. } => translations.clone(),
            Self::Failed { .. } => chunk.to_vec(),
        }
    }

    /// Whether the backend failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the reply needed the count-mismatch repair
    pub fn is_repaired(&self) -> bool {
        matches!(self, Self::Translated { status: ReplyStatus::Repaired { .. }, .. })
    }
}

/// Result of a whole batch run
#[derive(Debug)]
pub struct BatchRunResult {
    /// One text per input text, translated where possible
    pub translations: Vec<String>,

    /// Outcome of every chunk, in submission order
    pub outcomes: Vec<ChunkOutcome>,

    /// Token usage of the run
    pub token_stats: TokenUsageStats,

    /// Texts that were too short to submit
    pub skipped_texts: usize,
}

impl BatchRunResult {
    /// Number of chunks whose request failed
    pub fn failed_chunks(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Number of chunks whose reply was repaired
    pub fn repaired_chunks(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_repaired()).count()
    }

    /// Whether any chunk failed or was repaired
    pub fn has_issues(&self) -> bool {
        self.failed_chunks() > 0 || self.repaired_chunks() > 0
    }
}

/// Batch translator for processing cleaned dialogue texts in chunks
pub struct BatchTranslator<'a> {
    /// The translation backend to use
    backend: &'a dyn TranslationBackend,

    /// Run settings
    settings: BatchSettings,
}

impl<'a> BatchTranslator<'a> {
    /// Create a new batch translator
    pub fn new(backend: &'a dyn TranslationBackend, settings: BatchSettings) -> Self {
        Self { backend, settings }
    }

    /// Run settings
    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Translate a sequence of cleaned texts.
    ///
    /// The result has exactly one text per input; texts that were filtered out
    /// or belong to a failed chunk come back unchanged. `progress_callback`
    /// receives `(completed_chunks, total_chunks)` after every chunk.
    pub async fn translate_texts(
        &self,
        texts: &[String],
        log_capture: Arc<Mutex<Vec<LogEntry>>>,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> BatchRunResult {
        let plan = BatchPlan::new(texts, self.settings.batch_size);
        let total_chunks = plan.chunk_count();
        let mut token_stats = TokenUsageStats::with_provider_info(
            self.backend.provider_name(),
            self.backend.model_name(),
        );

        info!(
            "Translating {} of {} dialogue line(s) in {} chunk(s)",
            plan.filtered().len(),
            texts.len(),
            total_chunks
        );

        let system_prompt = self
            .settings
            .prompt
            .render(&self.settings.source_language, &self.settings.target_language);

        let mut outcomes = Vec::with_capacity(total_chunks);
        let mut filtered_results = Vec::with_capacity(plan.filtered().len());

        for (chunk_index, chunk) in plan.chunks().enumerate() {
            if chunk_index > 0 {
                self.settings.pacer.wait().await;
            }

            let outcome = self
                .translate_chunk(chunk_index, chunk, &system_prompt, &mut token_stats, &log_capture)
                .await;

            filtered_results.extend(outcome.texts(chunk));
            outcomes.push(outcome);
            progress_callback(chunk_index + 1, total_chunks);
        }

        BatchRunResult {
            translations: plan.scatter(&filtered_results, texts),
            outcomes,
            token_stats,
            skipped_texts: plan.skipped_count(),
        }
    }

    /// Submit one chunk and reconcile the reply
    async fn translate_chunk(
        &self,
        chunk_index: usize,
        chunk: &[String],
        system_prompt: &str,
        token_stats: &mut TokenUsageStats,
        log_capture: &Mutex<Vec<LogEntry>>,
    ) -> ChunkOutcome {
        let chunk_number = chunk_index + 1;
        let numbered_texts = number_texts(chunk);
        let request = TranslationRequest {
            source_language: self.settings.source_language.clone(),
            target_language: self.settings.target_language.clone(),
            system_prompt: system_prompt.to_string(),
            max_tokens: max_tokens_for(&numbered_texts, self.settings.max_completion_tokens),
            numbered_texts,
            temperature: self.settings.temperature,
        };

        let start_time = Instant::now();
        let result = self.backend.translate(&request).await;
        token_stats.record_request(start_time.elapsed());

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                let message = format!("Chunk {} failed, keeping source text: {}", chunk_number, e);
                warn!("{}", message);
                log_capture.lock().push(LogEntry::new("WARN", message));
                return ChunkOutcome::Failed { error: e.into() };
            }
        };

        token_stats.add_token_usage(reply.prompt_tokens, reply.completion_tokens);

        if reply.text.trim().is_empty() {
            let message = format!("Chunk {} got an empty reply, keeping source text", chunk_number);
            warn!("{}", message);
            log_capture.lock().push(LogEntry::new("WARN", message));
            return ChunkOutcome::Failed { error: TranslationError::EmptyReply };
        }

        let reconciled = reconcile(&reply.text, chunk);
        match reconciled.status {
            ReplyStatus::Exact => {
                debug!("Chunk {} translated ({} line(s))", chunk_number, chunk.len());
            }
            ReplyStatus::Repaired { numbered, padded } => {
                let message = format!(
                    "Chunk {}: expected {} numbered line(s), got {}; {} line(s) kept from source",
                    chunk_number,
                    chunk.len(),
                    numbered,
                    padded
                );
                warn!("{}", message);
                log_capture.lock().push(LogEntry::new("WARN", message));
            }
        }

        ChunkOutcome::Translated {
            translations: reconciled.translations,
            status: reconciled.status,
        }
    }
}
