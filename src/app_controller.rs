use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};
use parking_lot::Mutex;

use crate::analysis::{self, AnalysisReport};
use crate::app_config::Config;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{
    BatchRunResult, BatchSettings, BatchTranslator, LogEntry, ModelTier, Pacer, TokenUsageStats,
    TranslationBackend, TranslationService,
};
use crate::translation::prompts::PromptTemplate;

// @module: Application controller for subtitle processing

/// Name of the issues log written next to translated files
pub const ISSUES_LOG_FILE: &str = "assai.issues.log";

/// What happened to one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// The translated document was written
    Translated {
        /// Written file
        output_path: PathBuf,
        /// Chunk results of the run
        run: BatchRunResult,
    },
    /// An output already existed and overwriting was not requested
    Skipped {
        /// Existing output file
        output_path: PathBuf,
    },
}

/// Totals over a file or folder run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files translated and written
    pub translated: usize,
    /// Files skipped because their output exists
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
    /// Token usage over every file
    pub token_stats: TokenUsageStats,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Controller configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Public method to write logs to a file for testing purposes
    pub fn write_translation_logs(&self, logs: &[LogEntry], file_path: &Path, translation_context: &str) -> Result<()> {
        self.write_logs_to_file(logs, file_path, translation_context)
    }

    /// Price and pacing class of the configured model
    pub fn model_tier(&self) -> ModelTier {
        ModelTier::classify(self.config.translation.provider, &self.config.translation.get_model())
    }

    /// Batch settings derived from the configuration
    pub fn batch_settings(&self) -> BatchSettings {
        let common = &self.config.translation.common;
        BatchSettings {
            source_language: language_utils::display_name(&self.config.source_language),
            target_language: language_utils::display_name(&self.config.target_language),
            prompt: PromptTemplate::new(&common.system_prompt),
            batch_size: common.batch_size,
            temperature: common.temperature,
            max_completion_tokens: common.max_completion_tokens,
            pacer: Pacer::for_model(
                self.config.translation.provider,
                &self.config.translation.get_model(),
                common.pacing_delay_ms,
            ),
        }
    }

    /// Output path of the translation of `input_file`
    pub fn output_path_for(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, &self.config.target_language)
    }

    /// Subtitle files an input path stands for: the file itself or every subtitle in a folder
    pub fn collect_inputs(&self, input: &Path) -> Result<Vec<PathBuf>> {
        FileManager::require_exists(input)?;

        if input.is_dir() {
            let files = FileManager::find_subtitle_files(input)?
                .into_iter()
                .filter(|path| !self.is_own_output(path))
                .collect::<Vec<_>>();
            if files.is_empty() {
                return Err(anyhow!("No subtitle files found in directory: {:?}", input));
            }
            Ok(files)
        } else {
            Ok(vec![input.to_path_buf()])
        }
    }

    /// Parse every input and report what a run would do
    pub fn analyze(&self, input: &Path) -> Result<Vec<AnalysisReport>> {
        let tier = self.model_tier();
        let model = self.config.translation.get_model();

        self.collect_inputs(input)?
            .iter()
            .map(|path| {
                let document = SubtitleDocument::load(path)?;
                Ok(analysis::analyze(&document, &model, tier, self.config.translation.common.batch_size))
            })
            .collect()
    }

    /// Run the main workflow with the configured provider
    pub async fn run(&self, input: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        // Fails on a missing API key before any file is touched
        let translation_service = TranslationService::new(self.config.translation.clone())?;

        info!("assai: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model());

        self.run_with_backend(&input, &translation_service, force_overwrite).await
    }

    /// Run the workflow on a file or folder with the given backend
    pub async fn run_with_backend(
        &self,
        input: &Path,
        backend: &dyn TranslationBackend,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let inputs = self.collect_inputs(input)?;
        let folder_mode = input.is_dir();

        let multi_progress = MultiProgress::new();
        let folder_pb = folder_mode.then(|| {
            let pb = multi_progress.add(ProgressBar::new(inputs.len() as u64));
            pb.set_style(Self::progress_style("files"));
            pb.set_message("Processing files");
            pb
        });

        let mut summary = RunSummary {
            token_stats: TokenUsageStats::with_provider_info(backend.provider_name(), backend.model_name()),
            ..RunSummary::default()
        };

        for file in &inputs {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            if let Some(pb) = &folder_pb {
                pb.set_message(format!("Processing: {}", file_name));
            }

            match self.translate_file(file, backend, &multi_progress, force_overwrite).await {
                Ok(FileOutcome::Translated { run, .. }) => {
                    summary.translated += 1;
                    summary.token_stats.merge(&run.token_stats);
                }
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) if folder_mode => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }

            if let Some(pb) = &folder_pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = &folder_pb {
            pb.finish_with_message("Folder processing complete");

            let summary_message = format!("Folder processing completed: {} processed, {} skipped, {} errors",
                summary.translated, summary.skipped, summary.failed);
            info!("{}", summary_message);

            let log_file_path = input.join(ISSUES_LOG_FILE);
            let context = format!("Folder Processing: {} ({})",
                input.display(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
            let folder_logs = vec![LogEntry::new(
                "INFO",
                format!("{} - Duration: {}", summary_message, Self::format_duration(start_time.elapsed())),
            )];

            if let Err(e) = self.write_logs_to_file(&folder_logs, &log_file_path, &context) {
                warn!("Failed to write folder logs to file: {}", e);
            }
        }

        if summary.token_stats.total_tokens > 0 {
            info!("{}", summary.token_stats.summary());
        }
        info!("Done in {}", Self::format_duration(start_time.elapsed()));

        Ok(summary)
    }

    /// Translate one subtitle file and write `<stem>_<target>.<ext>` next to it
    pub async fn translate_file(
        &self,
        input_file: &Path,
        backend: &dyn TranslationBackend,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        let output_path = self.output_path_for(input_file);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {}, translation already exists (use -f to force overwrite)", input_file.display());
            return Ok(FileOutcome::Skipped { output_path });
        }

        let document = SubtitleDocument::load(input_file)?;
        if document.records.is_empty() {
            return Err(SubtitleError::NoDialogue(input_file.display().to_string()).into());
        }
        info!("{}: {} dialogue line(s)", input_file.display(), document.records.len());

        let translation_start_time = Instant::now();
        let run = self.translate_document(&document, backend, multi_progress).await;

        document.write_translated(&output_path, &run.translations)
            .with_context(|| format!("Failed to write translation of {}", input_file.display()))?;

        if run.has_issues() {
            info!("Translation completed with {} failed and {} repaired chunk(s)",
                run.failed_chunks(), run.repaired_chunks());
        }

        info!("Success: {} ({})", output_path.display(), Self::format_duration(translation_start_time.elapsed()));
        Ok(FileOutcome::Translated { output_path, run })
    }

    /// Translate the dialogue of a parsed document, reporting progress per chunk
    async fn translate_document(
        &self,
        document: &SubtitleDocument,
        backend: &dyn TranslationBackend,
        multi_progress: &MultiProgress,
    ) -> BatchRunResult {
        let translator = BatchTranslator::new(backend, self.batch_settings());
        let texts = document.texts();

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(Self::progress_style("chunks"));
        progress_bar.set_message("Translating");

        // Log capture for storing warnings during translation
        let log_capture = Arc::new(Mutex::new(Vec::new()));

        let pb = progress_bar.clone();
        let run = translator.translate_texts(&texts, Arc::clone(&log_capture), move |completed, total| {
            pb.set_length(total as u64);
            pb.set_position(completed as u64);
        }).await;

        // Clear the bar so only the folder bar remains when processing several files
        progress_bar.finish_and_clear();

        let logs = log_capture.lock().clone();
        for log in &logs {
            debug!("[{}] {}", log.level, log.message);
        }

        if !logs.is_empty() {
            let output_dir = document.source_file.parent().unwrap_or_else(|| Path::new(""));
            let log_file_path = output_dir.join(ISSUES_LOG_FILE);
            let context = format!("{} - {} - {} ({})",
                document.source_file.display(),
                backend.provider_name(),
                backend.model_name(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

            if let Err(e) = self.write_logs_to_file(&logs, &log_file_path, &context) {
                warn!("Failed to write logs to file: {}", e);
            } else {
                info!("Issues written to {}", log_file_path.display());
            }
        }

        run
    }

    fn progress_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}", unit))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    // A `<stem>_<target>.<ext>` file next to its `<stem>.<ext>` source is an earlier output
    fn is_own_output(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            return false;
        };
        let Some((source_stem, suffix)) = stem.rsplit_once('_') else {
            return false;
        };
        if !language_utils::language_codes_match(suffix, &self.config.target_language) {
            return false;
        }

        let source_name = match path.extension() {
            Some(ext) => format!("{}.{}", source_stem, ext.to_string_lossy()),
            None => source_stem.to_string(),
        };
        path.with_file_name(source_name).exists()
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Append translation logs to a log file
    fn write_logs_to_file(&self, logs: &[LogEntry], file_path: &Path, translation_context: &str) -> Result<()> {
        FileManager::append_to_log_file(file_path, &format!("Translation Log - {}", translation_context))?;

        for entry in logs {
            FileManager::append_to_log_file(file_path, &format!("[{}] {}", entry.level, entry.message))?;
        }

        Ok(())
    }
}
