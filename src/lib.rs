/*!
 * # assai - AI translation of Advanced SubStation Alpha subtitles
 *
 * A Rust library for translating the dialogue of ASS/SSA subtitle files
 * using AI, leaving every other byte of the document untouched.
 *
 * ## Features
 *
 * - Parse the `[Events]` section against its `Format:` schema
 * - Strip override tags and line-break escapes from dialogue text
 * - Translate in numbered chunks using various AI providers:
 *   - OpenAI API
 *   - Anthropic API
 *   - LM Studio (OpenAI-compatible local server)
 * - Reconcile replies whose line count does not match the request
 * - Rewrite only the `Text` field of translated dialogue lines
 * - Dry-run analysis with token and cost estimates
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle document handling:
 *   - `subtitle_processor::schema`: `[Events]` scanning and `Format:` lines
 *   - `subtitle_processor::dialogue`: Dialogue records
 *   - `subtitle_processor::sanitizer`: Markup removal
 *   - `subtitle_processor::rewriter`: Document reconstruction
 * - `translation`: AI-powered translation:
 *   - `translation::core`: Backend contract and provider-backed service
 *   - `translation::planner`: Filtering and chunk planning
 *   - `translation::reconcile`: Numbered reply parsing and repair
 *   - `translation::batch`: Sequential chunk processing
 * - `analysis`: Dry-run report
 * - `file_utils`: File system operations and encoding detection
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for the LLM providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analysis;
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{DialogueRecord, FormatSchema, SubtitleDocument};
pub use translation::{BatchTranslator, TranslationBackend, TranslationService};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
