/*!
 * Translation of subtitle dialogue using AI providers.
 *
 * This module contains the core functionality for translating cleaned
 * dialogue texts. It is split into several submodules:
 *
 * - `core`: Backend contract, provider-backed service, token accounting
 * - `planner`: Filtering of short texts and chunk planning
 * - `prompts`: Prompt template, numbering and completion budget
 * - `reconcile`: Parsing of numbered replies and count-mismatch repair
 * - `pacing`: Model tiers and the delay between requests
 * - `batch`: Sequential chunk loop and merge
 */

// Re-export main types for easier usage
pub use self::batch::{BatchRunResult, BatchSettings, BatchTranslator, ChunkOutcome};
pub use self::core::{
    BackendReply, LogEntry, TokenUsageStats, TranslationBackend, TranslationRequest, TranslationService,
};
pub use self::pacing::{ModelTier, Pacer};
pub use self::planner::{BatchPlan, IndexMap};
pub use self::reconcile::{Reconciled, ReplyStatus};

// Submodules
pub mod batch;
pub mod core;
pub mod pacing;
pub mod planner;
pub mod prompts;
pub mod reconcile;
