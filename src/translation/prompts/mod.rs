/*!
 * Prompt construction for subtitle translation.
 *
 * This module provides:
 * - The system prompt template and its rendering
 * - Numbering of a chunk into the user message
 * - The completion budget of a request
 */

pub mod templates;

// Re-export main types
pub use templates::{max_tokens_for, number_texts, PromptTemplate};
