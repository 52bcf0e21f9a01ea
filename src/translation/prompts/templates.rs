/*!
 * Prompt templates for subtitle translation.
 *
 * A request carries a system prompt naming the language pair and the style
 * rules, and a user message listing the chunk as `N. text` lines.
 */

/// System prompt template for subtitle translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for subtitle translation.
    pub const SUBTITLE_TRANSLATOR: &'static str = "You are a professional subtitle translator. \
Translate the following dialogue lines from {source_language} to {target_language}.

RULES:
- Keep English names, brands and expressions when it is appropriate to leave them untranslated
- Use a natural style, never a robotic one
- Adapt the register (formal or informal) to the context
- Preserve the emotional tone of each line
- Reply ONLY with the numbered translations, one per line, in the same order";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default subtitle translator template.
    pub fn subtitle_translator() -> Self {
        Self::new(Self::SUBTITLE_TRANSLATOR)
    }

    /// Render the template with the given variables.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::subtitle_translator()
    }
}

/// Render a chunk as `1. text` lines joined with `\n`
pub fn number_texts<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Completion budget for a request: twice the character length of the
/// numbered texts, capped at `cap`
pub fn max_tokens_for(numbered_texts: &str, cap: u32) -> u32 {
    let doubled = numbered_texts.chars().count().saturating_mul(2);
    u32::try_from(doubled).unwrap_or(u32::MAX).min(cap)
}
