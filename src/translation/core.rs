/*!
 * Core translation service implementation.
 *
 * This module defines the `TranslationBackend` contract the batch translator
 * talks to, and the `TranslationService` that fulfils it with the configured
 * AI provider.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

/// One chunk submitted for translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Source language name used in the prompt
    pub source_language: String,

    /// Target language name used in the prompt
    pub target_language: String,

    /// Rendered system prompt
    pub system_prompt: String,

    /// The chunk as `N. text` lines
    pub numbered_texts: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion budget
    pub max_tokens: u32,
}

/// Raw reply of a backend with the token counts it reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReply {
    /// Reply text
    pub text: String,

    /// Prompt tokens, when reported
    pub prompt_tokens: Option<u64>,

    /// Completion tokens, when reported
    pub completion_tokens: Option<u64>,
}

impl BackendReply {
    /// Reply without token accounting
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Request/response contract of a translation capability
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate one numbered chunk
    async fn translate(&self, request: &TranslationRequest) -> Result<BackendReply, ProviderError>;

    /// Provider name for logs and summaries
    fn provider_name(&self) -> String;

    /// Model name for logs and summaries
    fn model_name(&self) -> String;
}

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Number of requests sent
    pub requests: usize,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }

    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            requests: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    /// Add token usage numbers
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    /// Account for one request and how long it took
    pub fn record_request(&mut self, duration: Duration) {
        self.requests += 1;
        self.api_duration += duration;
    }

    /// Fold the counters of another run into this one
    pub fn merge(&mut self, other: &TokenUsageStats) {
        self.add_token_usage(Some(other.prompt_tokens), Some(other.completion_tokens));
        self.requests += other.requests;
        self.api_duration += other.api_duration;
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        // Use the API duration for rate calculation, with fallback to elapsed time
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Requests: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            elapsed_minutes,
            api_minutes,
            self.tokens_per_minute()
        )
    }
}

/// Log entry for capturing translation process logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

impl LogEntry {
    /// Create a log entry
    pub fn new(level: &str, message: impl Into<String>) -> Self {
        Self {
            level: level.to_string(),
            message: message.into(),
        }
    }
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Translation backend talking to the configured AI provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        config.require_credentials()?;

        let endpoint = config.get_endpoint();
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new_with_config(config.get_api_key(), endpoint, timeout_secs),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };

                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new_with_config(api_key, endpoint, timeout_secs),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new_with_config(config.get_api_key(), endpoint, timeout_secs),
            },
        };

        Ok(Self { provider, config })
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate(&self, request: &TranslationRequest) -> Result<BackendReply, ProviderError> {
        let model = self.config.get_model();
        debug!(
            "Sending {} numbered line(s) to {} ({})",
            request.numbered_texts.lines().count(),
            self.config.provider.display_name(),
            model
        );

        match &self.provider {
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let openai_request = OpenAIRequest::new(model)
                    .add_message("system", &request.system_prompt)
                    .add_message("user", &request.numbered_texts)
                    .temperature(request.temperature)
                    .max_tokens(request.max_tokens);

                let response = client.complete(openai_request).await?;
                let usage = response.usage.as_ref();

                Ok(BackendReply {
                    text: OpenAI::extract_text(&response),
                    prompt_tokens: usage.map(|u| u.prompt_tokens as u64),
                    completion_tokens: usage.map(|u| u.completion_tokens as u64),
                })
            }
            TranslationProviderImpl::Anthropic { client } => {
                let anthropic_request = AnthropicRequest::new(model, request.max_tokens)
                    .system(&request.system_prompt)
                    .add_message("user", &request.numbered_texts)
                    .temperature(request.temperature);

                let response = client.complete(anthropic_request).await?;

                Ok(BackendReply {
                    text: Anthropic::extract_text(&response),
                    prompt_tokens: Some(response.usage.input_tokens as u64),
                    completion_tokens: Some(response.usage.output_tokens as u64),
                })
            }
        }
    }

    fn provider_name(&self) -> String {
        self.config.provider.display_name().to_string()
    }

    fn model_name(&self) -> String {
        self.config.get_model()
    }
}
