/*!
 * Mock provider implementations for testing.
 *
 * This module provides a scripted translation backend that simulates
 * different behaviors:
 * - `MockProvider::working()` - Answers every numbered line with a tagged translation
 * - `MockProvider::identity()` - Echoes the numbered lines unchanged
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::truncated()` - Drops the last numbered line
 * - `MockProvider::unnumbered()` - Answers without number markers
 * - `MockProvider::empty()` - Answers with an empty reply
 *
 * Every request is recorded so tests can inspect what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::translation::core::{BackendReply, TranslationBackend, TranslationRequest};
use crate::translation::reconcile::strip_number_marker;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Succeeds and returns the submitted texts unchanged
    Identity,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns one numbered line less than requested
    Truncated,
    /// Returns the translations without number markers
    Unnumbered,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests received so far
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that echoes its input
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that drops the last numbered line
    pub fn truncated() -> Self {
        Self::new(MockBehavior::Truncated)
    }

    /// Create a mock that answers without number markers
    pub fn unnumbered() -> Self {
        Self::new(MockBehavior::Unnumbered)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator, used by the working behaviors
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received, in order
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    /// Source texts of a numbered chunk
    pub fn source_texts(request: &TranslationRequest) -> Vec<String> {
        request
            .numbered_texts
            .lines()
            .map(|line| strip_number_marker(line.trim()).to_string())
            .collect()
    }

    /// Reply with every source text passed through `translate`, numbered
    pub fn numbered_reply(request: &TranslationRequest, translate: impl Fn(&str) -> String) -> String {
        Self::source_texts(request)
            .iter()
            .enumerate()
            .map(|(i, text)| format!("{}. {}", i + 1, translate(text)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn tagged(request: &TranslationRequest, text: &str) -> String {
        format!("[{}] {}", request.target_language, text)
    }

    fn working_reply(&self, request: &TranslationRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => Self::numbered_reply(request, |text| Self::tagged(request, text)),
        }
    }

    fn usage(reply: String, request: &TranslationRequest) -> BackendReply {
        BackendReply {
            prompt_tokens: Some((request.numbered_texts.len() / 4) as u64),
            completion_tokens: Some((reply.len() / 4) as u64),
            text: reply,
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TranslationBackend for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<BackendReply, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(Self::usage(self.working_reply(request), request)),

            MockBehavior::Identity => Ok(Self::usage(Self::numbered_reply(request, str::to_string), request)),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::usage(self.working_reply(request), request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Truncated => {
                let texts = Self::source_texts(request);
                let kept = texts.len().saturating_sub(1);
                let reply = texts[..kept]
                    .iter()
                    .enumerate()
                    .map(|(i, text)| format!("{}. {}", i + 1, Self::tagged(request, text)))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(Self::usage(reply, request))
            }

            MockBehavior::Unnumbered => {
                let reply = Self::source_texts(request)
                    .iter()
                    .map(|text| Self::tagged(request, text))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(Self::usage(reply, request))
            }

            MockBehavior::Empty => Ok(BackendReply {
                text: String::new(),
                prompt_tokens: Some(0),
                completion_tokens: Some(0),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::usage(self.working_reply(request), request))
            }
        }
    }

    fn provider_name(&self) -> String {
        "Mock".to_string()
    }

    fn model_name(&self) -> String {
        format!("{:?}", self.behavior)
    }
}
