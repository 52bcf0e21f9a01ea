/*!
 * Model tiers and request pacing.
 *
 * Chunks are submitted one at a time. Between two consecutive requests the
 * translator waits a fixed delay chosen from the model tier, unless the
 * configuration sets its own.
 */

use std::time::Duration;

use crate::app_config::TranslationProvider;

// Model name fragments of the cheap, fast models
const FAST_MODEL_MARKERS: [&str; 4] = ["3.5", "mini", "haiku", "nano"];

/// Cost and speed class of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Served by a local server, no rate limit and no cost
    Local,
    /// Cheap, high-throughput remote model
    Fast,
    /// Expensive remote model
    Premium,
}

impl ModelTier {
    /// Classify a model; unknown remote models count as premium
    pub fn classify(provider: TranslationProvider, model: &str) -> Self {
        if provider == TranslationProvider::LMStudio {
            return Self::Local;
        }

        let model = model.to_lowercase();
        if FAST_MODEL_MARKERS.iter().any(|marker| model.contains(marker)) {
            Self::Fast
        } else {
            Self::Premium
        }
    }

    /// Delay between two consecutive requests
    pub fn default_delay(&self) -> Duration {
        match self {
            Self::Local => Duration::ZERO,
            Self::Fast => Duration::from_millis(500),
            Self::Premium => Duration::from_millis(1000),
        }
    }

    /// Estimated price of one token in US dollars
    pub fn cost_per_token(&self) -> f64 {
        match self {
            Self::Local => 0.0,
            Self::Fast => 0.000002,
            Self::Premium => 0.00003,
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Fast => write!(f, "fast"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

/// Fixed delay applied between consecutive requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// Create a pacer with an explicit delay
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pacer that never waits
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Pacer for a model, `override_ms` taking precedence over the tier default
    pub fn for_model(provider: TranslationProvider, model: &str, override_ms: Option<u64>) -> Self {
        match override_ms {
            Some(ms) => Self::new(Duration::from_millis(ms)),
            None => Self::new(ModelTier::classify(provider, model).default_delay()),
        }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait before the next request
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
