//! Retry and graceful-fallback wrapper around any tutor provider.
//!
//! User-facing surfaces must never see a raw network or quota error: after
//! retrying transient failures, [`GracefulTutor`] substitutes deterministic
//! fallback payloads and lets the caller proceed unchanged. Permanent errors
//! (bad key, unknown model) skip the retries and go straight to fallback.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::tutor::{
    DoubtRequest, DoubtResponse, Insights, InsightsRequest, InsightsResponse, ModelInfo,
    TokenUsage, TutorProvider,
};

/// Fallback doubt answer when the provider is rate limited.
pub const DOUBT_FALLBACK_RATE_LIMITED: &str = "The AI Assistant is currently at peak capacity.\n\n**Quick Hint:** For this specific topic, check your 'Revision Notes' section or the Peer Learning forum where similar questions have been answered by experts.";

/// Fallback doubt answer for any other provider failure.
pub const DOUBT_FALLBACK_GENERIC: &str = "I'm having trouble analyzing that right now. Please try again or request a human teacher review.";

/// The deterministic insight object substituted when the provider fails.
pub fn fallback_insights() -> Insights {
    Insights {
        strengths: vec![
            "Consistent attendance in Mathematics live sessions".into(),
            "High engagement with Peer Learning moderation".into(),
            "Mastery of 'Algebra' and 'Polynomials' concepts".into(),
        ],
        weaknesses: vec![
            "Time management during weekly quizzes".into(),
            "Conceptual depth in 'Thermodynamics' (Science)".into(),
        ],
        recommendation: "Focus on active recall for Science chapters and utilize the Peer-to-Peer forum to clarify complex physics doubts.".into(),
    }
}

/// Wraps a provider with retries and fallback substitution.
pub struct GracefulTutor<P> {
    inner: P,
    max_retries: u32,
    retry_delay: Duration,
}

impl<P> GracefulTutor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            max_retries: 2,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn with_retry_policy(inner: P, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            retry_delay,
        }
    }
}

/// Retry transient provider errors with exponential backoff.
///
/// Honors the provider's retry-after hint when rate limited and stops
/// immediately on permanent errors.
async fn retry<T, F, Fut>(max_retries: u32, initial_delay: Duration, mut attempt: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut last_error = None;
    let mut delay = initial_delay;

    for attempt_no in 0..=max_retries {
        if attempt_no > 0 {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(Duration::from_secs(60));
        }
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                    if provider_err.is_permanent() {
                        return Err(e);
                    }
                    if let Some(ms) = provider_err.retry_after_ms() {
                        delay = Duration::from_millis(ms);
                    }
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown provider error")))
}

fn was_rate_limited(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ProviderError>()
        .map(ProviderError::is_rate_limited)
        .unwrap_or(false)
}

#[async_trait]
impl<P: TutorProvider> TutorProvider for GracefulTutor<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn solve_doubt(&self, request: &DoubtRequest) -> anyhow::Result<DoubtResponse> {
        match retry(self.max_retries, self.retry_delay, || {
            self.inner.solve_doubt(request)
        })
        .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(error = %e, "tutor provider failed, serving fallback doubt answer");
                let answer = if was_rate_limited(&e) {
                    DOUBT_FALLBACK_RATE_LIMITED
                } else {
                    DOUBT_FALLBACK_GENERIC
                };
                Ok(DoubtResponse {
                    answer: answer.to_string(),
                    model: request.model.clone(),
                    token_usage: TokenUsage::default(),
                    latency_ms: 0,
                })
            }
        }
    }

    async fn performance_insights(
        &self,
        request: &InsightsRequest,
    ) -> anyhow::Result<InsightsResponse> {
        match retry(self.max_retries, self.retry_delay, || {
            self.inner.performance_insights(request)
        })
        .await
        {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(error = %e, "tutor provider failed, serving fallback insights");
                Ok(InsightsResponse {
                    insights: fallback_insights(),
                    model: request.model.clone(),
                    token_usage: TokenUsage::default(),
                    latency_ms: 0,
                })
            }
        }
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        self.inner.available_models()
    }
}
