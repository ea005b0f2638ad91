//! Core trait definitions for AI tutor providers.
//!
//! A tutor provider answers two kinds of requests: free-form doubt solving
//! and a schema-constrained performance-insight object. Implemented by the
//! `gemini` and `openai` modules; wrapped by `fallback::GracefulTutor` at the
//! call sites that face users.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for AI backends that answer student doubts and generate insights.
#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Answer a student doubt step-by-step.
    async fn solve_doubt(&self, request: &DoubtRequest) -> anyhow::Result<DoubtResponse>;

    /// Produce a structured strengths/weaknesses/recommendation object from
    /// a performance summary.
    async fn performance_insights(
        &self,
        request: &InsightsRequest,
    ) -> anyhow::Result<InsightsResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

#[async_trait]
impl<P: TutorProvider + ?Sized> TutorProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn solve_doubt(&self, request: &DoubtRequest) -> anyhow::Result<DoubtResponse> {
        (**self).solve_doubt(request).await
    }

    async fn performance_insights(
        &self,
        request: &InsightsRequest,
    ) -> anyhow::Result<InsightsResponse> {
        (**self).performance_insights(request).await
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        (**self).available_models()
    }
}

/// Request to solve one student doubt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubtRequest {
    /// Model identifier (e.g. "gemini-3-pro-preview").
    pub model: String,
    /// Subject the doubt belongs to (e.g. "Chemistry").
    pub subject: String,
    /// The student's question, verbatim.
    pub question: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl DoubtRequest {
    pub fn new(model: impl Into<String>, subject: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            subject: subject.into(),
            question: question.into(),
            temperature: DEFAULT_DOUBT_TEMPERATURE,
            max_tokens: 2048,
        }
    }
}

/// Response to a doubt request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubtResponse {
    /// The tutor's answer, markdown formatted.
    pub answer: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Request for a performance-insight object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsRequest {
    /// Model identifier.
    pub model: String,
    /// Plain-text summary of the student's recent performance.
    pub performance_summary: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl InsightsRequest {
    pub fn new(model: impl Into<String>, performance_summary: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            performance_summary: performance_summary.into(),
            max_tokens: 1024,
        }
    }
}

/// The fixed insight shape every provider must return.
///
/// All three fields are required; a payload missing any of them fails
/// deserialization and is treated as a provider error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendation: String,
}

/// Response to an insights request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    /// The structured insight object.
    pub insights: Insights,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Default sampling temperature for doubt solving.
pub const DEFAULT_DOUBT_TEMPERATURE: f64 = 0.4;

/// System prompt for doubt solving.
pub const DOUBT_SYSTEM_PROMPT: &str = "You are a helpful academic tutor. Format the output clearly with sections: Understanding, Step-by-Step, and Final Answer. Use markdown and math notation.";

/// Build the user prompt for a doubt request.
pub fn doubt_prompt(request: &DoubtRequest) -> String {
    format!(
        "You are an expert tutor for CBSE/ICSE students. Solve this {} doubt step-by-step: {}",
        request.subject, request.question
    )
}

/// Build the user prompt for an insights request.
pub fn insights_prompt(request: &InsightsRequest) -> String {
    format!(
        "Based on this student performance data: {}, provide a JSON object with 3 specific strengths, 2 areas for improvement, and a summary recommendation.",
        request.performance_summary
    )
}
