//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::tutor::{
    DoubtRequest, DoubtResponse, Insights, InsightsRequest, InsightsResponse, ModelInfo,
    TokenUsage, TutorProvider,
};

/// A mock tutor for testing callers without real API traffic.
///
/// Returns configurable answers based on question-content matching.
pub struct MockTutor {
    /// Map of question substring → answer text.
    answers: HashMap<String, String>,
    /// Default answer if no question matches.
    default_answer: String,
    /// Insights returned for every insights request.
    insights: Insights,
    /// Number of calls made (doubts and insights combined).
    call_count: AtomicU32,
    /// Last doubt request received.
    last_doubt: Mutex<Option<DoubtRequest>>,
}

impl MockTutor {
    /// Create a mock with the given question→answer mappings.
    pub fn new(answers: HashMap<String, String>) -> Self {
        Self {
            answers,
            default_answer: "Work through the definition first.".to_string(),
            insights: default_insights(),
            call_count: AtomicU32::new(0),
            last_doubt: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same answer.
    pub fn with_fixed_answer(answer: &str) -> Self {
        Self {
            answers: HashMap::new(),
            default_answer: answer.to_string(),
            insights: default_insights(),
            call_count: AtomicU32::new(0),
            last_doubt: Mutex::new(None),
        }
    }

    /// Override the insights object this mock returns.
    pub fn with_insights(mut self, insights: Insights) -> Self {
        self.insights = insights;
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last doubt request made to this provider.
    pub fn last_doubt(&self) -> Option<DoubtRequest> {
        self.last_doubt.lock().unwrap().clone()
    }
}

fn default_insights() -> Insights {
    Insights {
        strengths: vec!["Mock strength".into()],
        weaknesses: vec!["Mock weakness".into()],
        recommendation: "Mock recommendation.".into(),
    }
}

fn mock_usage(prompt: &str, completion: &str) -> TokenUsage {
    // Rough estimate
    let prompt_tokens = (prompt.len() / 4) as u32;
    let completion_tokens = (completion.len() / 4) as u32;
    TokenUsage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
        estimated_cost_usd: 0.0,
    }
}

#[async_trait]
impl TutorProvider for MockTutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn solve_doubt(&self, request: &DoubtRequest) -> anyhow::Result<DoubtResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_doubt.lock().unwrap() = Some(request.clone());

        let answer = self
            .answers
            .iter()
            .find(|(key, _)| request.question.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_answer.clone());

        Ok(DoubtResponse {
            token_usage: mock_usage(&request.question, &answer),
            answer,
            model: request.model.clone(),
            latency_ms: 1,
        })
    }

    async fn performance_insights(
        &self,
        request: &InsightsRequest,
    ) -> anyhow::Result<InsightsResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        Ok(InsightsResponse {
            insights: self.insights.clone(),
            model: request.model.clone(),
            token_usage: mock_usage(&request.performance_summary, ""),
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-tutor".into(),
            name: "Mock Tutor".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_answer() {
        let tutor = MockTutor::with_fixed_answer("Check the oxidation states.");
        let request = DoubtRequest::new("mock-tutor", "Chemistry", "anything");

        let response = tutor.solve_doubt(&request).await.unwrap();
        assert_eq!(response.answer, "Check the oxidation states.");
        assert_eq!(tutor.call_count(), 1);
        assert_eq!(tutor.last_doubt().unwrap().subject, "Chemistry");
    }

    #[tokio::test]
    async fn question_matching() {
        let mut answers = HashMap::new();
        answers.insert(
            "rust".to_string(),
            "Iron oxidises in moist air.".to_string(),
        );
        answers.insert(
            "quadratic".to_string(),
            "Complete the square.".to_string(),
        );

        let tutor = MockTutor::new(answers);

        let rust = DoubtRequest::new("mock-tutor", "Chemistry", "Why does iron rust?");
        let resp = tutor.solve_doubt(&rust).await.unwrap();
        assert!(resp.answer.contains("oxidises"));

        let quad = DoubtRequest::new("mock-tutor", "Maths", "Derive the quadratic formula");
        let resp = tutor.solve_doubt(&quad).await.unwrap();
        assert!(resp.answer.contains("square"));
        assert_eq!(tutor.call_count(), 2);
    }

    #[tokio::test]
    async fn insights_are_configurable() {
        let tutor = MockTutor::with_fixed_answer("x").with_insights(Insights {
            strengths: vec!["Graphing".into()],
            weaknesses: vec![],
            recommendation: "Keep going.".into(),
        });

        let request = InsightsRequest::new("mock-tutor", "summary");
        let response = tutor.performance_insights(&request).await.unwrap();
        assert_eq!(response.insights.strengths, vec!["Graphing"]);
    }
}
