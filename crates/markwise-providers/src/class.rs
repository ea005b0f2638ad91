//! Class-roster insight fan-out.
//!
//! Teacher dashboards request insights for a whole batch of students at
//! once. This module runs those requests with bounded parallelism; a student
//! whose request fails is logged and skipped, never failing the batch. Wrap
//! the provider in [`crate::GracefulTutor`] when even per-student gaps are
//! unacceptable.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::tutor::{Insights, InsightsRequest, TutorProvider};

/// One student's performance summary, ready for an insights request.
#[derive(Debug, Clone)]
pub struct StudentSummary {
    /// Student name.
    pub student: String,
    /// Plain-text summary of the student's recent performance.
    pub performance_summary: String,
}

/// Insights generated for one student.
#[derive(Debug, Clone)]
pub struct StudentInsights {
    pub student: String,
    pub insights: Insights,
}

/// Configuration for a class fan-out.
#[derive(Debug, Clone)]
pub struct ClassInsightsConfig {
    /// Maximum concurrent provider requests.
    pub parallelism: usize,
    /// Model identifier used for every request.
    pub model: String,
}

impl Default for ClassInsightsConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            model: "gemini-3-flash-preview".to_string(),
        }
    }
}

/// Generate insights for every student in the roster.
///
/// Results come back in completion order; failed students are omitted after
/// a warning.
pub async fn class_insights(
    provider: Arc<dyn TutorProvider>,
    roster: &[StudentSummary],
    config: &ClassInsightsConfig,
) -> Vec<StudentInsights> {
    let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
    let mut futures = FuturesUnordered::new();

    for summary in roster {
        let provider = Arc::clone(&provider);
        let semaphore = Arc::clone(&semaphore);
        let student = summary.student.clone();
        let request = InsightsRequest::new(config.model.clone(), summary.performance_summary.clone());

        futures.push(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (student, Err(anyhow::anyhow!("semaphore closed")));
            };
            let result = provider.performance_insights(&request).await;
            (student, result)
        });
    }

    let mut results = Vec::with_capacity(roster.len());
    while let Some((student, result)) = futures.next().await {
        match result {
            Ok(response) => results.push(StudentInsights {
                student,
                insights: response.insights,
            }),
            Err(e) => {
                tracing::warn!("insights failed for {student}: {e:#}");
            }
        }
    }

    results
}
