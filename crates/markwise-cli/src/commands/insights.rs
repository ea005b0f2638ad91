//! The `markwise insights` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use markwise_core::report::GradeReport;
use markwise_providers::config::load_config_from;
use markwise_providers::tutor::{InsightsRequest, TutorProvider};
use markwise_providers::{create_provider, GracefulTutor};

pub async fn execute(
    report_path: Option<PathBuf>,
    summary: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let performance_summary = match (report_path, summary) {
        (Some(path), _) => summarize_report(&GradeReport::load_json(&path)?),
        (None, Some(text)) => text,
        (None, None) => {
            anyhow::bail!("provide either --report or --summary");
        }
    };

    let config = load_config_from(config_path.as_deref())?;

    let Some(provider_config) = config.providers.get(&config.default_provider) else {
        anyhow::bail!(
            "provider '{}' not found in config. Run `markwise init` to create one.",
            config.default_provider
        );
    };
    let provider = create_provider(&config.default_provider, provider_config)?;
    let tutor = GracefulTutor::with_retry_policy(
        provider,
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
    );

    let request = InsightsRequest::new(
        model.unwrap_or_else(|| config.default_insights_model.clone()),
        performance_summary,
    );

    let response = tutor.performance_insights(&request).await?;

    println!("Strengths:");
    for s in &response.insights.strengths {
        println!("  + {s}");
    }
    println!("\nAreas for improvement:");
    for w in &response.insights.weaknesses {
        println!("  - {w}");
    }
    println!("\nRecommendation:\n  {}", response.insights.recommendation);

    Ok(())
}

/// Render a grade report as the plain-text summary the insights prompt wants.
fn summarize_report(report: &GradeReport) -> String {
    let student = report.student.as_deref().unwrap_or("the student");
    let weak = if report.weak_concepts.is_empty() {
        "no weak concepts".to_string()
    } else {
        format!("weak concepts: {}", report.weak_concepts.join(", "))
    };
    format!(
        "{student} scored {}/{} ({:.0}%) on '{}'; {weak}",
        report.score,
        report.total_marks,
        report.percent(),
        report.question_set.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use markwise_core::report::QuestionSetSummary;

    #[test]
    fn summary_names_score_and_gaps() {
        let report = GradeReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            question_set: QuestionSetSummary {
                id: "set".into(),
                title: "Weekly Check".into(),
                question_count: 2,
            },
            student: Some("Ananya".into()),
            score: 9,
            total_marks: 21,
            weak_concepts: vec!["Quadratic Derivations".into()],
            outcomes: vec![],
            elapsed_secs: None,
        };

        let summary = summarize_report(&report);
        assert!(summary.contains("Ananya"));
        assert!(summary.contains("9/21"));
        assert!(summary.contains("Quadratic Derivations"));
    }
}
