//! Grade report types with JSON persistence and attempt-over-attempt
//! progress comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluator::{Evaluation, QuestionOutcome};
use crate::model::QuestionSet;

/// A complete graded-attempt report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the question set this attempt was graded against.
    pub question_set: QuestionSetSummary,
    /// Student name, when the submission carried one.
    pub student: Option<String>,
    /// Total credit earned.
    pub score: u32,
    /// Sum of marks across the set.
    pub total_marks: u32,
    /// Weak concepts in first-incorrect-occurrence order.
    pub weak_concepts: Vec<String>,
    /// Per-question outcomes, in question order.
    pub outcomes: Vec<QuestionOutcome>,
    /// Session seconds, when the collecting client recorded them.
    pub elapsed_secs: Option<u64>,
}

/// Summary of a question set (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
}

impl GradeReport {
    /// Build a report from an evaluation pass.
    pub fn new(
        set: &QuestionSet,
        student: Option<String>,
        evaluation: Evaluation,
        elapsed_secs: Option<u64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            question_set: QuestionSetSummary {
                id: set.id.clone(),
                title: set.title.clone(),
                question_count: set.questions.len(),
            },
            student,
            score: evaluation.result.score,
            total_marks: evaluation.result.total_marks,
            weak_concepts: evaluation.result.weak_concepts,
            outcomes: evaluation.outcomes,
            elapsed_secs,
        }
    }

    /// Score as a percentage of total marks.
    pub fn percent(&self) -> f64 {
        if self.total_marks == 0 {
            0.0
        } else {
            self.score as f64 * 100.0 / self.total_marks as f64
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier one on the same question set.
    ///
    /// Per-question movement is measured on credit fractions; `threshold`
    /// is the minimum fraction change that counts as movement.
    pub fn compare(&self, baseline: &GradeReport, threshold: f64) -> ProgressReport {
        use std::collections::HashMap;

        let fraction_map = |report: &GradeReport| -> HashMap<String, (String, f64)> {
            report
                .outcomes
                .iter()
                .map(|o| {
                    let fraction = if o.marks == 0 {
                        0.0
                    } else {
                        o.credit_awarded as f64 / o.marks as f64
                    };
                    (o.question_id.clone(), (o.concept.clone(), fraction))
                })
                .collect()
        };

        let baseline_fractions = fraction_map(baseline);
        let current_fractions = fraction_map(self);

        let mut slipped = Vec::new();
        let mut improved = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for (question_id, (concept, current)) in &current_fractions {
            if let Some((_, baseline_val)) = baseline_fractions.get(question_id) {
                let delta = current - baseline_val;
                if delta < -threshold {
                    slipped.push(QuestionDelta {
                        question_id: question_id.clone(),
                        concept: concept.clone(),
                        baseline_fraction: *baseline_val,
                        current_fraction: *current,
                        delta,
                    });
                } else if delta > threshold {
                    improved.push(QuestionDelta {
                        question_id: question_id.clone(),
                        concept: concept.clone(),
                        baseline_fraction: *baseline_val,
                        current_fraction: *current,
                        delta,
                    });
                } else {
                    unchanged += 1;
                }
            } else {
                new_questions += 1;
            }
        }

        let removed_questions = baseline_fractions
            .keys()
            .filter(|id| !current_fractions.contains_key(*id))
            .count();

        let recovered_concepts = baseline
            .weak_concepts
            .iter()
            .filter(|c| !self.weak_concepts.contains(c))
            .cloned()
            .collect();
        let emerged_concepts = self
            .weak_concepts
            .iter()
            .filter(|c| !baseline.weak_concepts.contains(c))
            .cloned()
            .collect();
        let persistent_concepts = self
            .weak_concepts
            .iter()
            .filter(|c| baseline.weak_concepts.contains(c))
            .cloned()
            .collect();

        ProgressReport {
            score_delta_percent: self.percent() - baseline.percent(),
            slipped,
            improved,
            unchanged,
            new_questions,
            removed_questions,
            recovered_concepts,
            emerged_concepts,
            persistent_concepts,
        }
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Percentage-point change in overall score.
    pub score_delta_percent: f64,
    /// Questions where the credit fraction went down.
    pub slipped: Vec<QuestionDelta>,
    /// Questions where the credit fraction went up.
    pub improved: Vec<QuestionDelta>,
    /// Questions with no significant change.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
    /// Weak in the baseline attempt, mastered now.
    pub recovered_concepts: Vec<String>,
    /// Newly weak in the current attempt.
    pub emerged_concepts: Vec<String>,
    /// Weak in both attempts.
    pub persistent_concepts: Vec<String>,
}

/// Per-question movement between two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDelta {
    pub question_id: String,
    pub concept: String,
    pub baseline_fraction: f64,
    pub current_fraction: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {:+.1}% overall, {} slipped, {} improved, {} unchanged\n\n",
            self.score_delta_percent,
            self.slipped.len(),
            self.improved.len(),
            self.unchanged
        ));

        if !self.slipped.is_empty() {
            md.push_str("### Slipped\n\n");
            md.push_str("| Question | Concept | Baseline | Current | Delta |\n");
            md.push_str("|----------|---------|----------|---------|-------|\n");
            for s in &self.slipped {
                md.push_str(&format!(
                    "| {} | {} | {:.0}% | {:.0}% | {:.0}% |\n",
                    s.question_id,
                    s.concept,
                    s.baseline_fraction * 100.0,
                    s.current_fraction * 100.0,
                    s.delta * 100.0
                ));
            }
            md.push('\n');
        }

        if !self.improved.is_empty() {
            md.push_str("### Improved\n\n");
            md.push_str("| Question | Concept | Baseline | Current | Delta |\n");
            md.push_str("|----------|---------|----------|---------|-------|\n");
            for i in &self.improved {
                md.push_str(&format!(
                    "| {} | {} | {:.0}% | {:.0}% | +{:.0}% |\n",
                    i.question_id,
                    i.concept,
                    i.baseline_fraction * 100.0,
                    i.current_fraction * 100.0,
                    i.delta * 100.0
                ));
            }
            md.push('\n');
        }

        if !self.recovered_concepts.is_empty() {
            md.push_str(&format!(
                "**Recovered concepts:** {}\n",
                self.recovered_concepts.join(", ")
            ));
        }
        if !self.emerged_concepts.is_empty() {
            md.push_str(&format!(
                "**New weak concepts:** {}\n",
                self.emerged_concepts.join(", ")
            ));
        }
        if !self.persistent_concepts.is_empty() {
            md.push_str(&format!(
                "**Persistent weak concepts:** {}\n",
                self.persistent_concepts.join(", ")
            ));
        }

        md
    }

    /// Returns true if any question slipped.
    pub fn has_slipped(&self) -> bool {
        !self.slipped.is_empty()
    }
}
