//! Cohort-level aggregation across many grade reports.
//!
//! Folds a batch of graded attempts (a class, a term, one student's history)
//! into per-concept miss rates and per-student averages for the monitoring
//! views.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::report::GradeReport;

/// Aggregate statistics across a batch of reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortStats {
    /// Per-concept statistics, keyed by concept label.
    pub per_concept: HashMap<String, ConceptStats>,
    /// Per-student statistics, keyed by student name.
    pub per_student: HashMap<String, StudentStats>,
    /// Mean score percentage across all reports.
    pub avg_percent: f64,
}

/// How one concept performed across all graded questions tagged with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptStats {
    /// Concept label.
    pub concept: String,
    /// Graded questions tagged with this concept.
    pub attempts: u32,
    /// How many of those were answered incorrectly.
    pub misses: u32,
    /// misses / attempts.
    pub miss_rate: f64,
    /// Mean credit fraction earned on this concept.
    pub avg_credit_fraction: f64,
}

/// One student's standing across their reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentStats {
    /// Student name.
    pub student: String,
    /// Number of graded attempts.
    pub attempts: u32,
    /// Mean score percentage.
    pub avg_percent: f64,
    /// Best score percentage.
    pub best_percent: f64,
    /// Union of weak concepts across attempts, first-seen order.
    pub weak_concepts: Vec<String>,
}

/// Fallback grouping key for reports without a student name.
const UNNAMED_STUDENT: &str = "(unnamed)";

/// Compute aggregate statistics from a batch of grade reports.
pub fn compute_cohort_stats(reports: &[GradeReport]) -> CohortStats {
    // Per-concept stats from every outcome row.
    let mut concept_rows: HashMap<String, (u32, u32, f64)> = HashMap::new();
    for report in reports {
        for outcome in &report.outcomes {
            let entry = concept_rows
                .entry(outcome.concept.clone())
                .or_insert((0, 0, 0.0));
            entry.0 += 1;
            if !outcome.correct {
                entry.1 += 1;
            }
            if outcome.marks > 0 {
                entry.2 += outcome.credit_awarded as f64 / outcome.marks as f64;
            }
        }
    }

    let per_concept = concept_rows
        .into_iter()
        .map(|(concept, (attempts, misses, fraction_sum))| {
            let stats = ConceptStats {
                concept: concept.clone(),
                attempts,
                misses,
                miss_rate: misses as f64 / attempts.max(1) as f64,
                avg_credit_fraction: fraction_sum / attempts.max(1) as f64,
            };
            (concept, stats)
        })
        .collect();

    // Per-student stats.
    let mut student_reports: HashMap<String, Vec<&GradeReport>> = HashMap::new();
    for report in reports {
        let key = report
            .student
            .clone()
            .unwrap_or_else(|| UNNAMED_STUDENT.to_string());
        student_reports.entry(key).or_default().push(report);
    }

    let per_student = student_reports
        .into_iter()
        .map(|(student, student_batch)| {
            let percents: Vec<f64> = student_batch.iter().map(|r| r.percent()).collect();
            let avg_percent = percents.iter().sum::<f64>() / percents.len().max(1) as f64;
            let best_percent = percents.iter().copied().fold(0.0, f64::max);

            let mut weak_concepts: Vec<String> = Vec::new();
            for report in &student_batch {
                for concept in &report.weak_concepts {
                    if !weak_concepts.contains(concept) {
                        weak_concepts.push(concept.clone());
                    }
                }
            }

            let stats = StudentStats {
                student: student.clone(),
                attempts: student_batch.len() as u32,
                avg_percent,
                best_percent,
                weak_concepts,
            };
            (student, stats)
        })
        .collect();

    let avg_percent = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.percent()).sum::<f64>() / reports.len() as f64
    };

    CohortStats {
        per_concept,
        per_student,
        avg_percent,
    }
}

/// The `limit` concepts with the highest miss rates, worst first.
///
/// Ties break toward the concept seen more often, then alphabetically so the
/// ordering is stable.
pub fn weakest_concepts(stats: &CohortStats, limit: usize) -> Vec<&ConceptStats> {
    let mut ranked: Vec<&ConceptStats> = stats
        .per_concept
        .values()
        .filter(|c| c.misses > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.miss_rate
            .partial_cmp(&a.miss_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.attempts.cmp(&a.attempts))
            .then(a.concept.cmp(&b.concept))
    });
    ranked.truncate(limit);
    ranked
}
