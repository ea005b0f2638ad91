//! Aggregate evaluation of a question set against one submission.
//!
//! A single deterministic, synchronous pass: validate the whole set up
//! front, then grade each question in order, summing credit and collecting
//! weak concepts. No I/O, no shared state; evaluating the same inputs twice
//! yields identical results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigViolation};
use crate::grader;
use crate::model::{QuestionKind, QuestionSet, Submission};

/// Summary produced by one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Total credit earned. Always `0..=total_marks`.
    pub score: u32,
    /// Sum of marks across the question set.
    pub total_marks: u32,
    /// Concepts of incorrectly answered questions, first-seen order, no
    /// duplicates.
    pub weak_concepts: Vec<String>,
}

impl EvaluationResult {
    /// Score as a percentage of total marks.
    pub fn percent(&self) -> f64 {
        if self.total_marks == 0 {
            0.0
        } else {
            self.score as f64 * 100.0 / self.total_marks as f64
        }
    }
}

/// The grader's verdict for one question, kept alongside the summary so
/// reports can show per-question rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub concept: String,
    pub correct: bool,
    pub credit_awarded: u32,
    pub marks: u32,
    /// False for kinds the grader passes through for manual review.
    pub auto_graded: bool,
}

/// Everything one evaluation pass produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: EvaluationResult,
    pub outcomes: Vec<QuestionOutcome>,
}

/// Check a question set for authoring errors, collecting every violation.
///
/// Runs before any grading; a set that fails here must be fixed at authoring
/// time, not worked around at evaluation time.
pub fn validate_question_set(set: &QuestionSet) -> Result<(), ConfigError> {
    let mut violations = Vec::new();

    if set.questions.is_empty() {
        violations.push(ConfigViolation::EmptySet);
    }

    let mut seen_ids = HashSet::new();
    for q in &set.questions {
        if !seen_ids.insert(q.id.as_str()) {
            violations.push(ConfigViolation::DuplicateId { id: q.id.clone() });
        }

        if q.marks == 0 {
            violations.push(ConfigViolation::ZeroMarks { id: q.id.clone() });
        }

        if q.concept.trim().is_empty() {
            violations.push(ConfigViolation::EmptyConcept { id: q.id.clone() });
        }

        if q.kind.is_exact_match() {
            match &q.correct_answer {
                None => violations.push(ConfigViolation::MissingCorrectAnswer {
                    id: q.id.clone(),
                    kind: q.kind,
                }),
                Some(answer) => {
                    if q.kind == QuestionKind::SingleChoice {
                        if q.options.len() < 2 {
                            violations.push(ConfigViolation::TooFewOptions { id: q.id.clone() });
                        }
                        if !q.options.iter().any(|o| o == answer) {
                            violations
                                .push(ConfigViolation::CorrectAnswerNotAnOption { id: q.id.clone() });
                        }
                    }
                }
            }
        }

        if q.kind.is_keyword_graded() && q.required_keywords.is_empty() {
            violations.push(ConfigViolation::NoRequiredKeywords {
                id: q.id.clone(),
                kind: q.kind,
            });
        }

        if q.kind == QuestionKind::Matching && q.match_pairs.is_empty() {
            violations.push(ConfigViolation::NoMatchPairs { id: q.id.clone() });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError {
            set_id: set.id.clone(),
            violations,
        })
    }
}

/// Evaluate one submission against a question set.
///
/// Fails fast with every configuration violation before grading anything;
/// a well-formed set always evaluates to a complete result. Missing answers
/// grade as unanswered.
pub fn evaluate(set: &QuestionSet, submission: &Submission) -> Result<Evaluation, ConfigError> {
    validate_question_set(set)?;

    let mut score = 0u32;
    let mut total_marks = 0u32;
    let mut weak_concepts: Vec<String> = Vec::new();
    let mut outcomes = Vec::with_capacity(set.questions.len());

    for question in &set.questions {
        total_marks += question.marks;

        let outcome = grader::grade(question, submission.answer_for(&question.id));
        score += outcome.credit_awarded;

        if !outcome.correct && !weak_concepts.contains(&question.concept) {
            weak_concepts.push(question.concept.clone());
        }

        outcomes.push(QuestionOutcome {
            question_id: question.id.clone(),
            concept: question.concept.clone(),
            correct: outcome.correct,
            credit_awarded: outcome.credit_awarded,
            marks: question.marks,
            auto_graded: !question.kind.is_manually_reviewed(),
        });
    }

    Ok(Evaluation {
        result: EvaluationResult {
            score,
            total_marks,
            weak_concepts,
        },
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Question, QuestionKind};

    fn question(id: &str, kind: QuestionKind, marks: u32, concept: &str) -> Question {
        let mut q = Question {
            id: id.into(),
            kind,
            text: format!("prompt {id}"),
            marks,
            concept: concept.into(),
            topic: None,
            options: vec![],
            correct_answer: None,
            required_keywords: vec![],
            match_pairs: vec![],
        };
        match kind {
            QuestionKind::SingleChoice => {
                q.options = vec!["right".into(), "wrong".into()];
                q.correct_answer = Some("right".into());
            }
            QuestionKind::FillInBlank => q.correct_answer = Some("right".into()),
            QuestionKind::ShortAnswer | QuestionKind::LongAnswer => {
                q.required_keywords = vec!["alpha".into(), "beta".into()];
            }
            QuestionKind::Matching => {
                q.match_pairs = vec![crate::model::MatchPair {
                    left: "NaHCO₃".into(),
                    right: "Baking Soda".into(),
                }];
            }
            QuestionKind::Upload => {}
        }
        q
    }

    fn mixed_set() -> QuestionSet {
        QuestionSet {
            id: "mixed".into(),
            title: "Mixed".into(),
            subject: "Science".into(),
            description: String::new(),
            questions: vec![
                question("q1", QuestionKind::SingleChoice, 2, "Polynomial Roots"),
                question("q2", QuestionKind::FillInBlank, 1, "Polynomial Degrees"),
                question("q3", QuestionKind::ShortAnswer, 3, "Redox Reactions"),
                question("q4", QuestionKind::LongAnswer, 5, "Quadratic Derivations"),
                question("q5", QuestionKind::ShortAnswer, 10, "Redox Reactions"),
            ],
        }
    }

    #[test]
    fn validation_accepts_well_formed_set() {
        assert!(validate_question_set(&mixed_set()).is_ok());
    }

    #[test]
    fn validation_collects_every_violation() {
        let mut set = mixed_set();
        set.questions[0].marks = 0;
        set.questions[0].correct_answer = Some("not listed".into());
        set.questions[2].required_keywords.clear();
        set.questions[3].concept = "  ".into();
        set.questions[4].id = "q1".into();

        let err = validate_question_set(&set).unwrap_err();
        assert_eq!(err.set_id, "mixed");
        assert_eq!(err.violations.len(), 5);
        assert!(err
            .violations
            .contains(&ConfigViolation::ZeroMarks { id: "q1".into() }));
        assert!(err
            .violations
            .contains(&ConfigViolation::CorrectAnswerNotAnOption { id: "q1".into() }));
        assert!(err.violations.contains(&ConfigViolation::NoRequiredKeywords {
            id: "q3".into(),
            kind: QuestionKind::ShortAnswer,
        }));
        assert!(err
            .violations
            .contains(&ConfigViolation::EmptyConcept { id: "q4".into() }));
        assert!(err
            .violations
            .contains(&ConfigViolation::DuplicateId { id: "q1".into() }));
    }

    #[test]
    fn validation_rejects_empty_set() {
        let set = QuestionSet {
            id: "empty".into(),
            title: "Empty".into(),
            subject: String::new(),
            description: String::new(),
            questions: vec![],
        };
        let err = validate_question_set(&set).unwrap_err();
        assert_eq!(err.violations, vec![ConfigViolation::EmptySet]);
    }

    #[test]
    fn invalid_set_is_rejected_before_grading() {
        let mut set = mixed_set();
        set.questions[1].correct_answer = None;
        let err = evaluate(&set, &Submission::new()).unwrap_err();
        assert!(!err.violations.is_empty());
    }

    #[test]
    fn all_wrong_scores_zero_and_collects_distinct_concepts() {
        let set = mixed_set();
        let submission: Submission = [
            ("q1", Answer::Text("wrong".into())),
            ("q2", Answer::Text("nope".into())),
        ]
        .into_iter()
        .collect();

        let evaluation = evaluate(&set, &submission).unwrap();
        assert_eq!(evaluation.result.score, 0);
        assert_eq!(evaluation.result.total_marks, 21);
        // q3 and q5 share a concept; dedup keeps first-seen order.
        assert_eq!(
            evaluation.result.weak_concepts,
            vec![
                "Polynomial Roots",
                "Polynomial Degrees",
                "Redox Reactions",
                "Quadratic Derivations",
            ]
        );
    }

    #[test]
    fn score_conserves_per_question_credit() {
        let set = mixed_set();
        let submission: Submission = [
            ("q1", Answer::Selected { option: 0 }),
            ("q2", Answer::Text("RIGHT".into())),
            ("q3", Answer::Text("alpha only".into())),
            ("q4", Answer::Text("alpha and beta both".into())),
        ]
        .into_iter()
        .collect();

        let evaluation = evaluate(&set, &submission).unwrap();
        let credit_sum: u32 = evaluation.outcomes.iter().map(|o| o.credit_awarded).sum();
        let marks_sum: u32 = evaluation.outcomes.iter().map(|o| o.marks).sum();
        assert_eq!(evaluation.result.score, credit_sum);
        assert_eq!(evaluation.result.total_marks, marks_sum);
        // q1 (2) + q2 (1) + q3 round(3 * 1/2) = 2 + q4 (5) + q5 (0).
        assert_eq!(evaluation.result.score, 10);
        assert_eq!(evaluation.result.weak_concepts, vec!["Redox Reactions"]);
    }

    #[test]
    fn manual_review_kinds_never_surface_as_weak() {
        let set = QuestionSet {
            id: "manual".into(),
            title: "Manual".into(),
            subject: String::new(),
            description: String::new(),
            questions: vec![
                question("m1", QuestionKind::Matching, 3, "Chemical Formulas"),
                question("u1", QuestionKind::Upload, 10, "Worksheets"),
            ],
        };

        let evaluation = evaluate(&set, &Submission::new()).unwrap();
        assert_eq!(evaluation.result.score, 13);
        assert!(evaluation.result.weak_concepts.is_empty());
        assert!(evaluation.outcomes.iter().all(|o| !o.auto_graded));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let set = mixed_set();
        let submission: Submission = [
            ("q1", Answer::Text("right".into())),
            ("q3", Answer::Text("beta".into())),
        ]
        .into_iter()
        .collect();

        let first = evaluate(&set, &submission).unwrap();
        let second = evaluate(&set, &submission).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn percent_handles_zero_total() {
        let result = EvaluationResult {
            score: 0,
            total_marks: 0,
            weak_concepts: vec![],
        };
        assert_eq!(result.percent(), 0.0);

        let half = EvaluationResult {
            score: 10,
            total_marks: 20,
            weak_concepts: vec![],
        };
        assert!((half.percent() - 50.0).abs() < f64::EPSILON);
    }
}
