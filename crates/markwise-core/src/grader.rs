//! Per-question grading.
//!
//! Decides correctness and credit for exactly one (question, answer) pair.
//! Exact-match kinds earn full marks or nothing; keyword-graded kinds earn
//! proportional credit once at least half the required keywords appear;
//! kinds without automated grading metadata pass through at full credit for
//! manual review.

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question};

/// The grader's verdict for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeOutcome {
    /// Whether the answer met the correctness bar for its kind.
    pub correct: bool,
    /// Credit earned, always within `0..=question.marks`.
    pub credit_awarded: u32,
}

/// Grade one question against the submitted answer, if any.
///
/// A missing answer is treated as empty text: a definite mismatch for
/// exact-match kinds and zero keyword hits for keyword-graded kinds.
pub fn grade(question: &Question, answer: Option<&Answer>) -> GradeOutcome {
    let text = answer.map(|a| a.resolve_text(question)).unwrap_or("");
    let submitted = normalize(text);

    if question.kind.is_exact_match() {
        let expected = question
            .correct_answer
            .as_deref()
            .map(normalize)
            .unwrap_or_default();
        let correct = !submitted.is_empty() && submitted == expected;
        return GradeOutcome {
            correct,
            credit_awarded: if correct { question.marks } else { 0 },
        };
    }

    if question.kind.is_keyword_graded() {
        let hits = keyword_hits(&submitted, &question.required_keywords);
        let total = question.required_keywords.len();
        if meets_threshold(hits, total) {
            return GradeOutcome {
                correct: true,
                credit_awarded: proportional_credit(question.marks, hits, total),
            };
        }
        return GradeOutcome {
            correct: false,
            credit_awarded: 0,
        };
    }

    // Matching and upload kinds defer to manual review; never penalize.
    GradeOutcome {
        correct: true,
        credit_awarded: question.marks,
    }
}

/// Lower-case and trim, the only normalization the grader applies.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Count how many required keywords appear as substrings of the answer.
fn keyword_hits(normalized_answer: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|k| normalized_answer.contains(&k.to_lowercase()))
        .count()
}

/// "At least half" of the keywords, exact halves included.
///
/// Equivalent to `hits >= ceil(total / 2)`; validation rejects sets where
/// `total` is zero, so the threshold is never vacuous at grading time.
fn meets_threshold(hits: usize, total: usize) -> bool {
    total > 0 && hits * 2 >= total
}

/// Credit proportional to keyword coverage, rounded to the nearest mark.
fn proportional_credit(marks: u32, hits: usize, total: usize) -> u32 {
    let credit = (marks as f64 * hits as f64 / total as f64).round() as u32;
    credit.min(marks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: "q".into(),
            kind,
            text: "prompt".into(),
            marks: 2,
            concept: "Concept".into(),
            topic: None,
            options: vec![],
            correct_answer: None,
            required_keywords: vec![],
            match_pairs: vec![],
        }
    }

    fn corrosion_question() -> Question {
        Question {
            marks: 5,
            concept: "Redox Reactions".into(),
            required_keywords: vec![
                "oxidation".into(),
                "protection".into(),
                "layer".into(),
                "galvanization".into(),
            ],
            ..question(QuestionKind::ShortAnswer)
        }
    }

    #[test]
    fn single_choice_is_case_insensitive() {
        let q = Question {
            options: vec!["p² - 2q".into(), "p² + 2q".into()],
            correct_answer: Some("p² - 2q".into()),
            ..question(QuestionKind::SingleChoice)
        };

        let outcome = grade(&q, Some(&Answer::Text("P² - 2Q".into())));
        assert!(outcome.correct);
        assert_eq!(outcome.credit_awarded, 2);

        let wrong = grade(&q, Some(&Answer::Text("p² + 2q".into())));
        assert!(!wrong.correct);
        assert_eq!(wrong.credit_awarded, 0);
    }

    #[test]
    fn single_choice_grades_selected_index() {
        let q = Question {
            options: vec!["Cubic".into(), "Quartic".into()],
            correct_answer: Some("Cubic".into()),
            ..question(QuestionKind::SingleChoice)
        };

        assert!(grade(&q, Some(&Answer::Selected { option: 0 })).correct);
        assert!(!grade(&q, Some(&Answer::Selected { option: 1 })).correct);
        // Out-of-range selection resolves to empty text.
        assert!(!grade(&q, Some(&Answer::Selected { option: 7 })).correct);
    }

    #[test]
    fn fill_in_blank_trims_and_lowercases() {
        let q = Question {
            marks: 1,
            correct_answer: Some("Cubic".into()),
            ..question(QuestionKind::FillInBlank)
        };

        assert!(grade(&q, Some(&Answer::Text("  cubic ".into()))).correct);
        assert!(!grade(&q, Some(&Answer::Text("cubic polynomial".into()))).correct);
    }

    #[test]
    fn missing_answer_is_a_mismatch_not_an_error() {
        let q = Question {
            correct_answer: Some("Cubic".into()),
            ..question(QuestionKind::FillInBlank)
        };
        let outcome = grade(&q, None);
        assert!(!outcome.correct);
        assert_eq!(outcome.credit_awarded, 0);
    }

    #[test]
    fn empty_expected_answer_never_matches_empty_submission() {
        // Validation rejects this shape; the grader still must not award
        // credit for "" == "" if it ever sees it.
        let q = question(QuestionKind::FillInBlank);
        assert!(!grade(&q, Some(&Answer::Text("".into()))).correct);
    }

    #[test]
    fn keyword_half_coverage_earns_proportional_credit() {
        let q = corrosion_question();
        let answer = Answer::Text(
            "Rusting is an Oxidation process; paint forms a protective Layer.".into(),
        );

        let outcome = grade(&q, Some(&answer));
        assert!(outcome.correct, "2 of 4 keywords meets the half threshold");
        assert_eq!(outcome.credit_awarded, 3, "round(5 * 2/4) = 3");
    }

    #[test]
    fn keyword_full_coverage_earns_full_marks() {
        let q = corrosion_question();
        let answer = Answer::Text(
            "Corrosion is oxidation; galvanization adds a zinc layer for protection.".into(),
        );

        let outcome = grade(&q, Some(&answer));
        assert!(outcome.correct);
        assert_eq!(outcome.credit_awarded, 5);
    }

    #[test]
    fn keyword_zero_coverage_scores_zero() {
        let q = corrosion_question();
        let outcome = grade(&q, Some(&Answer::Text("metals get damaged by rain".into())));
        assert!(!outcome.correct);
        assert_eq!(outcome.credit_awarded, 0);
    }

    #[test]
    fn keyword_threshold_boundaries() {
        assert!(meets_threshold(2, 4), "exactly half passes");
        assert!(!meets_threshold(1, 4));
        assert!(meets_threshold(2, 3), "ceil(3/2) = 2 passes");
        assert!(!meets_threshold(1, 3));
        assert!(meets_threshold(1, 1));
        assert!(!meets_threshold(0, 1));
        assert!(!meets_threshold(0, 0), "empty keyword list never passes");
    }

    #[test]
    fn proportional_credit_rounds_to_nearest_and_caps() {
        assert_eq!(proportional_credit(5, 2, 4), 3);
        assert_eq!(proportional_credit(5, 3, 4), 4);
        assert_eq!(proportional_credit(5, 4, 4), 5);
        assert_eq!(proportional_credit(10, 1, 3), 3);
        assert_eq!(proportional_credit(1, 1, 2), 1);
    }

    #[test]
    fn matching_and_upload_pass_through_at_full_marks() {
        let matching = Question {
            marks: 3,
            ..question(QuestionKind::Matching)
        };
        let outcome = grade(&matching, None);
        assert!(outcome.correct);
        assert_eq!(outcome.credit_awarded, 3);

        let upload = Question {
            marks: 10,
            ..question(QuestionKind::Upload)
        };
        let outcome = grade(&upload, Some(&Answer::Text("see attached".into())));
        assert!(outcome.correct);
        assert_eq!(outcome.credit_awarded, 10);
    }

    #[test]
    fn credit_never_exceeds_marks() {
        let q = corrosion_question();
        let everything = Answer::Text(
            "oxidation oxidation protection protection layer layer galvanization".into(),
        );
        let outcome = grade(&q, Some(&everything));
        assert!(outcome.credit_awarded <= q.marks);
    }
}
