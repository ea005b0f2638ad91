//! Grading engine error types.
//!
//! Configuration problems are detected for the whole question set before any
//! grading begins, so callers get every violation at once instead of a
//! per-question drip. Defined here so the CLI can render individual
//! violations without string matching.

use thiserror::Error;

use crate::model::QuestionKind;

/// A single authoring problem found while validating a question set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    /// Marks must be a positive integer.
    #[error("question {id}: marks must be positive")]
    ZeroMarks { id: String },

    /// Every question needs a concept label for gap analysis.
    #[error("question {id}: concept label is empty")]
    EmptyConcept { id: String },

    /// Exact-match kinds need an expected answer.
    #[error("question {id}: {kind} question has no correct answer")]
    MissingCorrectAnswer { id: String, kind: QuestionKind },

    /// Single-choice questions need at least two options.
    #[error("question {id}: single-choice question has fewer than two options")]
    TooFewOptions { id: String },

    /// The expected answer must be one of the listed options.
    #[error("question {id}: correct answer is not among the options")]
    CorrectAnswerNotAnOption { id: String },

    /// Keyword-graded kinds with no keywords would be vacuously satisfied.
    #[error("question {id}: {kind} question has no required keywords")]
    NoRequiredKeywords { id: String, kind: QuestionKind },

    /// Matching questions need at least one pair to present.
    #[error("question {id}: matching question has no pairs")]
    NoMatchPairs { id: String },

    /// Question ids must be unique within a set.
    #[error("duplicate question id: {id}")]
    DuplicateId { id: String },

    /// An empty set has nothing to grade.
    #[error("question set has no questions")]
    EmptySet,
}

/// A question set rejected before grading, carrying every violation found.
#[derive(Debug, Clone, Error)]
#[error("question set '{set_id}' is invalid ({} violation(s))", violations.len())]
pub struct ConfigError {
    /// Id of the rejected set.
    pub set_id: String,
    /// All violations, in question order.
    pub violations: Vec<ConfigViolation>,
}

/// An illegal session phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has already started")]
    AlreadyStarted,
    #[error("session is not in progress")]
    NotInProgress,
    #[error("session is already finished")]
    AlreadyFinished,
}
