//! Core data model types for markwise.
//!
//! These are the fundamental types the entire markwise system uses to
//! represent questions, question sets, and student submissions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of question kinds markwise knows how to handle.
///
/// `Matching` and `Upload` are collected but never auto-graded; the grader
/// passes them through at full credit for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    FillInBlank,
    Matching,
    ShortAnswer,
    LongAnswer,
    Upload,
}

impl QuestionKind {
    /// Whether the grader scores this kind by keyword coverage.
    pub fn is_keyword_graded(&self) -> bool {
        matches!(self, QuestionKind::ShortAnswer | QuestionKind::LongAnswer)
    }

    /// Whether the grader scores this kind by exact match.
    pub fn is_exact_match(&self) -> bool {
        matches!(self, QuestionKind::SingleChoice | QuestionKind::FillInBlank)
    }

    /// Whether this kind has no automated grading and defers to a human.
    pub fn is_manually_reviewed(&self) -> bool {
        matches!(self, QuestionKind::Matching | QuestionKind::Upload)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::SingleChoice => write!(f, "single-choice"),
            QuestionKind::FillInBlank => write!(f, "fill-in-blank"),
            QuestionKind::Matching => write!(f, "matching"),
            QuestionKind::ShortAnswer => write!(f, "short-answer"),
            QuestionKind::LongAnswer => write!(f, "long-answer"),
            QuestionKind::Upload => write!(f, "upload"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single-choice" | "mcq" => Ok(QuestionKind::SingleChoice),
            "fill-in-blank" | "fill-in-blanks" => Ok(QuestionKind::FillInBlank),
            "matching" | "match-the-following" => Ok(QuestionKind::Matching),
            "short-answer" | "define" => Ok(QuestionKind::ShortAnswer),
            "long-answer" => Ok(QuestionKind::LongAnswer),
            "upload" | "pdf-upload" => Ok(QuestionKind::Upload),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A left/right pair for matching questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

/// A single evaluable question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier, stable across a session.
    pub id: String,
    /// The question kind, which determines the grading metadata required.
    pub kind: QuestionKind,
    /// The prompt shown to the learner.
    pub text: String,
    /// Maximum credit for this question. Must be positive.
    pub marks: u32,
    /// The knowledge unit this question probes. Used for gap analysis only.
    pub concept: String,
    /// Optional chapter/topic label for display.
    #[serde(default)]
    pub topic: Option<String>,
    /// Choices for single-choice questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Expected answer for single-choice and fill-in-blank questions.
    #[serde(default)]
    pub correct_answer: Option<String>,
    /// Terms the grader scans typed answers for (short/long answer).
    #[serde(default)]
    pub required_keywords: Vec<String>,
    /// Pairs for matching questions. Not auto-graded.
    #[serde(default)]
    pub match_pairs: Vec<MatchPair>,
}

/// An ordered collection of questions graded as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Unique identifier for this question set.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Subject label (e.g. "Mathematics").
    #[serde(default)]
    pub subject: String,
    /// Description shown to the learner before starting.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Sum of marks across all questions.
    pub fn total_marks(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}

/// A submitted answer to one question.
///
/// Closed variant rather than free-form JSON: an answer is either typed text
/// or a selected option index, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Free text, used by every typed question kind.
    Text(String),
    /// A zero-based index into the question's `options`.
    Selected { option: usize },
}

impl Answer {
    /// Resolve this answer to the text the grader compares against.
    ///
    /// A selected option resolves through the question's `options`; an
    /// out-of-range index resolves to the empty string and grades as
    /// unanswered.
    pub fn resolve_text<'a>(&'a self, question: &'a Question) -> &'a str {
        match self {
            Answer::Text(text) => text,
            Answer::Selected { option } => question
                .options
                .get(*option)
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

/// A learner's answers for one question set, keyed by question id.
///
/// Questions with no entry are graded as unanswered, never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    answers: HashMap<String, Answer>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the answer for a question.
    pub fn record(&mut self, question_id: impl Into<String>, answer: Answer) {
        self.answers.insert(question_id.into(), answer);
    }

    /// The answer for a question, if one was submitted.
    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Answer)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, Answer)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
