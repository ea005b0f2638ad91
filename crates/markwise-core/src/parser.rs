//! TOML question set and submission parsers.
//!
//! Loads question sets from TOML files and directories, and submissions from
//! the answer files a collecting client writes at the end of a session.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Answer, MatchPair, Question, QuestionKind, QuestionSet, Submission};

/// Intermediate TOML structure for parsing question set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    id: String,
    title: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    kind: String,
    text: String,
    marks: u32,
    concept: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    required_keywords: Vec<String>,
    #[serde(default)]
    match_pairs: Vec<TomlMatchPair>,
}

#[derive(Debug, Deserialize)]
struct TomlMatchPair {
    left: String,
    right: String,
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let kind: QuestionKind = q
                .kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;

            Ok(Question {
                id: q.id,
                kind,
                text: q.text,
                marks: q.marks,
                concept: q.concept,
                topic: q.topic,
                options: q.options,
                correct_answer: q.correct_answer,
                required_keywords: q.required_keywords,
                match_pairs: q
                    .match_pairs
                    .into_iter()
                    .map(|p| MatchPair {
                        left: p.left,
                        right: p.right,
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionSet {
        id: parsed.question_set.id,
        title: parsed.question_set.title,
        subject: parsed.question_set.subject,
        description: parsed.question_set.description,
        questions,
    })
}

/// Recursively load all `.toml` question set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// A submission file: optional session metadata plus the answer table.
#[derive(Debug, Clone, Default)]
pub struct ParsedSubmission {
    /// Student name, if the collecting client recorded one.
    pub student: Option<String>,
    /// Elapsed session seconds, if the collecting client recorded them.
    pub elapsed_secs: Option<u64>,
    /// The answers, keyed by question id.
    pub answers: Submission,
}

#[derive(Debug, Deserialize)]
struct TomlSubmissionFile {
    #[serde(default)]
    submission: TomlSubmissionHeader,
    #[serde(default)]
    answers: std::collections::HashMap<String, Answer>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlSubmissionHeader {
    #[serde(default)]
    student: Option<String>,
    #[serde(default)]
    elapsed_secs: Option<u64>,
}

/// Parse a submission TOML file.
pub fn parse_submission(path: &Path) -> Result<ParsedSubmission> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission file: {}", path.display()))?;

    parse_submission_str(&content, path)
}

/// Parse a submission TOML string (useful for testing).
pub fn parse_submission_str(content: &str, source_path: &Path) -> Result<ParsedSubmission> {
    let parsed: TomlSubmissionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(ParsedSubmission {
        student: parsed.submission.student,
        elapsed_secs: parsed.submission.elapsed_secs,
        answers: parsed.answers.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[question_set]
id = "polynomials-week3"
title = "Polynomials Weekly Check"
subject = "Mathematics"
description = "Zeros, degrees, and derivations"

[[questions]]
id = "q1"
kind = "single-choice"
text = "If α and β are the zeros of f(x) = x² - px + q, find α² + β²."
marks = 2
concept = "Polynomial Roots"
topic = "Polynomials"
options = ["p² - 2q", "p² + 2q", "q² - 2p", "p² - q"]
correct_answer = "p² - 2q"

[[questions]]
id = "q2"
kind = "long-answer"
text = "Explain the completing-the-square derivation of the quadratic formula."
marks = 10
concept = "Quadratic Derivations"
required_keywords = ["constant", "coefficient", "square", "root"]
"#;

    #[test]
    fn parse_valid_toml() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.id, "polynomials-week3");
        assert_eq!(set.subject, "Mathematics");
        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.questions[0].kind, QuestionKind::SingleChoice);
        assert_eq!(set.questions[0].options.len(), 4);
        assert_eq!(set.questions[1].required_keywords.len(), 4);
        assert_eq!(set.total_marks(), 12);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[question_set]
id = "minimal"
title = "Minimal"

[[questions]]
id = "q1"
kind = "fill-in-blank"
text = "A polynomial of degree 3 is called a __________ polynomial."
marks = 1
concept = "Polynomial Degrees"
correct_answer = "Cubic"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.subject, "");
        assert!(set.questions[0].topic.is_none());
        assert!(set.questions[0].options.is_empty());
        assert!(set.questions[0].required_keywords.is_empty());
    }

    #[test]
    fn parse_match_pairs() {
        let toml = r#"
[question_set]
id = "chem"
title = "Chemistry"

[[questions]]
id = "q1"
kind = "matching"
text = "Match the compounds with their common names."
marks = 3
concept = "Chemical Formulas"
match_pairs = [
    { left = "NaHCO₃", right = "Baking Soda" },
    { left = "CaOCl₂", right = "Bleaching Powder" },
]
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.questions[0].match_pairs.len(), 2);
        assert_eq!(set.questions[0].match_pairs[0].right, "Baking Soda");
    }

    #[test]
    fn parse_unknown_kind_fails() {
        let toml = r#"
[question_set]
id = "bad"
title = "Bad"

[[questions]]
id = "q1"
kind = "essay"
text = "Write an essay."
marks = 5
concept = "Writing"
"#;
        let err = parse_question_set_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown question kind"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_set_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("polynomials.toml");
        std::fs::write(&file_path, VALID_TOML).unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "polynomials-week3");
    }

    #[test]
    fn parse_submission_with_metadata() {
        let toml = r#"
[submission]
student = "Ananya Sharma"
elapsed_secs = 312

[answers]
q1 = "p² - 2q"
q2 = { option = 1 }
q4 = "Corrosion is oxidation of the metal surface."
"#;
        let parsed = parse_submission_str(toml, &PathBuf::from("answers.toml")).unwrap();
        assert_eq!(parsed.student.as_deref(), Some("Ananya Sharma"));
        assert_eq!(parsed.elapsed_secs, Some(312));
        assert_eq!(parsed.answers.len(), 3);
        assert_eq!(
            parsed.answers.answer_for("q2"),
            Some(&Answer::Selected { option: 1 })
        );
    }

    #[test]
    fn parse_submission_without_header() {
        let toml = r#"
[answers]
q1 = "Cubic"
"#;
        let parsed = parse_submission_str(toml, &PathBuf::from("answers.toml")).unwrap();
        assert!(parsed.student.is_none());
        assert!(parsed.elapsed_secs.is_none());
        assert_eq!(parsed.answers.len(), 1);
    }
}
