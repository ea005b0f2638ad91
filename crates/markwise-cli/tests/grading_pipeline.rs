//! End-to-end grading pipeline tests.
//!
//! These tests drive the full offline path (parse → validate → grade →
//! report files) against the shipped question sets, with submissions of
//! varying quality.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn markwise() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("markwise").unwrap()
}

const QUESTIONS: &str = "../../question-sets/class10-weekly.toml";

fn write_answers(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("answers.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn e2e_partial_credit_run() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("reports");

    // q1 exact (case-insensitive), q2 exact, q3 matching passes through,
    // q4 hits 2 of 4 keywords, q5 hits none.
    let answers = write_answers(
        &dir,
        r#"
[submission]
student = "Ananya Sharma"
elapsed_secs = 305

[answers]
q1 = "P² - 2Q"
q2 = "cubic"
q4 = "Corrosion is slow oxidation of metal; paint adds a layer on the surface."
q5 = "I don't remember the derivation."
"#,
    );

    markwise()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 9 / 21"))
        .stdout(predicate::str::contains("Time logged: 05:05"))
        .stdout(predicate::str::contains("Weak concepts: Quadratic Derivations"))
        .stdout(predicate::str::contains("Report saved to"));

    // The saved JSON report carries the same numbers.
    let report_path = find_report(&output, "json");
    let content = std::fs::read_to_string(report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["score"], 9);
    assert_eq!(report["total_marks"], 21);
    assert_eq!(report["student"], "Ananya Sharma");
    assert_eq!(report["elapsed_secs"], 305);
    assert_eq!(
        report["weak_concepts"],
        serde_json::json!(["Quadratic Derivations"])
    );
}

#[test]
fn e2e_full_marks_run() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("reports");

    let answers = write_answers(
        &dir,
        r#"
[answers]
q1 = { option = 0 }
q2 = "Cubic"
q4 = "Corrosion is oxidation; galvanization coats iron in a zinc layer for protection."
q5 = "Move the constant, divide by the leading coefficient, complete the square, then take the root."
"#,
    );

    markwise()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 21 / 21"))
        .stdout(predicate::str::contains("Weak concepts: none"));
}

#[test]
fn e2e_empty_submission_scores_only_manual_review() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("reports");

    let answers = write_answers(&dir, "[answers]\n");

    // Only the matching question (3 marks) passes through; everything else
    // grades as unanswered.
    markwise()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 3 / 21"));
}

#[test]
fn e2e_html_scorecard() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("reports");

    let answers = write_answers(&dir, "[answers]\nq2 = \"cubic\"\n");

    markwise()
        .arg("grade")
        .arg("--questions")
        .arg(QUESTIONS)
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("json,html")
        .assert()
        .success()
        .stdout(predicate::str::contains("HTML scorecard"));

    let scorecard = find_report(&output, "html");
    let content = std::fs::read_to_string(scorecard).unwrap();
    assert!(content.contains("Class 10 Weekly Assignment"));
    assert!(content.contains("Knowledge Gap Analysis"));
}

#[test]
fn e2e_invalid_question_set_is_rejected() {
    let dir = TempDir::new().unwrap();

    let questions = dir.path().join("bad.toml");
    std::fs::write(
        &questions,
        r#"
[question_set]
id = "bad"
title = "Bad"

[[questions]]
id = "q1"
kind = "short-answer"
text = "Explain."
marks = 5
concept = "Something"
"#,
    )
    .unwrap();

    let answers = write_answers(&dir, "[answers]\nq1 = \"an explanation\"\n");

    markwise()
        .arg("grade")
        .arg("--questions")
        .arg(&questions)
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no required keywords"));
}

/// Find the single report file with the given extension in `dir`.
fn find_report(dir: &std::path::Path, extension: &str) -> std::path::PathBuf {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().is_some_and(|ext| ext == extension))
        .unwrap_or_else(|| panic!("no .{extension} report in {}", dir.display()))
}
