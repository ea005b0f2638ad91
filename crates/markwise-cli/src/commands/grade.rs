//! The `markwise grade` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::evaluator;
use markwise_core::parser;
use markwise_core::report::GradeReport;
use markwise_core::session::format_elapsed;
use markwise_report::write_html_report;

pub fn execute(
    questions_path: PathBuf,
    answers_path: PathBuf,
    student: Option<String>,
    output: PathBuf,
    format: String,
) -> Result<()> {
    let set = parser::parse_question_set(&questions_path)?;
    let submission = parser::parse_submission(&answers_path)?;

    eprintln!(
        "markwise v0.1.0 — Grading '{}' ({} questions)",
        set.title,
        set.questions.len()
    );

    let evaluation = match evaluator::evaluate(&set, &submission.answers) {
        Ok(evaluation) => evaluation,
        Err(config_error) => {
            for violation in &config_error.violations {
                eprintln!("  INVALID: {violation}");
            }
            anyhow::bail!("{config_error}");
        }
    };

    let report = GradeReport::new(
        &set,
        student.or(submission.student),
        evaluation,
        submission.elapsed_secs,
    );

    print_outcomes(&report);

    println!(
        "Score: {} / {} ({:.1}%)",
        report.score,
        report.total_marks,
        report.percent()
    );
    if let Some(elapsed) = report.elapsed_secs {
        println!("Time logged: {}", format_elapsed(elapsed));
    }
    if report.weak_concepts.is_empty() {
        println!("Weak concepts: none");
    } else {
        println!("Weak concepts: {}", report.weak_concepts.join(", "));
    }

    // Save outputs
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').collect()
    };

    for fmt in &formats {
        match fmt.trim() {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                println!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("scorecard-{timestamp}.html"));
                write_html_report(&report, &path)?;
                println!("HTML scorecard: {}", path.display());
            }
            other => {
                eprintln!("Unknown format: {other}");
            }
        }
    }

    Ok(())
}

fn print_outcomes(report: &GradeReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Concept", "Result", "Credit", "Graded"]);

    for o in &report.outcomes {
        table.add_row(vec![
            Cell::new(&o.question_id),
            Cell::new(&o.concept),
            Cell::new(if o.correct { "OK" } else { "MISS" }),
            Cell::new(format!("{}/{}", o.credit_awarded, o.marks)),
            Cell::new(if o.auto_graded { "auto" } else { "manual" }),
        ]);
    }

    eprintln!("\n{table}\n");
}
