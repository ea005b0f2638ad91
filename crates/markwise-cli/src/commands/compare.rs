//! The `markwise compare` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::report::GradeReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_slip: bool,
    format: String,
) -> Result<()> {
    let baseline = GradeReport::load_json(&baseline_path)?;
    let current = GradeReport::load_json(&current_path)?;

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {:+.1}% overall, {} slipped, {} improved, {} unchanged",
                progress.score_delta_percent,
                progress.slipped.len(),
                progress.improved.len(),
                progress.unchanged
            );

            if !progress.slipped.is_empty() {
                println!("\nSlipped:");
                for s in &progress.slipped {
                    println!(
                        "  {} ({}) {:.0}% -> {:.0}% ({:+.0}%)",
                        s.question_id,
                        s.concept,
                        s.baseline_fraction * 100.0,
                        s.current_fraction * 100.0,
                        s.delta * 100.0
                    );
                }
            }

            if !progress.improved.is_empty() {
                println!("\nImproved:");
                for i in &progress.improved {
                    println!(
                        "  {} ({}) {:.0}% -> {:.0}% (+{:.0}%)",
                        i.question_id,
                        i.concept,
                        i.baseline_fraction * 100.0,
                        i.current_fraction * 100.0,
                        i.delta * 100.0
                    );
                }
            }

            if !progress.recovered_concepts.is_empty() {
                println!("\nRecovered concepts: {}", progress.recovered_concepts.join(", "));
            }
            if !progress.emerged_concepts.is_empty() {
                println!("New weak concepts: {}", progress.emerged_concepts.join(", "));
            }
            if !progress.persistent_concepts.is_empty() {
                println!(
                    "Persistent weak concepts: {}",
                    progress.persistent_concepts.join(", ")
                );
            }

            if progress.new_questions > 0 {
                println!("\n{} new question(s)", progress.new_questions);
            }
            if progress.removed_questions > 0 {
                println!("{} removed question(s)", progress.removed_questions);
            }
        }
    }

    if fail_on_slip && progress.has_slipped() {
        std::process::exit(1);
    }

    Ok(())
}
