//! The `markwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let sets = if questions_path.is_dir() {
        markwise_core::parser::load_question_directory(&questions_path)?
    } else {
        vec![markwise_core::parser::parse_question_set(&questions_path)?]
    };

    let mut total_violations = 0;

    for set in &sets {
        println!("Question set: {} ({} questions)", set.title, set.questions.len());

        if let Err(config_error) = markwise_core::evaluator::validate_question_set(set) {
            for violation in &config_error.violations {
                println!("  VIOLATION: {violation}");
            }
            total_violations += config_error.violations.len();
        }
    }

    if total_violations == 0 {
        println!("All question sets valid.");
        Ok(())
    } else {
        anyhow::bail!("{total_violations} violation(s) found");
    }
}
