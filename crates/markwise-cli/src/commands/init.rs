//! The `markwise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create markwise.toml
    if std::path::Path::new("markwise.toml").exists() {
        println!("markwise.toml already exists, skipping.");
    } else {
        std::fs::write("markwise.toml", SAMPLE_CONFIG)?;
        println!("Created markwise.toml");
    }

    // Create example question set
    std::fs::create_dir_all("question-sets")?;
    let example_path = std::path::Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    // Create example submission
    std::fs::create_dir_all("submissions")?;
    let answers_path = std::path::Path::new("submissions/example-answers.toml");
    if answers_path.exists() {
        println!("submissions/example-answers.toml already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_SUBMISSION)?;
        println!("Created submissions/example-answers.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit markwise.toml with your API keys");
    println!("  2. Run: markwise validate --questions question-sets/example.toml");
    println!("  3. Run: markwise grade --questions question-sets/example.toml --answers submissions/example-answers.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# markwise configuration

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

default_provider = "gemini"
default_doubt_model = "gemini-3-pro-preview"
default_insights_model = "gemini-3-flash-preview"
max_retries = 2
parallelism = 4
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
title = "Example Question Set"
subject = "Mathematics"
description = "A simple example question set to get started"

[[questions]]
id = "q1"
kind = "single-choice"
text = "What is the degree of the polynomial x³ + 2x + 1?"
marks = 1
concept = "Polynomial Degrees"
options = ["1", "2", "3", "4"]
correct_answer = "3"

[[questions]]
id = "q2"
kind = "fill-in-blank"
text = "A polynomial of degree 3 is called a __________ polynomial."
marks = 1
concept = "Polynomial Degrees"
correct_answer = "Cubic"

[[questions]]
id = "q3"
kind = "short-answer"
text = "Define a zero of a polynomial."
marks = 3
concept = "Polynomial Roots"
required_keywords = ["value", "zero", "substituted"]
"#;

const EXAMPLE_SUBMISSION: &str = r#"[submission]
student = "Example Student"
elapsed_secs = 240

[answers]
q1 = "3"
q2 = "cubic"
q3 = "A zero is a value which, when substituted for the variable, makes the polynomial zero."
"#;
