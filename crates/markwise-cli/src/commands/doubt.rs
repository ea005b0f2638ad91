//! The `markwise doubt` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use markwise_providers::config::load_config_from;
use markwise_providers::tutor::{DoubtRequest, TutorProvider};
use markwise_providers::{create_provider, GracefulTutor};

pub async fn execute(
    question: String,
    subject: String,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let Some(provider_config) = config.providers.get(&config.default_provider) else {
        anyhow::bail!(
            "provider '{}' not found in config. Run `markwise init` to create one.",
            config.default_provider
        );
    };
    let provider = create_provider(&config.default_provider, provider_config)?;
    let tutor = GracefulTutor::with_retry_policy(
        provider,
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
    );

    let request = DoubtRequest::new(
        model.unwrap_or_else(|| config.default_doubt_model.clone()),
        subject,
        question,
    );

    let response = tutor.solve_doubt(&request).await?;

    println!("{}", response.answer);
    eprintln!(
        "\n[{} | {} tokens | {}ms]",
        response.model, response.token_usage.total_tokens, response.latency_ms
    );

    Ok(())
}
