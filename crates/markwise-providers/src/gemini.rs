//! Gemini API provider implementation.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ProviderError;
use crate::tutor::{
    doubt_prompt, insights_prompt, DoubtRequest, DoubtResponse, Insights, InsightsRequest,
    InsightsResponse, ModelInfo, TokenUsage, TutorProvider, DOUBT_SYSTEM_PROMPT,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }

    async fn generate(&self, model: &str, body: &GeminiRequest) -> anyhow::Result<GeminiResponse> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(model.to_string()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::ApiError { status, message }.into());
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(api_response)
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiParts>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiParts {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata", default)]
    usage_metadata: GeminiUsage,
    #[serde(rename = "modelVersion", default)]
    model_version: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize, Default)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The fixed response schema for the insight object, in Gemini's schema
/// dialect.
fn insights_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recommendation": { "type": "STRING" }
        },
        "required": ["strengths", "weaknesses", "recommendation"]
    })
}

fn usage_from(usage: &GeminiUsage) -> TokenUsage {
    let total = usage.prompt_token_count + usage.candidates_token_count;
    // Pricing: Gemini Pro $2/$12 per 1M tokens
    let estimated_cost = (usage.prompt_token_count as f64 * 2.0
        + usage.candidates_token_count as f64 * 12.0)
        / 1_000_000.0;
    TokenUsage {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        total_tokens: total,
        estimated_cost_usd: estimated_cost,
    }
}

#[async_trait]
impl TutorProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn solve_doubt(&self, request: &DoubtRequest) -> anyhow::Result<DoubtResponse> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: doubt_prompt(request),
                }],
            }],
            system_instruction: Some(GeminiParts {
                parts: vec![GeminiPart {
                    text: DOUBT_SYSTEM_PROMPT.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: None,
                response_schema: None,
            },
        };

        let api_response = self.generate(&request.model, &body).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let mut answer = api_response.text();
        if answer.is_empty() {
            answer = "No solution could be generated.".to_string();
        }

        Ok(DoubtResponse {
            answer,
            model: api_response
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            token_usage: usage_from(&api_response.usage_metadata),
            latency_ms,
        })
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn performance_insights(
        &self,
        request: &InsightsRequest,
    ) -> anyhow::Result<InsightsResponse> {
        let start = Instant::now();

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: insights_prompt(request),
                }],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: request.max_tokens,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(insights_response_schema()),
            },
        };

        let api_response = self.generate(&request.model, &body).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text = api_response.text();
        if text.is_empty() {
            return Err(ProviderError::ApiError {
                status: 0,
                message: "empty insights response".to_string(),
            }
            .into());
        }

        let insights: Insights =
            serde_json::from_str(&text).map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("insights payload did not match schema: {e}"),
            })?;

        Ok(InsightsResponse {
            insights,
            model: api_response
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            token_usage: usage_from(&api_response.usage_metadata),
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "gemini-3-pro-preview".into(),
                name: "Gemini 3 Pro".into(),
                provider: "gemini".into(),
                max_context: 1_000_000,
                cost_per_1k_input: 0.002,
                cost_per_1k_output: 0.012,
            },
            ModelInfo {
                id: "gemini-3-flash-preview".into(),
                name: "Gemini 3 Flash".into(),
                provider: "gemini".into(),
                max_context: 1_000_000,
                cost_per_1k_input: 0.0003,
                cost_per_1k_output: 0.0025,
            },
        ]
    }
}
