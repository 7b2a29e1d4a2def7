//! Gemini client for the Google Generative Language API

use async_trait::async_trait;
use medsupply_core::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use super::{GenerateOptions, LlmProvider};
use crate::config::Config;

/// Score above which dynamic retrieval kicks in
const DYNAMIC_THRESHOLD: f64 = 0.3;

/// Primary LLM provider
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google search retrieval tool in dynamic mode
fn dynamic_retrieval_tool() -> JsonValue {
    json!({
        "google_search_retrieval": {
            "dynamic_retrieval_config": {
                "mode": "MODE_DYNAMIC",
                "dynamic_threshold": DYNAMIC_THRESHOLD
            }
        }
    })
}

impl GeminiClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.credentials.gemini_api_key.clone(),
            base_url: config.endpoints.gemini.clone(),
            model: config.gemini_model.clone(),
        }
    }

    fn build_request(prompt: &str, options: GenerateOptions) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            tools: if options.grounding {
                vec![dynamic_retrieval_tool()]
            } else {
                Vec::new()
            },
            generation_config: options.json_mode.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::credential_missing("GEMINI_API_KEY"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = Self::build_request(prompt, options);

        tracing::debug!(model = %self.model, grounding = options.grounding, "Gemini request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let message = crate::http::error_message("Gemini", response).await;
            return Err(ProviderError::Transport(message));
        }

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::parse(format!("Gemini response: {e}")))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::empty("Gemini returned no text"));
        }
        Ok(text)
    }
}
