//! Groq client for the OpenAI-compatible chat completions API

use async_trait::async_trait;
use medsupply_core::ProviderError;
use serde::{Deserialize, Serialize};

use super::{GenerateOptions, LlmProvider};
use crate::config::Config;

/// Fallback LLM provider
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl GroqClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.credentials.groq_api_key.clone(),
            base_url: config.endpoints.groq.clone(),
            model: config.groq_model.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
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
            .ok_or_else(|| ProviderError::credential_missing("GROQ_API_KEY"))?;

        if options.grounding {
            tracing::debug!("Groq has no retrieval tool, grounding ignored");
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: options.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .http
            .post(format!("{}/openai/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("Groq request failed: {e}")))?;

        if !response.status().is_success() {
            let message = crate::http::error_message("Groq", response).await;
            return Err(ProviderError::Transport(message));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::parse(format!("Groq response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::empty("Groq returned no content"))
    }
}
