use crate::clients::models::common::ChatMessage;
use crate::clients::models::requests::{ChatCompletionRequest, ResponseFormat};
use crate::clients::models::responses::ChatCompletionResponse;
use crate::config::Config;
use anyhow::Result;
use reqwest::{Client, Url, header::AUTHORIZATION};

const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 1.0;
const MAX_COMPLETION_TOKENS: u32 = 2048;

/// Client for an OpenAI-compatible chat completion endpoint (Groq by default).
#[derive(Clone)]
pub struct GroqClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.llm_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: Url::parse(&config.llm_api_url)?,
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    /// Sends one system and one user message in JSON-object mode and returns
    /// the assistant's message content verbatim.
    pub async fn complete_json(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            stream: false,
            response_format: Some(ResponseFormat::json_object()),
        };
        let json_body = serde_json::to_string(&request)?;

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "groq.completion.request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                body
            ));
        }

        let body = response.text().await?;

        let api_response: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Failed to parse chat completion response: {}", e))?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                completion_id = api_response.id.as_deref().unwrap_or(""),
                model = api_response.model.as_deref().unwrap_or(""),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "groq.completion.usage"
            );
        }

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("API returned no completion choices"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!(
                max_completion_tokens = MAX_COMPLETION_TOKENS,
                "groq.completion.truncated"
            );
        }

        choice
            .message
            .content
            .ok_or_else(|| anyhow::anyhow!("API returned a completion without content"))
    }
}
