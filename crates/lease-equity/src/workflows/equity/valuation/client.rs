use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parser::parse_report;
use super::prompt::{valuation_prompt, SYSTEM_PROMPT};
use super::{ValuationError, ValuationReport, ValuationSource};
use crate::config::ValuationConfig;
use crate::workflows::equity::domain::VehicleLeaseInput;

const USER_AGENT: &str = "lease-equity/0.1.0";
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
pub enum ValuationClientError {
    #[error("VALUATION_API_KEY is not set")]
    MissingApiKey,
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thin asynchronous client for an OpenAI-compatible chat-completion endpoint,
/// prompted to behave like a vehicle pricing API.
#[derive(Debug, Clone)]
pub struct GenerativeValuationClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GenerativeValuationClient {
    pub fn from_config(config: &ValuationConfig) -> Result<Self, ValuationClientError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ValuationClientError::MissingApiKey)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
        })
    }

    async fn complete(&self, prompt: String) -> Result<String, ValuationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ValuationError::Unavailable(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValuationError::Unavailable(format!(
                "completion endpoint returned {status}"
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(ValuationError::Unavailable(
                "completion endpoint returned non-JSON content".to_string(),
            ));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|err| {
            ValuationError::Unavailable(format!("completion body unreadable: {err}"))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ValuationError::Unavailable("completion contained no text".to_string()))
    }
}

#[async_trait]
impl ValuationSource for GenerativeValuationClient {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn fetch_valuation(
        &self,
        input: &VehicleLeaseInput,
    ) -> Result<ValuationReport, ValuationError> {
        debug!(model = %self.model, vehicle = %input.vehicle_label(), "requesting valuation");
        let text = self.complete(valuation_prompt(input)).await?;
        parse_report(&text)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
