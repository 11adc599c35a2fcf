use async_trait::async_trait;

use crate::types::{ApiErrorBody, MessagesRequest, MessagesResponse, RequestMessage};
use crate::{ClaudeAgentError, LlmClient, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─── AnthropicApi ─────────────────────────────────────────────────────────

/// Single-turn client for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicApi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
        }
    }

    /// Read the key from `api_key_env`. An unset or empty variable is an error.
    pub fn from_env(api_key_env: &str, model: impl Into<String>) -> Result<Self> {
        match std::env::var(api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim(), model)),
            _ => Err(ClaudeAgentError::MissingApiKey(api_key_env.to_string())),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for AnthropicApi {
    fn name(&self) -> &str {
        "anthropic-api"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, url = %self.endpoint(), "sending messages request");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| {
                    if b.error.kind.is_empty() {
                        b.error.message
                    } else {
                        format!("{}: {}", b.error.kind, b.error.message)
                    }
                })
                .unwrap_or(text);
            return Err(ClaudeAgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = resp.json().await?;
        if let Some(usage) = parsed.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?parsed.stop_reason,
                "messages response"
            );
        }
        Ok(parsed.text())
    }
}
