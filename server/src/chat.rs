//! Chat proxy — forwards a user question plus the current dashboard
//! document to an OpenAI-compatible chat-completions API.
//!
//! One request, one response. No retry, no backoff: a failed call
//! surfaces immediately and the caller decides what to show.

use crate::config::ChatConfig;
use serde::{Deserialize, Serialize};

const SYSTEM_PROMPT: &str = "You are an expert banking analyst assistant for an Enterprise \
Banking Command Centre. You help executives understand their dashboard data.\n\n\
When answering:\n\
- Be concise and action-oriented\n\
- Use the provided dashboard data to support your answers\n\
- Avoid jargon; explain banking terms when needed\n\
- Suggest specific areas to investigate when relevant\n\
- Reference actual numbers from the data when available";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// The request body accepted from the dashboard client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub dashboard_data: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("API key is required. Add your key in Settings.")]
    MissingApiKey,
    #[error("Message is required")]
    MissingMessage,
    #[error("Upstream authentication failed: {0}")]
    Auth(String),
    #[error("Failed to get AI response: {0}")]
    Upstream(String),
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct UpstreamResponse {
    choices: Vec<UpstreamChoice>,
}

#[derive(Deserialize)]
struct UpstreamChoice {
    message: UpstreamMessage,
}

#[derive(Deserialize)]
struct UpstreamMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Validate the request, build the upstream conversation, and return
    /// the assistant's reply.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let api_key = request.api_key.trim();
        if api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        if request.message.trim().is_empty() {
            return Err(ChatError::MissingMessage);
        }

        let data_context = serde_json::to_string_pretty(&request.dashboard_data)
            .unwrap_or_else(|_| "{}".to_string());
        let system_content = format!(
            "{SYSTEM_PROMPT}\n\nCurrent dashboard data (use this to answer questions):\n{data_context}"
        );

        let mut messages = Vec::with_capacity(request.messages.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system_content,
        });
        messages.extend(request.messages.iter().cloned());
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        let body = UpstreamRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(&self.config.upstream_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ChatError::Upstream(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Auth(detail));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream(format!("{status}: {detail}")));
        }

        let parsed: UpstreamResponse = response
            .json()
            .await
            .map_err(|err| ChatError::Upstream(err.to_string()))?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "No response generated.".to_string()))
    }
}
