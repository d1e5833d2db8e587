use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

/// System prompt sent ahead of the dialogue on every completion request.
pub const CONTRACT_FINDER_SYSTEM_PROMPT: &str = "You are a contract-finding assistant. \
    You help the user discover contract opportunities by industry, contract type, \
    location and budget range. Keep replies short and suggest how the user could \
    refine their search.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in the OpenAI-compatible `messages` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        })
    }

    /// Send `messages` and return the first choice's text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let endpoint = self.endpoint();
        info!(model = %self.model, messages = messages.len(), "requesting chat completion");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await?;

        // Capture the status before the body is consumed.
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            bail!("Groq error ({status}): {text}");
        }
        let body: serde_json::Value = serde_json::from_str(&text)?;

        debug!("chat completion received");
        extract_reply(&body).ok_or_else(|| anyhow::anyhow!("Groq response missing text: {body}"))
    }
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn extract_reply(body: &serde_json::Value) -> Option<String> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(ToString::to_string)
}

// ── Tests ────────────────────────────────────────────────────────────────────
