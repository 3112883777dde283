//! OpenAI-compatible chat provider
//!
//! Works with any server implementing the OpenAI `/chat/completions` API.
//! Groq exposes exactly this shape, so both hosted providers share one
//! implementation; tests point it at a local mock server.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::Provider;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_MODEL: &str = "mixtral-8x7b-32768";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Clone)]
pub struct OpenAiChatProvider {
    http_client: Client,
    name: String,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiChatProvider {
    pub fn new(name: &str, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn groq(api_key: &str) -> Self {
        Self::new("groq", GROQ_BASE_URL, GROQ_MODEL, api_key)
    }

    pub fn openai(api_key: &str) -> Self {
        Self::new("openai", OPENAI_BASE_URL, OPENAI_MODEL, api_key)
    }
}

#[async_trait]
impl Provider for OpenAiChatProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.1,
        };

        debug!(provider = %self.name, model = %self.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "{} returned HTTP {}",
                self.name,
                response.status()
            )));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Provider(format!("{} returned no choices", self.name)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
