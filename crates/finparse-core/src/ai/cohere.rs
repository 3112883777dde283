//! Cohere provider
//!
//! Uses the legacy `/v1/generate` endpoint, which returns plain
//! generations rather than chat messages.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::Provider;

const COHERE_BASE_URL: &str = "https://api.cohere.ai/v1";
const COHERE_MODEL: &str = "command";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct Generation {
    text: String,
}

#[derive(Clone)]
pub struct CohereProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl CohereProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: COHERE_BASE_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Provider for CohereProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            prompt,
            model: COHERE_MODEL,
            max_tokens: 150,
            temperature: 0.1,
        };

        debug!(model = COHERE_MODEL, "Sending generate request");

        let response = self
            .http_client
            .post(format!("{}/generate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Provider(format!(
                "cohere returned HTTP {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await?;
        body.generations
            .into_iter()
            .next()
            .map(|g| g.text)
            .ok_or_else(|| Error::Provider("cohere returned no generations".into()))
    }

    fn name(&self) -> &str {
        "cohere"
    }
}
